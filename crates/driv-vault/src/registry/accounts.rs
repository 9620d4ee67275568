//! Account registration and sessions
//!
//! Owns the user record, the default vault provisioned with it, and the
//! bearer sessions issued for it. Password storage and verification belong
//! to the credential layer in front of this service; `login` is only called
//! once that layer has accepted the credential.

use std::sync::Arc;

use driv_common::{Actor, Authenticator, Result, StaticAuthenticator, User, Vault, VaultError};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::notify::{send_best_effort, Message, NotificationDispatcher};
use crate::store::{Collection, Filter, Records};

/// Issued bearer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

impl Session {
    fn bearer(access_token: String, user: User) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

pub struct AccountService {
    records: Records,
    dispatcher: Arc<dyn NotificationDispatcher>,
    sessions: StaticAuthenticator,
}

impl AccountService {
    pub fn new(
        records: Records,
        dispatcher: Arc<dyn NotificationDispatcher>,
        sessions: StaticAuthenticator,
    ) -> Self {
        Self {
            records,
            dispatcher,
            sessions,
        }
    }

    /// Create a user together with an unlocked primary vault and sign them in
    #[instrument(skip(self))]
    pub async fn register(&self, email: &str, full_name: &str) -> Result<(Session, Vault)> {
        let existing = self
            .records
            .count(Collection::Users, &Filter::new().with("email", email))
            .await?;
        if existing > 0 {
            return Err(VaultError::Conflict("Email already registered".to_string()));
        }

        let user = User::new(email, full_name);
        self.records.insert(Collection::Users, &user).await?;

        let vault = Vault::primary(user.id.as_str());
        self.records.insert(Collection::Vaults, &vault).await?;

        info!(user_id = %user.id, vault_id = %vault.id, "Account registered");

        send_best_effort(
            self.dispatcher.as_ref(),
            Message::new(
                user.email.as_str(),
                "Welcome to DRIV",
                format!(
                    "Hello {}, welcome to Digital Rights Inheritance Vault!",
                    user.full_name
                ),
            ),
        )
        .await;

        let token = self.sessions.issue(&user.id);
        Ok((Session::bearer(token, user), vault))
    }

    /// Issue a session for an already authenticated email
    #[instrument(skip(self))]
    pub async fn login(&self, email: &str) -> Result<Session> {
        let user: Option<User> = self
            .records
            .find_one(Collection::Users, &Filter::new().with("email", email))
            .await?;
        match user {
            Some(user) if user.is_active => {
                let token = self.sessions.issue(&user.id);
                Ok(Session::bearer(token, user))
            }
            _ => {
                warn!("Login refused");
                Err(VaultError::Unauthorized)
            }
        }
    }

    pub fn logout(&self, access_token: &str) -> bool {
        self.sessions.revoke(access_token)
    }

    /// Resolve a bearer credential to the acting user
    pub async fn authenticate(&self, bearer: &str) -> Result<Actor> {
        self.sessions.authenticate(bearer).await
    }

    pub async fn me(&self, actor: &Actor) -> Result<User> {
        self.records
            .find_one(
                Collection::Users,
                &Filter::new().with("id", actor.user_id.as_str()),
            )
            .await?
            .ok_or_else(|| VaultError::not_found("User", actor.user_id.as_str()))
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}
