//! Notification dispatcher seam and the logging "mock email" backend

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Characters of the body kept in the mock email log line
const LOG_BODY_PREVIEW: usize = 100;

/// Outbound message addressed to an email recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Message {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Delivery failed for {to}: {reason}")]
    Delivery { to: String, reason: String },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, message: Message) -> Result<(), DispatchError>;
}

/// Send `message`, logging instead of propagating failures
pub async fn send_best_effort(dispatcher: &dyn NotificationDispatcher, message: Message) {
    let to = message.to.clone();
    if let Err(e) = dispatcher.dispatch(message).await {
        warn!(to = %to, error = %e, "Notification dispatch failed");
    }
}

/// Dispatcher that only writes a log line per message
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn dispatch(&self, message: Message) -> Result<(), DispatchError> {
        let preview: String = message.body.chars().take(LOG_BODY_PREVIEW).collect();
        info!(
            to = %message.to,
            subject = %message.subject,
            "[MOCK EMAIL] {}...",
            preview
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_dispatcher_accepts_long_bodies() {
        let body = "x".repeat(500);
        LogDispatcher
            .dispatch(Message::new("heir@example.com", "Hello", body))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_best_effort_swallows_failures() {
        let mut mock = MockNotificationDispatcher::new();
        mock.expect_dispatch().times(1).returning(|m| {
            Err(DispatchError::Delivery {
                to: m.to,
                reason: "smtp down".into(),
            })
        });

        send_best_effort(&mock, Message::new("a@example.com", "s", "b")).await;
    }
}
