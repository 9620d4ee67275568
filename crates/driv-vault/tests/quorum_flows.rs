//! End-to-end flows through the DrivVault facade

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use driv_common::{
    Actor, BillingCycle, DeathVerification, DeathVerificationCreate, RoleType, StoreError,
    SubscriptionCreate, TrustedParty, TrustedPartyCreate, User, Vault, VaultError,
    VerificationStatus,
};
use driv_vault::notify::DispatchError;
use driv_vault::store::Document;
use driv_vault::{
    Collection, DocumentStore, DrivConfig, DrivVault, Filter, InMemoryStore, LogDispatcher,
    Message, NotificationDispatcher, QuorumPolicy, Records, UnlockWrite, Update,
};
use mockall::mock;

mock! {
    Dispatcher {}

    #[async_trait]
    impl NotificationDispatcher for Dispatcher {
        async fn dispatch(&self, message: Message) -> Result<(), DispatchError>;
    }
}

struct Harness {
    vault: Arc<DrivVault>,
    records: Records,
    owner: Actor,
    vault_id: String,
}

impl Harness {
    async fn new(config: DrivConfig) -> Self {
        Self::with(config, Arc::new(InMemoryStore::new()), Arc::new(LogDispatcher)).await
    }

    async fn with(
        config: DrivConfig,
        store: Arc<dyn DocumentStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        let records = Records::new(store.clone());
        let user = User::new("owner@example.com", "Owner");
        records.insert(Collection::Users, &user).await.unwrap();
        let mut vault = Vault::primary(user.id.as_str());
        vault.is_locked = true;
        records.insert(Collection::Vaults, &vault).await.unwrap();

        Self {
            vault: Arc::new(DrivVault::open(config, store, dispatcher)),
            records,
            owner: Actor::new(user.id),
            vault_id: vault.id,
        }
    }

    async fn add_verifiers(&self, n: usize) {
        for i in 0..n {
            let party = TrustedParty::new(
                self.owner.user_id.as_str(),
                TrustedPartyCreate {
                    vault_id: self.vault_id.clone(),
                    name: format!("Verifier {i}"),
                    email: format!("v{i}@example.com"),
                    role: RoleType::Verifier,
                    phone: None,
                    relationship: None,
                },
            );
            self.records
                .insert(Collection::TrustedParties, &party)
                .await
                .unwrap();
        }
    }

    async fn seed_verified(&self, n: usize) {
        for _ in 0..n {
            let mut v = DeathVerification::new(self.owner.user_id.as_str(), self.request());
            v.status = VerificationStatus::Verified;
            self.records
                .insert(Collection::DeathVerifications, &v)
                .await
                .unwrap();
        }
    }

    fn request(&self) -> DeathVerificationCreate {
        DeathVerificationCreate {
            vault_id: self.vault_id.clone(),
            submitted_by: "party".into(),
            evidence_type: "death_certificate".into(),
            evidence_url: None,
            notes: None,
        }
    }

    async fn submit(&self) -> DeathVerification {
        self.vault
            .verifications()
            .submit(&self.owner, self.request())
            .await
            .unwrap()
    }

    async fn submit_and_verify(&self) {
        let created = self.submit().await;
        self.vault
            .verifications()
            .update_status(&self.owner, &created.id, "verified")
            .await
            .unwrap();
    }

    async fn is_locked(&self) -> bool {
        let vault: Vault = self
            .records
            .find_one(Collection::Vaults, &Filter::new().with("id", self.vault_id.as_str()))
            .await
            .unwrap()
            .unwrap();
        vault.is_locked
    }
}

fn retriggering(policy: QuorumPolicy) -> DrivConfig {
    let mut config = DrivConfig::default();
    config.quorum.policy = policy;
    config.verification.retrigger_on_status_update = true;
    config
}

#[tokio::test]
async fn test_literal_threshold_table() {
    // (registered verifiers, verified needed)
    let table = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 3), (5, 4), (10, 7)];

    for (verifiers, needed) in table {
        let h = Harness::new(retriggering(QuorumPolicy::Literal)).await;
        h.add_verifiers(verifiers).await;

        for _ in 0..needed - 1 {
            h.submit_and_verify().await;
        }
        assert!(h.is_locked().await, "T={verifiers}: locked below {needed}");

        h.submit_and_verify().await;
        assert!(!h.is_locked().await, "T={verifiers}: unlocked at {needed}");
    }
}

#[tokio::test]
async fn test_policies_diverge_at_fifty_verifiers() {
    for (policy, needed) in [(QuorumPolicy::Literal, 33), (QuorumPolicy::TwoThirds, 34)] {
        let h = Harness::new(retriggering(policy)).await;
        h.add_verifiers(50).await;
        h.seed_verified(needed - 1).await;

        let outcome = h
            .vault
            .verifications()
            .recheck(&h.owner, &h.vault_id)
            .await
            .unwrap();
        assert!(!outcome.met, "{policy}: {} verified is short", needed - 1);

        h.submit_and_verify().await;
        assert!(!h.is_locked().await, "{policy}: unlocks at {needed}");
    }
}

#[tokio::test]
async fn test_reference_flow_waits_for_next_submission() {
    let h = Harness::new(DrivConfig::default()).await;

    h.submit_and_verify().await;
    h.submit_and_verify().await;
    assert!(h.is_locked().await, "status updates do not re-evaluate");

    // The next submission counts the two verified records
    let pending = h.submit().await;
    assert_eq!(pending.status, VerificationStatus::Pending);
    assert!(!h.is_locked().await);
}

#[tokio::test]
async fn test_pending_and_rejected_never_unlock() {
    let h = Harness::new(retriggering(QuorumPolicy::Literal)).await;

    for _ in 0..3 {
        h.submit().await;
    }
    let rejected = h.submit().await;
    h.vault
        .verifications()
        .update_status(&h.owner, &rejected.id, "rejected")
        .await
        .unwrap();

    let outcome = h
        .vault
        .verifications()
        .recheck(&h.owner, &h.vault_id)
        .await
        .unwrap();
    assert_eq!(outcome.verified, 0);
    assert!(h.is_locked().await);

    let err = h
        .vault
        .verifications()
        .update_status(&h.owner, &rejected.id, "verified")
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_submission_after_unlock_rewrites_flag() {
    let h = Harness::new(DrivConfig::default()).await;
    h.seed_verified(2).await;

    h.submit().await;
    assert!(!h.is_locked().await);

    let outcome = h
        .vault
        .verifications()
        .recheck(&h.owner, &h.vault_id)
        .await
        .unwrap();
    assert!(outcome.met);
    assert!(!outcome.unlocked);
    assert!(!h.is_locked().await);
}

#[tokio::test]
async fn test_foreign_vault_submission_writes_nothing() {
    let h = Harness::new(DrivConfig::default()).await;
    h.seed_verified(2).await;

    let err = h
        .vault
        .verifications()
        .submit(&Actor::new("stranger"), h.request())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let stored = h
        .records
        .count(Collection::DeathVerifications, &Filter::new())
        .await
        .unwrap();
    assert_eq!(stored, 2);
    assert!(h.is_locked().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_unlock_once() {
    let mut dispatcher = MockDispatcher::new();
    dispatcher
        .expect_dispatch()
        .withf(|m| m.subject == "Vault unlocked")
        .times(1)
        .returning(|_| Ok(()));

    let mut config = DrivConfig::default();
    config.quorum.unlock_write = UnlockWrite::CompareAndSet;
    config.quorum.notify_on_unlock = true;

    let h = Harness::with(config, Arc::new(InMemoryStore::new()), Arc::new(dispatcher)).await;
    h.seed_verified(2).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let vault = h.vault.clone();
            let owner = h.owner.clone();
            let request = h.request();
            tokio::spawn(async move { vault.verifications().submit(&owner, request).await })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        result.unwrap().unwrap();
    }

    assert!(!h.is_locked().await);
    let alerts = h
        .vault
        .notifications()
        .list(&h.owner)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
}

#[tokio::test]
async fn test_submitter_must_be_trusted_party() {
    let mut config = DrivConfig::default();
    config.verification.validate_submitter = true;
    let h = Harness::new(config).await;

    let err = h
        .vault
        .verifications()
        .submit(&h.owner, h.request())
        .await
        .unwrap_err();
    assert!(err.is_validation());

    h.add_verifiers(1).await;
    let parties = h
        .vault
        .trusted_parties()
        .verifiers(&h.owner, &h.vault_id)
        .await
        .unwrap();
    let request = DeathVerificationCreate {
        submitted_by: parties[0].id.clone(),
        ..h.request()
    };
    h.vault
        .verifications()
        .submit(&h.owner, request)
        .await
        .unwrap();
}

/// Store whose vault updates fail while `failing` is set
struct FlakyVaultStore {
    inner: InMemoryStore,
    failing: AtomicBool,
}

#[async_trait]
impl DocumentStore for FlakyVaultStore {
    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<(), StoreError> {
        self.inner.insert_one(collection, doc).await
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.find(collection, filter, limit).await
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<usize, StoreError> {
        self.inner.count(collection, filter).await
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> Result<usize, StoreError> {
        if collection == Collection::Vaults && self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("vault write rejected".into()));
        }
        self.inner.update_one(collection, filter, update).await
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<usize, StoreError> {
        self.inner.delete_one(collection, filter).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.inner.close().await
    }
}

#[tokio::test]
async fn test_failed_unlock_keeps_submission_and_recheck_repairs() {
    let store = Arc::new(FlakyVaultStore {
        inner: InMemoryStore::new(),
        failing: AtomicBool::new(true),
    });
    let h = Harness::with(DrivConfig::default(), store.clone(), Arc::new(LogDispatcher)).await;
    h.seed_verified(2).await;

    let err = h
        .vault
        .verifications()
        .submit(&h.owner, h.request())
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Storage(_)));

    let stored = h.vault.verifications().list(&h.owner, None).await.unwrap();
    assert_eq!(stored.len(), 3, "submission persisted despite failed unlock");
    assert!(h.is_locked().await);

    store.failing.store(false, Ordering::SeqCst);
    let outcome = h
        .vault
        .verifications()
        .recheck(&h.owner, &h.vault_id)
        .await
        .unwrap();
    assert!(outcome.unlocked);
    assert!(!h.is_locked().await);
}

#[tokio::test]
async fn test_shutdown_closes_store() {
    let h = Harness::new(DrivConfig::default()).await;
    h.vault.shutdown().await.unwrap();

    let err = h
        .vault
        .verifications()
        .submit(&h.owner, h.request())
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Storage(StoreError::Closed)));
}

#[tokio::test]
async fn test_registered_session_drives_vault_operations() {
    let vault = DrivVault::in_memory(DrivConfig::default());
    let (session, primary) = vault
        .accounts()
        .register("ada@example.com", "Ada")
        .await
        .unwrap();

    let actor = vault
        .authenticate(&format!("Bearer {}", session.access_token))
        .await
        .unwrap();
    assert_eq!(actor.user_id, session.user.id);
    assert_eq!(vault.vaults().get(&actor, &primary.id).await.unwrap(), primary);

    let subscription = vault
        .subscriptions()
        .create(
            &actor,
            SubscriptionCreate {
                service_name: "Music".into(),
                category: "entertainment".into(),
                amount: 9.99,
                billing_cycle: BillingCycle::Monthly,
                auto_cancel_enabled: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(
        vault.subscriptions().list(&actor).await.unwrap(),
        vec![subscription]
    );

    assert!(vault.accounts().logout(&session.access_token));
    let err = vault.authenticate(&session.access_token).await.unwrap_err();
    assert!(matches!(err, VaultError::Unauthorized));
}

#[tokio::test]
async fn test_failed_retrigger_keeps_status_update() {
    let store = Arc::new(FlakyVaultStore {
        inner: InMemoryStore::new(),
        failing: AtomicBool::new(true),
    });
    let config = retriggering(QuorumPolicy::Literal);
    let h = Harness::with(config, store.clone(), Arc::new(LogDispatcher)).await;
    h.seed_verified(1).await;

    // One verified record is short of quorum, so no vault write happens yet
    let pending = h.submit().await;
    let err = h
        .vault
        .verifications()
        .update_status(&h.owner, &pending.id, "verified")
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Storage(_)));

    let stored: DeathVerification = h
        .records
        .find_one(
            Collection::DeathVerifications,
            &Filter::new().with("id", pending.id.as_str()),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, VerificationStatus::Verified);
    assert!(stored.verified_at.is_some());
    assert!(h.is_locked().await);

    store.failing.store(false, Ordering::SeqCst);
    let outcome = h
        .vault
        .verifications()
        .recheck(&h.owner, &h.vault_id)
        .await
        .unwrap();
    assert!(outcome.unlocked);
}
