//! In-app notifications

use driv_common::{Actor, Notification, NotificationCreate, Result, VaultError};

use crate::store::{Collection, Filter, Records, Update};

#[derive(Debug, Clone)]
pub struct NotificationService {
    records: Records,
}

impl NotificationService {
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    pub async fn create(&self, actor: &Actor, create: NotificationCreate) -> Result<Notification> {
        let notification = Notification::new(actor.user_id.as_str(), create);
        self.records
            .insert(Collection::Notifications, &notification)
            .await?;
        Ok(notification)
    }

    /// Newest first, capped at [`driv_common::NOTIFICATION_LIST_LIMIT`]
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .records
            .find(
                Collection::Notifications,
                &Filter::new().with("user_id", actor.user_id.as_str()),
                None,
            )
            .await?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(driv_common::NOTIFICATION_LIST_LIMIT);
        Ok(notifications)
    }

    /// Fails with not found when nothing changed, including an already-read notification
    pub async fn mark_read(&self, actor: &Actor, notification_id: &str) -> Result<()> {
        let modified = self
            .records
            .update_one(
                Collection::Notifications,
                &Filter::new()
                    .with("id", notification_id)
                    .with("user_id", actor.user_id.as_str()),
                &Update::new().set("is_read", true),
            )
            .await?;
        if modified == 0 {
            return Err(VaultError::not_found("Notification", notification_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use driv_common::NotificationKind;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_newest_first_and_mark_read() {
        let service = NotificationService::new(Records::new(Arc::new(InMemoryStore::new())));
        let alice = Actor::new("alice");

        let first = service
            .create(
                &alice,
                NotificationCreate {
                    title: "first".into(),
                    message: "m".into(),
                    kind: NotificationKind::Info,
                },
            )
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = service
            .create(
                &alice,
                NotificationCreate {
                    title: "second".into(),
                    message: "m".into(),
                    kind: NotificationKind::Warning,
                },
            )
            .await
            .unwrap();

        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        service.mark_read(&alice, &first.id).await.unwrap();
        assert!(service.mark_read(&alice, &first.id).await.unwrap_err().is_not_found());
        assert!(service
            .mark_read(&Actor::new("bob"), &second.id)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
