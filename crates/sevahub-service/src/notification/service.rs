//! Notification creation, listing, read-state transitions, and fan-out.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use sevahub_core::error::AppError;
use sevahub_core::types::pagination::{PageRequest, PageResponse};
use sevahub_core::types::sorting::SortDirection;
use sevahub_database::repositories::notification::NotificationRepository;
use sevahub_database::repositories::receipt::ReceiptRepository;
use sevahub_entity::notification::Notification;
use sevahub_entity::receipt::{
    NotificationFilter, NotificationReceipt, NotificationSortField, UserNotification,
};

use super::push::RealtimePush;

/// Input for creating a notification.
#[derive(Debug, Clone, Default)]
pub struct CreateNotification {
    /// Short title text; must be non-empty.
    pub title: String,
    /// Free-form body text; must be non-empty.
    pub body: String,
    /// Category string.
    pub category: String,
    /// Optional deep-link.
    pub link: Option<String>,
    /// Optional opaque payload.
    pub metadata: Option<serde_json::Value>,
    /// Convenience single-recipient field, unioned with the explicit
    /// recipient list.
    pub recipient_id: Option<Uuid>,
    /// The acting user, if known.
    pub created_by: Option<Uuid>,
}

/// Partial update of a notification's content fields; `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateNotification {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub body: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New deep-link.
    pub link: Option<String>,
    /// New payload.
    pub metadata: Option<serde_json::Value>,
}

/// Manages notifications and their per-recipient read state.
///
/// The sole writer of the notification store and the recipient ledger.
/// Realtime delivery is strictly best-effort: persistence failures are
/// surfaced, push failures never are.
#[derive(Clone)]
pub struct NotificationService {
    /// Notification store repository.
    notifications: Arc<NotificationRepository>,
    /// Recipient ledger repository.
    receipts: Arc<ReceiptRepository>,
    /// Realtime push capability.
    push: Arc<dyn RealtimePush>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        notifications: Arc<NotificationRepository>,
        receipts: Arc<ReceiptRepository>,
        push: Arc<dyn RealtimePush>,
    ) -> Self {
        Self {
            notifications,
            receipts,
            push,
        }
    }

    /// Creates a notification and ledgers it for the effective recipient set.
    ///
    /// The effective set is the union of `explicit_recipients` and the input's
    /// single-recipient field; an empty union produces a valid notification
    /// with no ledger rows. Fan-out to connected recipients runs on a
    /// detached task after persistence — a failed push never rolls back or
    /// fails the creation.
    pub async fn create(
        &self,
        input: CreateNotification,
        explicit_recipients: &[Uuid],
    ) -> Result<Notification, AppError> {
        if input.title.trim().is_empty() {
            return Err(AppError::validation("Notification title must not be empty"));
        }
        if input.body.trim().is_empty() {
            return Err(AppError::validation("Notification body must not be empty"));
        }

        let recipients: Vec<Uuid> = explicit_recipients
            .iter()
            .copied()
            .chain(input.recipient_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let notification = self
            .notifications
            .create(
                &input.title,
                &input.body,
                &input.category,
                input.link.as_deref(),
                input.metadata.as_ref(),
                input.created_by,
            )
            .await?;

        if !recipients.is_empty() {
            self.receipts
                .create_for_users(notification.id, &recipients)
                .await?;

            let service = self.clone();
            let pushed = notification.clone();
            tokio::spawn(async move {
                service.fan_out(&pushed, &recipients).await;
            });
        }

        Ok(notification)
    }

    /// Lists the caller's notifications joined with their read state.
    pub async fn list(
        &self,
        user_id: Uuid,
        page: PageRequest,
        sort_field: NotificationSortField,
        sort_direction: SortDirection,
        filter: NotificationFilter,
    ) -> Result<PageResponse<UserNotification>, AppError> {
        self.receipts
            .find_page_for_user(user_id, &page, sort_field, sort_direction, &filter)
            .await
    }

    /// Fetches a single notification by id.
    pub async fn get(&self, notification_id: Uuid) -> Result<Notification, AppError> {
        self.notifications
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| notification_not_found(notification_id))
    }

    /// Applies an explicit edit to a notification's content fields.
    pub async fn update(
        &self,
        notification_id: Uuid,
        patch: UpdateNotification,
    ) -> Result<Notification, AppError> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(AppError::validation("Notification title must not be empty"));
            }
        }
        if let Some(body) = &patch.body {
            if body.trim().is_empty() {
                return Err(AppError::validation("Notification body must not be empty"));
            }
        }

        self.notifications
            .update(
                notification_id,
                patch.title.as_deref(),
                patch.body.as_deref(),
                patch.category.as_deref(),
                patch.link.as_deref(),
                patch.metadata.as_ref(),
            )
            .await?
            .ok_or_else(|| notification_not_found(notification_id))
    }

    /// Marks one notification as read for one user.
    ///
    /// Idempotent: re-marking an already-read entry succeeds and returns the
    /// existing row with its original `read_at`. Fails with NotFound when no
    /// ledger entry exists for the pair. An actual transition triggers an
    /// unread-count refresh push to the user's connections.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<NotificationReceipt, AppError> {
        if let Some(receipt) = self.receipts.mark_read(notification_id, user_id).await? {
            self.refresh_unread_count(user_id).await;
            return Ok(receipt);
        }

        // No unread entry matched: either already read (no-op) or never ledgered.
        self.receipts
            .find_one(notification_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Notification {notification_id} not found for this user"
                ))
            })
    }

    /// Marks every unread notification as read for a user; returns the
    /// affected count and pushes one unread-count refresh.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let count = self.receipts.mark_all_read(user_id).await?;
        if count > 0 {
            self.refresh_unread_count(user_id).await;
        }
        Ok(count)
    }

    /// Counts unread, non-archived ledger entries for a user.
    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.receipts.count_unread(user_id).await
    }

    /// Archives (soft-deletes) a notification; ledger rows are kept.
    pub async fn archive(&self, notification_id: Uuid) -> Result<Notification, AppError> {
        self.notifications
            .archive(notification_id)
            .await?
            .ok_or_else(|| notification_not_found(notification_id))
    }

    /// Hard-deletes a notification; its ledger rows cascade away.
    pub async fn remove(&self, notification_id: Uuid) -> Result<(), AppError> {
        let deleted = self.notifications.delete(notification_id).await?;
        if deleted == 0 {
            return Err(notification_not_found(notification_id));
        }
        Ok(())
    }

    /// Best-effort fan-out: the notification event first, then a refreshed
    /// unread count per connected recipient.
    async fn fan_out(&self, notification: &Notification, recipients: &[Uuid]) {
        self.push.push_to_users(recipients, notification).await;

        for user_id in recipients {
            if self.push.is_connected(*user_id) {
                self.refresh_unread_count(*user_id).await;
            }
        }
    }

    /// Pushes the user's current unread count if they are connected.
    async fn refresh_unread_count(&self, user_id: Uuid) {
        if !self.push.is_connected(user_id) {
            return;
        }
        match self.receipts.count_unread(user_id).await {
            Ok(count) => self.push.push_unread_count(user_id, count).await,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to refresh unread count");
            }
        }
    }
}

fn notification_not_found(notification_id: Uuid) -> AppError {
    AppError::not_found(format!("Notification {notification_id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sevahub_core::error::ErrorKind;
    use sqlx::PgPool;

    /// Push sink for tests that never reach the transport.
    struct NullPush;

    #[async_trait]
    impl RealtimePush for NullPush {
        fn is_connected(&self, _user_id: Uuid) -> bool {
            false
        }
        async fn push_to_users(&self, _user_ids: &[Uuid], _notification: &Notification) {}
        async fn push_unread_count(&self, _user_id: Uuid, _count: i64) {}
    }

    /// A lazily-connected pool; validation tests fail before any query runs.
    fn service() -> NotificationService {
        let pool = PgPool::connect_lazy("postgres://localhost:5432/sevahub_test")
            .expect("lazy pool");
        NotificationService::new(
            Arc::new(NotificationRepository::new(pool.clone())),
            Arc::new(ReceiptRepository::new(pool)),
            Arc::new(NullPush),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let err = service()
            .create(
                CreateNotification {
                    title: "   ".to_string(),
                    body: "A body".to_string(),
                    category: "info".to_string(),
                    ..Default::default()
                },
                &[],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_body() {
        let err = service()
            .create(
                CreateNotification {
                    title: "A title".to_string(),
                    body: String::new(),
                    category: "info".to_string(),
                    ..Default::default()
                },
                &[],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title_patch() {
        let err = service()
            .update(
                Uuid::new_v4(),
                UpdateNotification {
                    title: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
