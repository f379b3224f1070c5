//! Push capability consumed by the notification service.

use async_trait::async_trait;
use uuid::Uuid;

use sevahub_entity::notification::Notification;

/// Best-effort realtime delivery to currently connected users.
///
/// Implemented by the gateway side; injected into
/// [`super::NotificationService`] so the dependency arrow points one way.
/// None of these calls may fail the caller: the ledger is the source of
/// truth, the transport is not.
#[async_trait]
pub trait RealtimePush: Send + Sync {
    /// Whether the user currently has at least one registered connection.
    fn is_connected(&self, user_id: Uuid) -> bool;

    /// Emit a `new_notification` event to every registered connection of
    /// every listed user. Users without connections are silently skipped.
    async fn push_to_users(&self, user_ids: &[Uuid], notification: &Notification);

    /// Emit a refreshed `unread_count` to every registered connection of
    /// the user.
    async fn push_unread_count(&self, user_id: Uuid, count: i64);
}
