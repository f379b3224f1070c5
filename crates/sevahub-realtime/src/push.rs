//! Registry-backed implementation of the service's push capability.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use sevahub_entity::notification::Notification;
use sevahub_service::RealtimePush;

use crate::connection::registry::ConnectionRegistry;
use crate::message::types::OutboundMessage;

/// Pushes events to every registered connection of the targeted users.
///
/// Built over the same registry the gateway maintains; users without
/// connections are silently skipped, since their ledger rows already hold
/// the pending state. Delivery is at-most-once per handle — no retries, no
/// acknowledgements.
#[derive(Debug)]
pub struct RegistryPush {
    /// Shared connection registry.
    registry: Arc<ConnectionRegistry>,
}

impl RegistryPush {
    /// Creates a push capability over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RealtimePush for RegistryPush {
    fn is_connected(&self, user_id: Uuid) -> bool {
        self.registry.is_connected(user_id)
    }

    async fn push_to_users(&self, user_ids: &[Uuid], notification: &Notification) {
        let event = OutboundMessage::new_notification(notification);

        for user_id in user_ids {
            let handles = self.registry.handles_for(*user_id);
            if handles.is_empty() {
                debug!(
                    user_id = %user_id,
                    notification_id = %notification.id,
                    "Recipient offline, skipping live push"
                );
                continue;
            }
            for handle in &handles {
                handle.send(event.clone());
            }
        }
    }

    async fn push_unread_count(&self, user_id: Uuid, count: i64) {
        for handle in &self.registry.handles_for(user_id) {
            handle.send(OutboundMessage::UnreadCount { count });
        }
    }
}
