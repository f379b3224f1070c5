//! Inbound and outbound gateway message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sevahub_entity::notification::Notification;

/// Messages a registered client may send to the gateway.
///
/// Frames that do not parse into one of these types are ignored, not errored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Mark one notification as read for the connection's authenticated user.
    MarkAsRead {
        /// Notification ID.
        #[serde(alias = "notificationId")]
        notification_id: Uuid,
    },
    /// Ask for the current unread count.
    GetUnreadCount,
}

/// Messages the gateway pushes to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A freshly created notification targeted at this user.
    NewNotification {
        /// Notification ID.
        id: Uuid,
        /// Title.
        title: String,
        /// Body.
        body: String,
        /// Category.
        category: String,
        /// Optional deep-link.
        link: Option<String>,
        /// Optional opaque payload.
        metadata: Option<serde_json::Value>,
        /// Creation time.
        created_at: DateTime<Utc>,
        /// Always false at delivery time.
        is_read: bool,
    },
    /// Current unread count; sent on connect and after read-state mutations.
    UnreadCount {
        /// Unread, non-archived ledger entries for this user.
        count: i64,
    },
    /// Reply to an inbound `mark_as_read`.
    MarkAsReadResult {
        /// Whether the transition (or no-op re-mark) succeeded.
        success: bool,
        /// Outcome description.
        message: String,
    },
    /// Reply to an inbound `get_unread_count`.
    UnreadCountResult {
        /// Whether the count was produced.
        success: bool,
        /// The count, when successful.
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<i64>,
        /// Error description, when not.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl OutboundMessage {
    /// Build the delivery event for a notification. `is_read` is always
    /// false: anything being pushed was just ledgered unread.
    pub fn new_notification(notification: &Notification) -> Self {
        Self::NewNotification {
            id: notification.id,
            title: notification.title.clone(),
            body: notification.body.clone(),
            category: notification.category.clone(),
            link: notification.link.clone(),
            metadata: notification.metadata.clone(),
            created_at: notification.created_at,
            is_read: false,
        }
    }
}
