//! Recipient ledger models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One recipient-ledger entry: the delivery/read state of a single
/// notification for a single user.
///
/// At most one entry exists per (notification, user) pair. `read_at` is set
/// exactly once, when `is_read` transitions false→true.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationReceipt {
    /// The notification this entry belongs to.
    pub notification_id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Whether the recipient has read the notification.
    pub is_read: bool,
    /// When the recipient read the notification.
    pub read_at: Option<DateTime<Utc>>,
    /// Soft-delete flag, independent of the parent notification's archival.
    pub archived: bool,
}

/// A notification joined with the caller's ledger entry, as surfaced by
/// the list operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserNotification {
    /// Notification identifier.
    pub id: Uuid,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Notification category.
    pub category: String,
    /// Optional deep-link.
    pub link: Option<String>,
    /// Optional opaque payload.
    pub metadata: Option<serde_json::Value>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Whether this user has read it.
    pub is_read: bool,
    /// When this user read it.
    pub read_at: Option<DateTime<Utc>>,
}
