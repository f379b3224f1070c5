//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recipient-independent notification record.
///
/// Who receives it — and whether they have read it — lives in the
/// per-recipient ledger ([`crate::receipt::NotificationReceipt`]), never here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier, assigned at creation.
    pub id: Uuid,
    /// Short title text.
    pub title: String,
    /// Free-form body text.
    pub body: String,
    /// Category string; well-known values are listed in
    /// [`super::NotificationCategory`] but the column is open to extension.
    pub category: String,
    /// Optional deep-link for the client to follow.
    pub link: Option<String>,
    /// Optional opaque key/value payload (JSON).
    pub metadata: Option<serde_json::Value>,
    /// The actor that created the notification, if known.
    pub created_by: Option<Uuid>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Soft-delete flag; archived notifications are hidden from listings
    /// but their ledger rows are kept.
    pub archived: bool,
}
