//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create notification request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    /// Title.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Body.
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
    /// Category.
    #[serde(default = "default_category")]
    pub category: String,
    /// Optional deep-link.
    pub link: Option<String>,
    /// Optional opaque payload.
    pub metadata: Option<serde_json::Value>,
    /// Convenience single recipient.
    pub recipient_id: Option<Uuid>,
    /// Explicit recipient list.
    #[serde(default)]
    pub recipient_ids: Vec<Uuid>,
}

fn default_category() -> String {
    "info".to_string()
}

/// Update notification request body; omitted fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNotificationRequest {
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

/// Listing filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationFilterParams {
    /// Case-insensitive substring match on title/body.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Read-state filter.
    pub is_read: Option<bool>,
}
