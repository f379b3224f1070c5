//! Filter and sort parameters for the per-user notification listing.

use serde::{Deserialize, Serialize};

use sevahub_core::AppError;

/// Optional filters applied to the notification listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationFilter {
    /// Case-insensitive substring match against title and body.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Read-state filter.
    pub is_read: Option<bool>,
}

/// Columns the notification listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSortField {
    /// Sort by notification title.
    Title,
    /// Sort by category.
    Category,
    /// Sort by creation time.
    CreatedAt,
}

impl NotificationSortField {
    /// The whitelisted SQL column for this field. Never interpolate a
    /// caller-supplied string into ORDER BY.
    pub fn as_column(&self) -> &'static str {
        match self {
            Self::Title => "n.title",
            Self::Category => "n.category",
            Self::CreatedAt => "n.created_at",
        }
    }

    /// Parse a sort-field name; unknown fields are a validation error.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "title" => Ok(Self::Title),
            "category" => Ok(Self::Category),
            "created_at" => Ok(Self::CreatedAt),
            other => Err(AppError::validation(format!(
                "Unsupported sort field: {other}"
            ))),
        }
    }
}

impl Default for NotificationSortField {
    fn default() -> Self {
        Self::CreatedAt
    }
}
