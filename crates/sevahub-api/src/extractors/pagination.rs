//! Pagination and sorting query parameters.

use serde::{Deserialize, Serialize};

use sevahub_core::error::AppError;
use sevahub_core::types::pagination::PageRequest;
use sevahub_core::types::sorting::SortDirection;
use sevahub_entity::receipt::NotificationSortField;

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 25, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Sort field (optional).
    pub sort_by: Option<String>,
    /// Sort direction: "asc" or "desc".
    pub sort_dir: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

impl PaginationParams {
    /// Converts to a `PageRequest`.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    /// Resolves the sort field against the listing whitelist.
    pub fn sort_field(&self) -> Result<NotificationSortField, AppError> {
        match &self.sort_by {
            Some(field) => NotificationSortField::parse(field),
            None => Ok(NotificationSortField::default()),
        }
    }

    /// Resolves the sort direction (newest first by default).
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_dir
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or_default()
    }
}
