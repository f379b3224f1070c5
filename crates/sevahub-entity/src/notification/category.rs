//! Notification category enumeration.

use serde::{Deserialize, Serialize};

/// Well-known notification categories.
///
/// Notifications store the category as free text so that new domain
/// categories (e.g. "donation") can be introduced without a schema change;
/// this enum covers the values the platform itself emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Informational message.
    Info,
    /// Success confirmation.
    Success,
    /// Warning message.
    Warning,
    /// Error report.
    Error,
    /// A domain event (donation received, report approved, ...).
    DomainEvent,
    /// System-level notification.
    System,
}

impl NotificationCategory {
    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::DomainEvent => "domain_event",
            Self::System => "system",
        }
    }

    /// Parse a well-known category string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "domain_event" => Some(Self::DomainEvent),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
