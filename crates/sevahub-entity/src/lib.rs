//! # sevahub-entity
//!
//! Domain entity models for Sevahub: the recipient-independent
//! [`notification::Notification`] record and the per-(notification, user)
//! [`receipt::NotificationReceipt`] ledger entry.

pub mod notification;
pub mod receipt;

pub use notification::{Notification, NotificationCategory};
pub use receipt::{NotificationReceipt, UserNotification};
