//! # sevahub-service
//!
//! Business logic. [`notification::NotificationService`] is the sole writer
//! of the notification store and the recipient ledger; realtime delivery is
//! reached through the [`notification::RealtimePush`] capability so the
//! service never depends on the gateway.

pub mod notification;

pub use notification::{NotificationService, RealtimePush};
