//! Notification service.

pub mod push;
pub mod service;

pub use push::RealtimePush;
pub use service::{CreateNotification, NotificationService, UpdateNotification};
