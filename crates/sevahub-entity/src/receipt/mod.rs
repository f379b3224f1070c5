//! Recipient ledger entity.

pub mod model;
pub mod query;

pub use model::{NotificationReceipt, UserNotification};
pub use query::{NotificationFilter, NotificationSortField};
