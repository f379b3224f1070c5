//! Concrete repository implementations.

pub mod notification;
pub mod receipt;

pub use notification::NotificationRepository;
pub use receipt::ReceiptRepository;
