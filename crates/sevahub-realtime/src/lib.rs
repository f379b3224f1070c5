//! # sevahub-realtime
//!
//! Realtime delivery for Sevahub:
//!
//! - [`connection::ConnectionRegistry`] — in-memory map of user identity to
//!   live connection handles, reconstructed from zero on restart
//! - [`gateway::RealtimeGateway`] — authenticated connection registration,
//!   catch-up unread counts, and inbound message handling
//! - [`push::RegistryPush`] — the push capability handed to the
//!   notification service
//!
//! Delivery is at-most-once per connected handle; the recipient ledger, not
//! the transport, is the source of truth.

pub mod connection;
pub mod gateway;
pub mod message;
pub mod push;

pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use connection::registry::ConnectionRegistry;
pub use gateway::{NotificationApi, RealtimeGateway};
pub use push::RegistryPush;
