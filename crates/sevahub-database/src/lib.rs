//! # sevahub-database
//!
//! PostgreSQL connection management and concrete repository implementations
//! for the notification store and the recipient ledger.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::create_pool;
