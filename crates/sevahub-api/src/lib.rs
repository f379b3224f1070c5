//! # sevahub-api
//!
//! The HTTP and WebSocket surface. Thin axum handlers over
//! [`sevahub_service::NotificationService`] plus the `/ws` upgrade that hands
//! connections to the realtime gateway.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
