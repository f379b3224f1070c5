//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use sevahub_auth::TokenVerifier;
use sevahub_core::config::AppConfig;
use sevahub_realtime::{ConnectionRegistry, RealtimeGateway};
use sevahub_service::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Token verifier for REST authentication.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Live-connection registry (maintained by the gateway).
    pub registry: Arc<ConnectionRegistry>,
    /// Realtime gateway.
    pub gateway: Arc<RealtimeGateway>,
    /// Notification service.
    pub notification_service: Arc<NotificationService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}
