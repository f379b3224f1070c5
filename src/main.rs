//! Sevahub Server — charity operations notification backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use sevahub_auth::{JwtVerifier, TokenVerifier};
use sevahub_core::config::AppConfig;
use sevahub_core::error::AppError;
use sevahub_database::repositories::notification::NotificationRepository;
use sevahub_database::repositories::receipt::ReceiptRepository;
use sevahub_realtime::gateway::NotificationApi;
use sevahub_realtime::{ConnectionRegistry, RealtimeGateway, RegistryPush};
use sevahub_service::{NotificationService, RealtimePush};

#[tokio::main]
async fn main() {
    let env = std::env::var("SEVAHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Sevahub v{}", env!("CARGO_PKG_VERSION"));

    // ── Database ─────────────────────────────────────────────────
    let db_pool = sevahub_database::connection::create_pool(&config.database).await?;
    sevahub_database::migration::run_migrations(&db_pool).await?;

    // ── Repositories ─────────────────────────────────────────────
    let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
    let receipt_repo = Arc::new(ReceiptRepository::new(db_pool.clone()));

    // ── Realtime registry + push capability ──────────────────────
    let registry = Arc::new(ConnectionRegistry::new());
    let push: Arc<dyn RealtimePush> = Arc::new(RegistryPush::new(Arc::clone(&registry)));

    // ── Services ─────────────────────────────────────────────────
    let notification_service = Arc::new(NotificationService::new(
        notification_repo,
        receipt_repo,
        push,
    ));

    // ── Gateway ──────────────────────────────────────────────────
    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtVerifier::new(&config.auth));
    let notification_api: Arc<dyn NotificationApi> = notification_service.clone();
    let gateway = Arc::new(RealtimeGateway::new(
        config.realtime.clone(),
        Arc::clone(&registry),
        Arc::clone(&verifier),
        notification_api,
    ));

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = sevahub_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool,
        verifier,
        registry,
        gateway,
        notification_service,
    };

    let app = sevahub_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Sevahub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Sevahub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
