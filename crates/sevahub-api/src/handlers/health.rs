//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// GET /api/health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/health/detailed
pub async fn detailed_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match sevahub_database::connection::health_check(&state.db_pool).await {
        Ok(()) => "up",
        Err(_) => "down",
    };

    Json(serde_json::json!({
        "status": "ok",
        "database": database,
        "connections": state.registry.connection_count(),
        "connected_users": state.registry.user_count(),
    }))
}
