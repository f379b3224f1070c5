//! Shared test helpers for api integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use sevahub_api::state::AppState;
use sevahub_auth::{JwtVerifier, TokenVerifier};
use sevahub_core::config::app::ServerConfig;
use sevahub_core::config::auth::AuthConfig;
use sevahub_core::config::logging::LoggingConfig;
use sevahub_core::config::realtime::RealtimeConfig;
use sevahub_core::config::{AppConfig, DatabaseConfig};
use sevahub_database::repositories::notification::NotificationRepository;
use sevahub_database::repositories::receipt::ReceiptRepository;
use sevahub_realtime::gateway::NotificationApi;
use sevahub_realtime::{ConnectionRegistry, RealtimeGateway, RegistryPush};
use sevahub_service::{NotificationService, RealtimePush};

/// Secret shared between the test token mint and the verifier.
pub const JWT_SECRET: &str = "integration-test-secret";

/// Test application context.
pub struct TestApp {
    /// The axum router for making in-process requests.
    pub router: Router,
    /// The state behind the router, for direct registry/push access.
    pub state: AppState,
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body (Null when the body is not JSON).
    pub body: Value,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgres://localhost:5432/sevahub_test".to_string(),
            max_connections: 5,
            connect_timeout_seconds: 2,
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            leeway_seconds: 0,
        },
        realtime: RealtimeConfig::default(),
        logging: LoggingConfig::default(),
    }
}

/// Build a fully wired state over a lazily-connected pool. Tests that never
/// reach the database run without one.
pub fn build_state() -> AppState {
    let config = test_config();

    let db_pool = PgPool::connect_lazy(&config.database.url).expect("lazy pool");

    let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
    let receipt_repo = Arc::new(ReceiptRepository::new(db_pool.clone()));

    let registry = Arc::new(ConnectionRegistry::new());
    let push: Arc<dyn RealtimePush> = Arc::new(RegistryPush::new(Arc::clone(&registry)));

    let notification_service = Arc::new(NotificationService::new(
        notification_repo,
        receipt_repo,
        push,
    ));

    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtVerifier::new(&config.auth));
    let notification_api: Arc<dyn NotificationApi> = notification_service.clone();
    let gateway = Arc::new(RealtimeGateway::new(
        config.realtime.clone(),
        Arc::clone(&registry),
        Arc::clone(&verifier),
        notification_api,
    ));

    AppState {
        config: Arc::new(config),
        db_pool,
        verifier,
        registry,
        gateway,
        notification_service,
    }
}

impl TestApp {
    /// Create a new test application.
    pub fn new() -> Self {
        let state = build_state();
        let router = sevahub_api::router::build_router(state.clone());
        Self { router, state }
    }

    /// Make an HTTP request against the in-process router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req.body(Body::from(body_str)).expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Mint a valid access token for a user.
pub fn token_for(user_id: Uuid) -> String {
    let claims = serde_json::json!({
        "sub": user_id,
        "exp": Utc::now().timestamp() + 600,
        "iat": Utc::now().timestamp(),
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode token")
}

/// Bind an ephemeral port and serve the app; returns the address and state.
pub async fn spawn_server() -> (SocketAddr, AppState) {
    let state = build_state();
    let router = sevahub_api::router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    (addr, state)
}
