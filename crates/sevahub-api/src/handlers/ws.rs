//! WebSocket upgrade handler.

use std::collections::HashMap;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::warn;

use sevahub_auth::VerifiedSubject;
use sevahub_realtime::connection::credentials::HandshakeParts;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws — authenticate, then upgrade.
///
/// Authentication happens before the upgrade completes, so a rejected
/// connection simply closes with no structured body.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let parts = HandshakeParts::new(
        query,
        header_value(&headers, header::AUTHORIZATION),
        header_value(&headers, header::COOKIE),
    );
    let subject = state.gateway.authenticate(&parts).await?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, subject, socket)))
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Drives an established connection: register, catch up, pump messages,
/// unregister on close.
async fn handle_socket(state: AppState, subject: VerifiedSubject, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.gateway.register(subject.user_id);
    let conn_id = handle.id;

    state.gateway.send_catch_up(&handle).await;

    // Forward queued outbound messages onto the socket.
    let forwarder = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let Ok(text) = serde_json::to_string(&msg) else {
                continue;
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound frames are processed in arrival order, one at a time.
    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                state.gateway.handle_inbound(&handle, &text).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    forwarder.abort();
    state.gateway.unregister(&conn_id);
}
