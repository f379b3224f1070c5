//! Realtime gateway — authenticated registration and inbound message handling.
//!
//! Per-connection state machine: Connecting → Authenticating → Registered →
//! Closed. [`RealtimeGateway::authenticate`] covers the first two transitions
//! and rejects before the transport is upgraded; registration joins the
//! user's broadcast group and immediately pushes a catch-up unread count.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sevahub_auth::{TokenVerifier, VerifiedSubject};
use sevahub_core::config::realtime::RealtimeConfig;
use sevahub_core::error::AppError;
use sevahub_entity::receipt::NotificationReceipt;
use sevahub_service::NotificationService;

use crate::connection::credentials::{HandshakeParts, extract_credential};
use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::registry::ConnectionRegistry;
use crate::message::types::{InboundMessage, OutboundMessage};

/// The slice of the notification service the gateway needs.
///
/// Injected as a trait so the gateway and service form a capability pair
/// rather than a circular object graph, and so tests can substitute a stub.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Current unread count for a user.
    async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError>;

    /// Mark one notification as read for a user.
    async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<NotificationReceipt, AppError>;
}

#[async_trait]
impl NotificationApi for NotificationService {
    async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        NotificationService::unread_count(self, user_id).await
    }

    async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<NotificationReceipt, AppError> {
        NotificationService::mark_read(self, notification_id, user_id).await
    }
}

/// Terminates persistent connections: authenticates them, maintains the
/// connection registry, and services the small inbound message set.
pub struct RealtimeGateway {
    /// Gateway configuration.
    config: RealtimeConfig,
    /// Registry of live connections, owned here, injected elsewhere.
    registry: Arc<ConnectionRegistry>,
    /// External credential verifier.
    verifier: Arc<dyn TokenVerifier>,
    /// Read-state operations, served by the notification service.
    notifications: Arc<dyn NotificationApi>,
}

impl std::fmt::Debug for RealtimeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeGateway")
            .field("config", &self.config)
            .finish()
    }
}

impl RealtimeGateway {
    /// Creates a new gateway.
    pub fn new(
        config: RealtimeConfig,
        registry: Arc<ConnectionRegistry>,
        verifier: Arc<dyn TokenVerifier>,
        notifications: Arc<dyn NotificationApi>,
    ) -> Self {
        Self {
            config,
            registry,
            verifier,
            notifications,
        }
    }

    /// The registry this gateway maintains.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Connecting → Authenticating: extract a credential and verify it.
    ///
    /// A missing credential, a failed verification, or a verified payload
    /// without a usable identity all reject the connection; the caller closes
    /// the transport without further detail.
    pub async fn authenticate(&self, parts: &HandshakeParts) -> Result<VerifiedSubject, AppError> {
        let (source, token) = extract_credential(parts)
            .ok_or_else(|| AppError::authentication("No credential presented"))?;

        let subject = self.verifier.verify(&token).await?;

        debug!(
            user_id = %subject.user_id,
            credential_source = source,
            "Connection authenticated"
        );
        Ok(subject)
    }

    /// Authenticating → Registered: add the connection to the registry,
    /// joining the user's broadcast group.
    ///
    /// Returns the handle and the receiver the transport task drains.
    pub fn register(
        &self,
        user_id: Uuid,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, tx));
        self.registry.register(Arc::clone(&handle));

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            connections = self.registry.connection_count(),
            "Connection registered"
        );
        (handle, rx)
    }

    /// Push the current unread count to one freshly registered connection,
    /// compensating for events missed while disconnected.
    pub async fn send_catch_up(&self, handle: &ConnectionHandle) {
        match self.notifications.unread_count(handle.user_id).await {
            Ok(count) => {
                handle.send(OutboundMessage::UnreadCount { count });
            }
            Err(e) => {
                warn!(
                    conn_id = %handle.id,
                    user_id = %handle.user_id,
                    error = %e,
                    "Failed to load catch-up unread count"
                );
            }
        }
    }

    /// Handle one inbound frame from a registered connection.
    ///
    /// The read-state operations always use the connection's authenticated
    /// identity. Frames that are not a known message type are ignored.
    pub async fn handle_inbound(&self, handle: &ConnectionHandle, raw: &str) {
        let msg: InboundMessage = match serde_json::from_str(raw) {
            Ok(msg) => msg,
            Err(_) => {
                debug!(conn_id = %handle.id, "Ignoring unrecognized inbound frame");
                return;
            }
        };

        match msg {
            InboundMessage::MarkAsRead { notification_id } => {
                // The service's refresh push delivers the updated unread
                // count to every connection of this user.
                let reply = match self
                    .notifications
                    .mark_read(notification_id, handle.user_id)
                    .await
                {
                    Ok(_) => OutboundMessage::MarkAsReadResult {
                        success: true,
                        message: "Notification marked as read".to_string(),
                    },
                    Err(e) => OutboundMessage::MarkAsReadResult {
                        success: false,
                        message: e.message,
                    },
                };
                handle.send(reply);
            }
            InboundMessage::GetUnreadCount => {
                let reply = match self.notifications.unread_count(handle.user_id).await {
                    Ok(count) => OutboundMessage::UnreadCountResult {
                        success: true,
                        count: Some(count),
                        message: None,
                    },
                    Err(e) => OutboundMessage::UnreadCountResult {
                        success: false,
                        count: None,
                        message: Some(e.message),
                    },
                };
                handle.send(reply);
            }
        }
    }

    /// Registered → Closed: remove the connection; the user entry goes with
    /// its last handle.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.registry.unregister(conn_id) {
            handle.mark_closed();
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                connections = self.registry.connection_count(),
                "Connection unregistered"
            );
        }
    }
}
