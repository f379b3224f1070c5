//! Integration tests for gateway registration, catch-up, and fan-out.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

use sevahub_auth::{TokenVerifier, VerifiedSubject};
use sevahub_core::config::realtime::RealtimeConfig;
use sevahub_core::error::{AppError, ErrorKind};
use sevahub_entity::notification::Notification;
use sevahub_entity::receipt::NotificationReceipt;
use sevahub_realtime::connection::credentials::HandshakeParts;
use sevahub_realtime::gateway::{NotificationApi, RealtimeGateway};
use sevahub_realtime::message::types::OutboundMessage;
use sevahub_realtime::{ConnectionRegistry, RegistryPush};
use sevahub_service::RealtimePush;

const GOOD_TOKEN: &str = "good-token";

/// Verifier stub: one fixed token maps to one fixed subject.
struct StubVerifier {
    user_id: Uuid,
}

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedSubject, AppError> {
        if token == GOOD_TOKEN {
            Ok(VerifiedSubject {
                user_id: self.user_id,
            })
        } else {
            Err(AppError::authentication("Invalid token signature"))
        }
    }
}

/// In-memory notification state honoring the service's push contract:
/// a real read transition pushes the refreshed unread count.
struct MockNotifications {
    counts: Mutex<HashMap<Uuid, i64>>,
    unread: Mutex<HashSet<(Uuid, Uuid)>>,
    push: Arc<RegistryPush>,
}

impl MockNotifications {
    fn new(push: Arc<RegistryPush>) -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            unread: Mutex::new(HashSet::new()),
            push,
        }
    }

    fn seed(&self, notification_id: Uuid, user_id: Uuid) {
        self.unread
            .lock()
            .unwrap()
            .insert((notification_id, user_id));
        *self.counts.lock().unwrap().entry(user_id).or_insert(0) += 1;
    }
}

#[async_trait]
impl NotificationApi for MockNotifications {
    async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        Ok(*self.counts.lock().unwrap().get(&user_id).unwrap_or(&0))
    }

    async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<NotificationReceipt, AppError> {
        let transitioned = self
            .unread
            .lock()
            .unwrap()
            .remove(&(notification_id, user_id));
        if !transitioned {
            return Err(AppError::not_found("Notification not found for this user"));
        }

        let count = {
            let mut counts = self.counts.lock().unwrap();
            let entry = counts.entry(user_id).or_insert(0);
            *entry -= 1;
            *entry
        };
        self.push.push_unread_count(user_id, count).await;

        Ok(NotificationReceipt {
            notification_id,
            user_id,
            is_read: true,
            read_at: Some(Utc::now()),
            archived: false,
        })
    }
}

struct Harness {
    gateway: RealtimeGateway,
    registry: Arc<ConnectionRegistry>,
    push: Arc<RegistryPush>,
    notifications: Arc<MockNotifications>,
    user_id: Uuid,
}

fn harness() -> Harness {
    let user_id = Uuid::new_v4();
    let registry = Arc::new(ConnectionRegistry::new());
    let push = Arc::new(RegistryPush::new(Arc::clone(&registry)));
    let notifications = Arc::new(MockNotifications::new(Arc::clone(&push)));
    let gateway = RealtimeGateway::new(
        RealtimeConfig::default(),
        Arc::clone(&registry),
        Arc::new(StubVerifier { user_id }),
        Arc::clone(&notifications) as Arc<dyn NotificationApi>,
    );
    Harness {
        gateway,
        registry,
        push,
        notifications,
        user_id,
    }
}

fn sample_notification() -> Notification {
    Notification {
        id: Uuid::new_v4(),
        title: "Donation received".to_string(),
        body: "Rs. 5000".to_string(),
        category: "donation".to_string(),
        link: None,
        metadata: None,
        created_by: None,
        created_at: Utc::now(),
        archived: false,
    }
}

async fn recv(rx: &mut mpsc::Receiver<OutboundMessage>) -> OutboundMessage {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("channel closed")
}

fn query_with_token(token: &str) -> HandshakeParts {
    HandshakeParts::new(
        [("token".to_string(), token.to_string())].into(),
        None,
        None,
    )
}

#[tokio::test]
async fn test_missing_credential_is_rejected() {
    let h = harness();

    let err = h
        .gateway
        .authenticate(&HandshakeParts::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(h.registry.connection_count(), 0);
}

#[tokio::test]
async fn test_invalid_token_never_registers() {
    let h = harness();

    let err = h
        .gateway
        .authenticate(&query_with_token("expired-token"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(h.registry.user_count(), 0);
}

#[tokio::test]
async fn test_connect_receives_catch_up_count() {
    let h = harness();
    h.notifications.seed(Uuid::new_v4(), h.user_id);
    h.notifications.seed(Uuid::new_v4(), h.user_id);

    let subject = h
        .gateway
        .authenticate(&query_with_token(GOOD_TOKEN))
        .await
        .unwrap();
    let (handle, mut rx) = h.gateway.register(subject.user_id);
    h.gateway.send_catch_up(&handle).await;

    match recv(&mut rx).await {
        OutboundMessage::UnreadCount { count } => assert_eq!(count, 2),
        other => panic!("expected unread_count, got {other:?}"),
    }
}

#[tokio::test]
async fn test_push_reaches_both_connections_of_a_user() {
    let h = harness();
    let (_handle_a, mut rx_a) = h.gateway.register(h.user_id);
    let (_handle_b, mut rx_b) = h.gateway.register(h.user_id);

    let notification = sample_notification();
    h.push.push_to_users(&[h.user_id], &notification).await;

    for rx in [&mut rx_a, &mut rx_b] {
        match recv(rx).await {
            OutboundMessage::NewNotification { id, is_read, .. } => {
                assert_eq!(id, notification.id);
                assert!(!is_read);
            }
            other => panic!("expected new_notification, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_push_to_offline_user_is_silently_skipped() {
    let h = harness();

    // No connections at all; must not error or panic.
    h.push
        .push_to_users(&[Uuid::new_v4()], &sample_notification())
        .await;
    assert!(!h.push.is_connected(Uuid::new_v4()));
}

#[tokio::test]
async fn test_mark_as_read_updates_every_connection() {
    let h = harness();
    let notification_id = Uuid::new_v4();
    h.notifications.seed(notification_id, h.user_id);
    h.notifications.seed(Uuid::new_v4(), h.user_id);

    let (handle_a, mut rx_a) = h.gateway.register(h.user_id);
    let (_handle_b, mut rx_b) = h.gateway.register(h.user_id);

    let frame = serde_json::json!({
        "type": "mark_as_read",
        "notification_id": notification_id,
    })
    .to_string();
    h.gateway.handle_inbound(&handle_a, &frame).await;

    // The refresh push lands on both connections before the ack is queued
    // on the initiating one.
    match recv(&mut rx_a).await {
        OutboundMessage::UnreadCount { count } => assert_eq!(count, 1),
        other => panic!("expected unread_count, got {other:?}"),
    }
    match recv(&mut rx_a).await {
        OutboundMessage::MarkAsReadResult { success, .. } => assert!(success),
        other => panic!("expected mark_as_read_result, got {other:?}"),
    }
    match recv(&mut rx_b).await {
        OutboundMessage::UnreadCount { count } => assert_eq!(count, 1),
        other => panic!("expected unread_count, got {other:?}"),
    }
}

#[tokio::test]
async fn test_mark_as_read_for_unknown_pair_replies_failure() {
    let h = harness();
    let (handle, mut rx) = h.gateway.register(h.user_id);

    let frame = serde_json::json!({
        "type": "mark_as_read",
        "notification_id": Uuid::new_v4(),
    })
    .to_string();
    h.gateway.handle_inbound(&handle, &frame).await;

    match recv(&mut rx).await {
        OutboundMessage::MarkAsReadResult { success, .. } => assert!(!success),
        other => panic!("expected mark_as_read_result, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_unread_count_replies() {
    let h = harness();
    h.notifications.seed(Uuid::new_v4(), h.user_id);

    let (handle, mut rx) = h.gateway.register(h.user_id);
    h.gateway
        .handle_inbound(&handle, r#"{"type":"get_unread_count"}"#)
        .await;

    match recv(&mut rx).await {
        OutboundMessage::UnreadCountResult { success, count, .. } => {
            assert!(success);
            assert_eq!(count, Some(1));
        }
        other => panic!("expected unread_count_result, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_inbound_types_are_ignored() {
    let h = harness();
    let (handle, mut rx) = h.gateway.register(h.user_id);

    h.gateway
        .handle_inbound(&handle, r#"{"type":"subscribe","channel":"user:1"}"#)
        .await;
    h.gateway.handle_inbound(&handle, "not json at all").await;

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_disconnect_drops_user_only_with_last_connection() {
    let h = harness();
    let (handle_a, _rx_a) = h.gateway.register(h.user_id);
    let (handle_b, _rx_b) = h.gateway.register(h.user_id);

    h.gateway.unregister(&handle_a.id);
    assert!(h.registry.is_connected(h.user_id));

    h.gateway.unregister(&handle_b.id);
    assert!(!h.registry.is_connected(h.user_id));
    assert_eq!(h.registry.user_count(), 0);
}
