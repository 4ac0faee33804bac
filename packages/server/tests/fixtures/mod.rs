//! In-process test server shared by the integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use roomcast_server::{
    domain::{ChatRepository, Identity, UserId},
    infrastructure::{
        auth::JwtIdentityVerifier,
        notifier::NoopNotifier,
        queue::{InProcessMessageQueue, QueueSettings},
        repository::{InMemoryChatRepository, SeedData},
    },
    ui::{AppState, build_app},
};
use serde_json::Value;
use tokio::{net::TcpStream, sync::oneshot};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message as WsMessage,
};

pub const SECRET: &str = "integration_test_secret_for_hs256";

/// alice owns "general", bob is a plain member, carol has no membership,
/// root is an administrator
const SEED: &str = r#"{
    "users": [
        {"id": "1", "username": "alice"},
        {"id": "2", "username": "bob"},
        {"id": "3", "username": "carol"},
        {"id": "4", "username": "root", "is_admin": true}
    ],
    "rooms": [{"id": "general", "name": "General", "created_at": 0}],
    "memberships": [
        {"user_id": "1", "room_id": "general", "can_manage": true},
        {"user_id": "2", "room_id": "general", "can_manage": false}
    ]
}"#;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    addr: SocketAddr,
    verifier: JwtIdentityVerifier,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let seed = SeedData::from_json("fixture", SEED).expect("seed");
        let repository: Arc<dyn ChatRepository> = Arc::new(InMemoryChatRepository::from_seed(seed));
        let (queue, _worker) =
            InProcessMessageQueue::spawn(repository.clone(), QueueSettings::default());
        let state = Arc::new(AppState::new(
            Arc::new(JwtIdentityVerifier::new(SECRET)),
            repository,
            Arc::new(queue),
            Arc::new(NoopNotifier),
            64,
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = build_app(state);
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            verifier: JwtIdentityVerifier::new(SECRET),
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn token(&self, user_id: &str, username: &str) -> String {
        let identity = Identity {
            user_id: UserId::new(user_id).expect("user id"),
            username: username.to_string(),
            is_admin: false,
        };
        self.verifier
            .issue(&identity, chrono::Duration::hours(1))
            .expect("token")
    }

    /// Connect a websocket and consume the `session-opened` frame.
    pub async fn connect(&self) -> (WsStream, String) {
        let (mut ws, _) = connect_async(self.ws_url()).await.expect("connect");
        let opened = next_frame(&mut ws).await;
        assert_eq!(opened["type"], "session-opened");
        let session_id = opened["session_id"].as_str().expect("session id").to_string();
        (ws, session_id)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn send_frame(ws: &mut WsStream, frame: Value) {
    ws.send(WsMessage::Text(frame.to_string().into()))
        .await
        .expect("send frame");
}

/// Next JSON text frame, failing the test after two seconds.
pub async fn next_frame(ws: &mut WsStream) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("websocket error");
        if let WsMessage::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("json frame");
        }
    }
}

/// Skip frames until one of the given `type` arrives.
pub async fn next_of_type(ws: &mut WsStream, kind: &str) -> Value {
    loop {
        let frame = next_frame(ws).await;
        if frame["type"] == kind {
            return frame;
        }
    }
}

/// Assert that nothing arrives for a short while.
pub async fn assert_silent(ws: &mut WsStream) {
    let result = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(result.is_err(), "unexpected frame: {:?}", result);
}

/// Join a room and consume both the ack and the joiner's own `member-joined`,
/// which may arrive in either order.
pub async fn join_room(ws: &mut WsStream, room_id: &str, token: &str) {
    send_frame(
        ws,
        serde_json::json!({"type": "join", "room_id": room_id, "token": token}),
    )
    .await;
    let mut kinds = vec![
        next_frame(ws).await["type"].as_str().unwrap_or_default().to_string(),
        next_frame(ws).await["type"].as_str().unwrap_or_default().to_string(),
    ];
    kinds.sort();
    assert_eq!(kinds, vec!["ack", "member-joined"]);
}
