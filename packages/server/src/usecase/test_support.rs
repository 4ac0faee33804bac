//! Shared fixtures for use case tests.

use std::sync::{Arc, Mutex};

use chrono::Duration;
use tokio::sync::mpsc;

use crate::{
    domain::{
        ChatRepository, Identity, IdentityVerifier, Membership, MessageQueue, NotificationEvent,
        Notifier, Room, RoomId, Timestamp, User, UserId,
    },
    infrastructure::{
        auth::JwtIdentityVerifier,
        queue::{InProcessMessageQueue, QueueSettings},
        repository::InMemoryChatRepository,
    },
    realtime::{BroadcastDispatcher, OutboundEvent, RoomRegistry, SessionHandle, SessionManager},
};

pub(crate) const SECRET: &str = "usecase_test_secret_key_for_hs256";

/// Notifier that remembers what it was asked to publish
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    pub(crate) fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: NotificationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub(crate) struct Harness {
    pub verifier: Arc<JwtIdentityVerifier>,
    pub repository: Arc<InMemoryChatRepository>,
    pub registry: Arc<RoomRegistry>,
    pub sessions: Arc<SessionManager>,
    pub dispatcher: BroadcastDispatcher,
    pub queue: Arc<InProcessMessageQueue>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let repository = Arc::new(InMemoryChatRepository::new());
        let registry = Arc::new(RoomRegistry::new());
        let (queue, _worker) = InProcessMessageQueue::spawn(
            repository.clone() as Arc<dyn ChatRepository>,
            QueueSettings::default(),
        );
        Self {
            verifier: Arc::new(JwtIdentityVerifier::new(SECRET)),
            repository,
            dispatcher: BroadcastDispatcher::new(registry.clone()),
            registry,
            sessions: Arc::new(SessionManager::new(64)),
            queue: Arc::new(queue),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    pub(crate) fn verifier(&self) -> Arc<dyn IdentityVerifier> {
        self.verifier.clone()
    }

    pub(crate) fn repository(&self) -> Arc<dyn ChatRepository> {
        self.repository.clone()
    }

    pub(crate) fn queue(&self) -> Arc<dyn MessageQueue> {
        self.queue.clone()
    }

    pub(crate) fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    /// Store a user and return a valid token for it.
    pub(crate) async fn add_user(&self, id: &str, username: &str) -> String {
        self.insert_user(id, username, false).await
    }

    pub(crate) async fn add_admin(&self, id: &str, username: &str) -> String {
        self.insert_user(id, username, true).await
    }

    async fn insert_user(&self, id: &str, username: &str, is_admin: bool) -> String {
        let user = User {
            id: UserId::new(id).unwrap(),
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            is_admin,
        };
        self.repository.insert_user(user).await;
        token_for(&self.verifier, id, username)
    }

    pub(crate) async fn add_room(&self, id: &str) -> RoomId {
        let room = Room {
            id: RoomId::new(id).unwrap(),
            name: id.to_string(),
            created_at: Timestamp::new(0),
        };
        self.repository.create_room(room).await.unwrap().id
    }

    pub(crate) async fn grant(&self, user_id: &str, room_id: &RoomId, can_manage: bool) {
        self.repository
            .save_membership(Membership::new(
                UserId::new(user_id).unwrap(),
                room_id.clone(),
                can_manage,
            ))
            .await
            .unwrap();
    }

    pub(crate) async fn connect(&self) -> (Arc<SessionHandle>, mpsc::Receiver<OutboundEvent>) {
        let (handle, rx) = self.sessions.open().await.unwrap();
        self.registry.register_session(handle.id.clone()).await;
        (handle, rx)
    }
}

pub(crate) fn token_for(verifier: &JwtIdentityVerifier, id: &str, username: &str) -> String {
    let identity = Identity {
        user_id: UserId::new(id).unwrap(),
        username: username.to_string(),
        is_admin: false,
    };
    verifier.issue(&identity, Duration::hours(1)).unwrap()
}

pub(crate) fn drain(rx: &mut mpsc::Receiver<OutboundEvent>) -> Vec<OutboundEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
