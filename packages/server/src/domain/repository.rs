//! Collaborator interfaces the core depends on.
//!
//! Concrete implementations live in the infrastructure layer; use cases only
//! see these traits (dependency inversion).

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::oneshot;

use super::{
    entity::{Identity, Membership, Message, Room, User},
    error::{AuthError, RepositoryError},
    value_object::{MessageId, RoomId, UserId},
};

/// Durable storage of users, rooms, memberships and messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Every user, ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find_room(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    async fn create_room(&self, room: Room) -> Result<Room, RepositoryError>;

    /// Every room, oldest first.
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError>;

    /// Rooms the user holds a membership in, oldest first.
    async fn list_rooms_for_user(&self, user_id: &UserId) -> Result<Vec<Room>, RepositoryError>;

    /// Users holding a membership in the room, ordered by id.
    async fn list_room_users(&self, room_id: &RoomId) -> Result<Vec<User>, RepositoryError>;

    /// Delete a room together with its memberships and messages.
    async fn delete_room(&self, id: &RoomId) -> Result<(), RepositoryError>;

    /// Insert the membership unless one exists for the same user and room.
    ///
    /// Returns the stored row, which is the pre-existing one when present.
    async fn create_membership(&self, membership: Membership)
    -> Result<Membership, RepositoryError>;

    /// Insert or overwrite the membership of a user in a room.
    async fn save_membership(&self, membership: Membership) -> Result<Membership, RepositoryError>;

    async fn find_membership(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
    ) -> Result<Option<Membership>, RepositoryError>;

    /// Persist a message. Writing the same id twice is not an error.
    async fn create_message(&self, message: Message) -> Result<(), RepositoryError>;

    async fn find_message(&self, id: &MessageId) -> Result<Option<Message>, RepositoryError>;

    async fn delete_message(&self, id: &MessageId) -> Result<(), RepositoryError>;

    /// Messages of a room, oldest first.
    async fn list_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, RepositoryError>;
}

/// Completion signal for one queued message write.
#[derive(Debug)]
pub struct PersistTicket {
    receiver: oneshot::Receiver<Result<(), RepositoryError>>,
}

impl PersistTicket {
    pub fn new(receiver: oneshot::Receiver<Result<(), RepositoryError>>) -> Self {
        Self { receiver }
    }

    /// Wait until the queue consumer reports the outcome of the write.
    pub async fn wait(self) -> Result<(), RepositoryError> {
        self.receiver.await.unwrap_or_else(|_| {
            Err(RepositoryError::Storage(
                "queue consumer dropped the write".to_string(),
            ))
        })
    }
}

/// Asynchronous durable-write path for new messages.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    async fn enqueue(&self, message: Message) -> Result<PersistTicket, RepositoryError>;
}

/// Side-channel notification published to external systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum NotificationEvent {
    UserJoined {
        username: String,
        room_id: RoomId,
    },
    NewMessage {
        username: String,
        room_id: RoomId,
        message: String,
    },
    MessageDeleted {
        username: String,
        room_id: RoomId,
        message_id: MessageId,
    },
    RoomCreated {
        room_id: RoomId,
        created_by: String,
    },
    UserAddedToRoom {
        username: String,
        room_id: RoomId,
    },
    RoomDeleted {
        room_id: RoomId,
        deleted_by: String,
    },
}

/// Fire-and-forget notification sink.
///
/// Implementations must return immediately and swallow their own failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: NotificationEvent);
}

/// Turns a presented credential into a verified identity.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_ticket_reports_dropped_consumer_as_storage_error() {
        // テスト項目: 完了通知が破棄された場合はストレージエラーになる
        // given (前提条件):
        let (tx, rx) = oneshot::channel();
        let ticket = PersistTicket::new(rx);

        // when (操作):
        drop(tx);
        let result = ticket.wait().await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::Storage(_))));
    }

    #[test]
    fn test_notification_event_shape() {
        // テスト項目: 通知は {event, data} の形にシリアライズされる
        let event = NotificationEvent::UserJoined {
            username: "alice".to_string(),
            room_id: RoomId::new("r1").unwrap(),
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "user_joined");
        assert_eq!(json["data"]["username"], "alice");
        assert_eq!(json["data"]["room_id"], "r1");
    }
}
