//! Core domain models for the chat application.

use serde::{Deserialize, Serialize};

use super::value_object::{MessageContent, MessageId, RoomId, Timestamp, UserId};

/// Verified principal produced by the identity verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

/// Durable user record owned by storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Identity as seen by other room members.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id.clone(),
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Durable room record owned by storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(default = "Timestamp::now")]
    pub created_at: Timestamp,
}

/// Who may be in a room and with which rights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub room_id: RoomId,
    pub can_manage: bool,
}

impl Membership {
    pub fn new(user_id: UserId, room_id: RoomId, can_manage: bool) -> Self {
        Self {
            user_id,
            room_id,
            can_manage,
        }
    }
}

/// Represents a chat message in the domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: MessageContent,
    pub author_id: UserId,
    pub room_id: RoomId,
    pub created_at: Timestamp,
}

impl Message {
    pub fn new(
        id: MessageId,
        content: MessageContent,
        author_id: UserId,
        room_id: RoomId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            content,
            author_id,
            room_id,
            created_at,
        }
    }
}
