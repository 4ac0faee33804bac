//! Events fanned out to room members.

use serde::Serialize;

use super::{
    entity::Message,
    value_object::{MessageId, RoomId, UserId},
};

/// Event delivered to every live member of a room.
///
/// Ephemeral: never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BroadcastEvent {
    MemberJoined {
        room_id: RoomId,
        user_id: UserId,
        username: String,
        /// Usernames of the live sessions in the room, in join order
        members: Vec<String>,
    },
    MemberLeft {
        room_id: RoomId,
        user_id: UserId,
        username: String,
    },
    NewMessage {
        message: Message,
        author_username: String,
    },
    MessageDeleted {
        room_id: RoomId,
        message_id: MessageId,
    },
    /// The room was deleted; every member has been removed from it
    RoomClosed {
        room_id: RoomId,
    },
}

impl BroadcastEvent {
    /// Room the event is scoped to.
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::MemberJoined { room_id, .. }
            | Self::MemberLeft { room_id, .. }
            | Self::MessageDeleted { room_id, .. }
            | Self::RoomClosed { room_id } => room_id,
            Self::NewMessage { message, .. } => &message.room_id,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MemberJoined { .. } => "member-joined",
            Self::MemberLeft { .. } => "member-left",
            Self::NewMessage { .. } => "new-message",
            Self::MessageDeleted { .. } => "message-deleted",
            Self::RoomClosed { .. } => "room-closed",
        }
    }
}
