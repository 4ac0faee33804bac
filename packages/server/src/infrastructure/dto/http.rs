//! HTTP API request and response DTOs for the chat application.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Message, Room, User},
    realtime::MemberSnapshot,
    usecase::RoomOverview,
};
use roomcast_shared::time::millis_to_rfc3339;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub username: String,
    #[serde(default)]
    pub can_manage: bool,
}

/// Room summary returned after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDto {
    pub id: String,
    pub name: String,
    pub created_at: String, // ISO 8601
}

impl From<Room> for RoomDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id.into_string(),
            name: room.name,
            created_at: millis_to_rfc3339(room.created_at.value()),
        }
    }
}

/// Stored user as shown to administrators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_string(),
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// Room with the users holding a membership in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRoomDto {
    #[serde(flatten)]
    pub room: RoomDto,
    pub users: Vec<UserDto>,
}

impl From<RoomOverview> for AdminRoomDto {
    fn from(overview: RoomOverview) -> Self {
        Self {
            room: overview.room.into(),
            users: overview.members.into_iter().map(UserDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub room_id: String,
    pub created_at: String, // ISO 8601
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.into_string(),
            content: message.content.into(),
            author_id: message.author_id.into_string(),
            room_id: message.room_id.into_string(),
            created_at: millis_to_rfc3339(message.created_at.value()),
        }
    }
}

/// Live member of a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDto {
    pub session_id: String,
    pub user_id: String,
    pub username: String,
    pub joined_at: String, // ISO 8601
}

impl From<MemberSnapshot> for MemberDto {
    fn from(member: MemberSnapshot) -> Self {
        Self {
            session_id: member.session_id.into_string(),
            user_id: member.user_id.into_string(),
            username: member.username,
            joined_at: millis_to_rfc3339(member.joined_at.value()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub error: String,
}
