//! Domain factories for creating identifiers.

use super::{
    error::ValueObjectError,
    value_object::{MessageId, RoomId, SessionId},
};

/// Factory for generating identifiers backed by random UUID v4 values.
///
/// Keeps the generation concern apart from the validation logic in the
/// value objects themselves.
pub struct IdFactory;

impl IdFactory {
    pub fn session_id() -> Result<SessionId, ValueObjectError> {
        SessionId::new(uuid::Uuid::new_v4().to_string())
    }

    pub fn room_id() -> Result<RoomId, ValueObjectError> {
        RoomId::new(uuid::Uuid::new_v4().to_string())
    }

    pub fn message_id() -> Result<MessageId, ValueObjectError> {
        MessageId::new(uuid::Uuid::new_v4().to_string())
    }
}
