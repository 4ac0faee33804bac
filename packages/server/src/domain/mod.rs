//! Domain layer for the chat application.
//!
//! This module contains business rules that are independent of transport
//! DTOs and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod policy;
pub mod repository;
pub mod value_object;

pub use entity::{Identity, Membership, Message, Room, User};
pub use error::{AuthError, RepositoryError, ValueObjectError};
pub use event::BroadcastEvent;
pub use factory::IdFactory;
pub use policy::can_delete;
pub use repository::{
    ChatRepository, IdentityVerifier, MessageQueue, NotificationEvent, Notifier, PersistTicket,
};
pub use value_object::{MessageContent, MessageId, RoomId, SessionId, Timestamp, UserId};

#[cfg(test)]
pub use repository::MockChatRepository;
