//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{AuthError, RepositoryError, ValueObjectError};

/// Outcome of a failed chat operation, reported only to the caller
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("room not found: {0}")]
    RoomNotFound(String),

    #[error("message not found: {0}")]
    MessageNotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("session is closed")]
    SessionClosed,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ChatError {
    fn from(err: RepositoryError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl ChatError {
    /// Stable machine-readable code for transport replies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth(AuthError::ExpiredToken) => "expired-token",
            Self::Auth(_) => "invalid-token",
            Self::InvalidInput(_) => "bad-request",
            Self::UserNotFound(_) => "user-not-found",
            Self::RoomNotFound(_) => "room-not-found",
            Self::MessageNotFound(_) => "message-not-found",
            Self::Forbidden => "forbidden",
            Self::SessionClosed => "session-closed",
            Self::Storage(_) => "storage-error",
        }
    }
}
