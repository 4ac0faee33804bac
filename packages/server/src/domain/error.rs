//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Identifier validation error
    #[error("{kind} cannot be empty")]
    IdEmpty { kind: &'static str },

    /// Identifier too long error
    #[error("{kind} cannot exceed {max} characters (got {actual})")]
    IdTooLong {
        kind: &'static str,
        max: usize,
        actual: usize,
    },

    /// Room name validation error
    #[error("room name cannot be blank")]
    RoomNameBlank,

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Credential verification failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("token signature mismatch")]
    SignatureMismatch,
}

/// Errors reported by storage collaborators
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(String),
}
