//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of any identifier value object
pub const MAX_ID_LENGTH: usize = 100;

/// Maximum length of a message body in bytes
pub const MAX_MESSAGE_LENGTH: usize = 10_000;

fn validate_id(kind: &'static str, id: &str) -> Result<(), ValueObjectError> {
    if id.is_empty() {
        return Err(ValueObjectError::IdEmpty { kind });
    }
    let len = id.len();
    if len > MAX_ID_LENGTH {
        return Err(ValueObjectError::IdTooLong {
            kind,
            max: MAX_ID_LENGTH,
            actual: len,
        });
    }
    Ok(())
}

/// Declares a validated string identifier.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier, rejecting empty or oversized values.
            pub fn new(id: impl Into<String>) -> Result<Self, ValueObjectError> {
                let id = id.into();
                validate_id(stringify!($name), &id)?;
                Ok(Self(id))
            }

            /// Get the inner string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert to owned String.
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of one live connection.
    SessionId
);

string_id!(
    /// Identifier of a durable user record.
    UserId
);

string_id!(
    /// Identifier of a chat room.
    RoomId
);

string_id!(
    /// Identifier of a persisted message.
    MessageId
);

/// Message content value object.
///
/// Represents the content of a chat message with validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is empty or longer than
    /// [`MAX_MESSAGE_LENGTH`] bytes.
    pub fn new(content: impl Into<String>) -> Result<Self, ValueObjectError> {
        let content = content.into();
        if content.is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        let len = content.len();
        if len > MAX_MESSAGE_LENGTH {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MAX_MESSAGE_LENGTH,
                actual: len,
            });
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageContent> for String {
    fn from(value: MessageContent) -> Self {
        value.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn now() -> Self {
        Self(roomcast_shared::time::now_millis())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_new_success() {
        // テスト項目: 有効なルーム ID を作成できる
        // given (前提条件):
        let id = "general".to_string();

        // when (操作):
        let result = RoomId::new(id);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "general");
    }

    #[test]
    fn test_room_id_new_empty_fails() {
        // テスト項目: 空のルーム ID は作成できない
        // when (操作):
        let result = RoomId::new("");

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::IdEmpty { kind: "RoomId" }
        );
    }

    #[test]
    fn test_user_id_new_too_long_fails() {
        // テスト項目: 101 文字以上のユーザー ID は作成できない
        // given (前提条件):
        let id = "a".repeat(101);

        // when (操作):
        let result = UserId::new(id);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::IdTooLong {
                kind: "UserId",
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_id_equality() {
        // テスト項目: 同じ値を持つ ID は等価
        let id1 = SessionId::new("s-1").unwrap();
        let id2 = SessionId::new("s-1").unwrap();
        let id3 = SessionId::new("s-2").unwrap();

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_id_deserialize_rejects_empty() {
        // テスト項目: JSON からの復元時にも検証が行われる
        // when (操作):
        let ok: Result<MessageId, _> = serde_json::from_str("\"m-1\"");
        let empty: Result<MessageId, _> = serde_json::from_str("\"\"");

        // then (期待する結果):
        assert_eq!(ok.unwrap().as_str(), "m-1");
        assert!(empty.is_err());
    }

    #[test]
    fn test_message_content_new_empty_fails() {
        // テスト項目: 空のメッセージ内容は作成できない
        let result = MessageContent::new("");

        assert_eq!(result.unwrap_err(), ValueObjectError::MessageContentEmpty);
    }

    #[test]
    fn test_message_content_new_too_long_fails() {
        // テスト項目: 10001 バイト以上のメッセージ内容は作成できない
        // given (前提条件):
        let content = "a".repeat(10001);

        // when (操作):
        let result = MessageContent::new(content);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::MessageContentTooLong {
                max: 10000,
                actual: 10001
            }
        );
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        assert!(ts1 < ts2);
    }
}
