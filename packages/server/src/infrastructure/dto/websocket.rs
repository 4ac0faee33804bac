//! WebSocket frame DTOs for the chat application.

use serde::{Deserialize, Serialize};

/// Frame sent by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    Join {
        room_id: String,
        token: String,
    },
    Send {
        room_id: String,
        content: String,
        token: String,
    },
    Delete {
        room_id: String,
        message_id: String,
        token: String,
    },
    Leave {
        room_id: String,
    },
}

/// Reply addressed only to the session that sent the request.
///
/// Room events are serialized from `BroadcastEvent` directly and share the
/// same `type` tag namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerFrame {
    SessionOpened {
        session_id: String,
    },
    Ack {
        action: String,
        room_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
    Error {
        code: String,
        message: String,
    },
}

impl ServerFrame {
    pub fn ack(action: &str, room_id: impl Into<String>) -> Self {
        Self::Ack {
            action: action.to_string(),
            room_id: room_id.into(),
            message_id: None,
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_frame() {
        // テスト項目: send フレームを解析できる
        let json = r#"{"type":"send","room_id":"r1","content":"hi","token":"t"}"#;

        let frame: ClientFrame = serde_json::from_str(json).unwrap();

        assert!(matches!(
            frame,
            ClientFrame::Send { room_id, content, .. } if room_id == "r1" && content == "hi"
        ));
    }

    #[test]
    fn test_ack_omits_missing_message_id() {
        // テスト項目: message_id がない ack には項目が出力されない
        let json = serde_json::to_value(ServerFrame::ack("join", "r1")).unwrap();

        assert_eq!(json["type"], "ack");
        assert_eq!(json["action"], "join");
        assert!(json.get("message_id").is_none());
    }
}
