//! UseCase: メッセージ履歴取得

use std::sync::Arc;

use crate::domain::{ChatRepository, IdentityVerifier, Message, RoomId};

use super::{auth::authenticate, error::ChatError};

/// メッセージ履歴取得のユースケース
pub struct ListMessagesUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
}

impl ListMessagesUseCase {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, repository: Arc<dyn ChatRepository>) -> Self {
        Self {
            verifier,
            repository,
        }
    }

    /// Messages of the room, oldest first.
    pub async fn execute(&self, room_id: RoomId, token: &str) -> Result<Vec<Message>, ChatError> {
        authenticate(self.verifier.as_ref(), self.repository.as_ref(), token).await?;
        self.repository
            .find_room(&room_id)
            .await?
            .ok_or_else(|| ChatError::RoomNotFound(room_id.to_string()))?;
        Ok(self.repository.list_messages(&room_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageContent, MessageId, Timestamp, UserId},
        usecase::test_support::Harness,
    };

    #[tokio::test]
    async fn test_list_messages_oldest_first() {
        // テスト項目: 履歴は作成日時の昇順で返る
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.add_user("u1", "alice").await;
        let room_id = harness.add_room("r1").await;
        for (id, at) in [("m2", 20), ("m1", 10), ("m3", 30)] {
            harness
                .repository
                .create_message(Message::new(
                    MessageId::new(id).unwrap(),
                    MessageContent::new(id).unwrap(),
                    UserId::new("u1").unwrap(),
                    room_id.clone(),
                    Timestamp::new(at),
                ))
                .await
                .unwrap();
        }

        // when (操作):
        let messages = ListMessagesUseCase::new(harness.verifier(), harness.repository())
            .execute(room_id, &alice)
            .await
            .unwrap();

        // then (期待する結果):
        let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn test_list_messages_unknown_room() {
        // テスト項目: 存在しないルームは RoomNotFound
        let harness = Harness::new();
        let alice = harness.add_user("u1", "alice").await;

        let result = ListMessagesUseCase::new(harness.verifier(), harness.repository())
            .execute(RoomId::new("missing").unwrap(), &alice)
            .await;

        assert_eq!(result, Err(ChatError::RoomNotFound("missing".to_string())));
    }
}
