//! UseCase: メッセージ削除処理
//!
//! 削除できるのは投稿者本人か、そのルームの管理権限を持つメンバーのみ。
//! 権限の判定はストレージを変更する前に行う。
//!
//! ### どのような状況を想定しているか
//! - 正常系：投稿者・管理者による削除と MessageDeleted の配信
//! - 異常系：権限のない削除（Forbidden、ストレージは変更されない）
//! - 異常系：別ルームのメッセージ ID の指定（MessageNotFound）

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::{
        BroadcastEvent, ChatRepository, IdentityVerifier, MessageId, NotificationEvent, Notifier,
        RepositoryError, RoomId, can_delete,
    },
    realtime::BroadcastDispatcher,
};

use super::{auth::authenticate, error::ChatError};

/// メッセージ削除のユースケース
pub struct DeleteMessageUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
    dispatcher: BroadcastDispatcher,
    notifier: Arc<dyn Notifier>,
}

impl DeleteMessageUseCase {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        repository: Arc<dyn ChatRepository>,
        dispatcher: BroadcastDispatcher,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            verifier,
            repository,
            dispatcher,
            notifier,
        }
    }

    pub async fn execute(
        &self,
        room_id: RoomId,
        message_id: MessageId,
        token: &str,
    ) -> Result<(), ChatError> {
        let (identity, user) =
            authenticate(self.verifier.as_ref(), self.repository.as_ref(), token).await?;

        let message = self
            .repository
            .find_message(&message_id)
            .await?
            .filter(|message| message.room_id == room_id)
            .ok_or_else(|| ChatError::MessageNotFound(message_id.to_string()))?;

        let membership = self.repository.find_membership(&user.id, &room_id).await?;
        if !can_delete(&identity, &message, membership.as_ref()) {
            warn!(message_id = %message_id, room_id = %room_id, user = %user.username, "delete refused");
            return Err(ChatError::Forbidden);
        }

        self.repository
            .delete_message(&message_id)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound(_) => ChatError::MessageNotFound(message_id.to_string()),
                other => other.into(),
            })?;

        let delivered = self
            .dispatcher
            .broadcast(
                &room_id,
                BroadcastEvent::MessageDeleted {
                    room_id: room_id.clone(),
                    message_id: message_id.clone(),
                },
            )
            .await;
        info!(message_id = %message_id, room_id = %room_id, delivered, "message deleted");

        self.notifier.notify(NotificationEvent::MessageDeleted {
            username: user.username,
            room_id,
            message_id,
        });
        Ok(())
    }
}
