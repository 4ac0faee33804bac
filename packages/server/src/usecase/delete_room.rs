//! UseCase: ルーム削除処理（管理者のみ）
//!
//! ストレージからルームとそのメンバーシップ・メッセージを削除し、
//! 接続中のメンバーには RoomClosed を配信してからレジストリから外す。
//!
//! ### どのような状況を想定しているか
//! - 正常系：削除、RoomClosed の配信、room_deleted 通知
//! - 異常系：管理者以外の削除（Forbidden、ストレージは変更されない）
//! - 異常系：存在しないルーム

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::{
        ChatRepository, IdentityVerifier, NotificationEvent, Notifier, RepositoryError, RoomId,
    },
    realtime::RoomRegistry,
};

use super::{auth::authenticate_admin, error::ChatError};

/// ルーム削除のユースケース
pub struct DeleteRoomUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
    registry: Arc<RoomRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl DeleteRoomUseCase {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        repository: Arc<dyn ChatRepository>,
        registry: Arc<RoomRegistry>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            verifier,
            repository,
            registry,
            notifier,
        }
    }

    pub async fn execute(&self, room_id: RoomId, token: &str) -> Result<(), ChatError> {
        let admin =
            match authenticate_admin(self.verifier.as_ref(), self.repository.as_ref(), token).await
            {
                Ok(user) => user,
                Err(err) => {
                    warn!(room_id = %room_id, code = err.code(), "room deletion refused");
                    return Err(err);
                }
            };

        self.repository
            .delete_room(&room_id)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound(_) => ChatError::RoomNotFound(room_id.to_string()),
                other => other.into(),
            })?;

        let evicted = self.registry.evict_room(&room_id).await;
        info!(room_id = %room_id, deleted_by = %admin.username, evicted, "room deleted");

        self.notifier.notify(NotificationEvent::RoomDeleted {
            room_id,
            deleted_by: admin.username,
        });
        Ok(())
    }
}
