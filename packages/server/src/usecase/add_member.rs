//! UseCase: メンバー追加処理
//!
//! 管理権限を持つメンバーだけが、ユーザー名で指定した相手をルームに追加できる。

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    ChatRepository, IdentityVerifier, Membership, NotificationEvent, Notifier, RoomId,
};

use super::{auth::authenticate, error::ChatError};

/// メンバー追加のユースケース
pub struct AddMemberUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
    notifier: Arc<dyn Notifier>,
}

impl AddMemberUseCase {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        repository: Arc<dyn ChatRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            verifier,
            repository,
            notifier,
        }
    }

    pub async fn execute(
        &self,
        room_id: RoomId,
        username: &str,
        can_manage: bool,
        token: &str,
    ) -> Result<Membership, ChatError> {
        let (_, caller) =
            authenticate(self.verifier.as_ref(), self.repository.as_ref(), token).await?;
        let room = self
            .repository
            .find_room(&room_id)
            .await?
            .ok_or_else(|| ChatError::RoomNotFound(room_id.to_string()))?;

        let allowed = self
            .repository
            .find_membership(&caller.id, &room.id)
            .await?
            .is_some_and(|membership| membership.can_manage);
        if !allowed {
            warn!(room_id = %room.id, caller = %caller.username, "add member refused");
            return Err(ChatError::Forbidden);
        }

        let target = self
            .repository
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| ChatError::UserNotFound(username.to_string()))?;
        let membership = self
            .repository
            .save_membership(Membership::new(target.id, room.id.clone(), can_manage))
            .await?;

        info!(room_id = %room.id, user = %target.username, can_manage, "member added");
        self.notifier.notify(NotificationEvent::UserAddedToRoom {
            username: target.username,
            room_id: room.id,
        });
        Ok(membership)
    }
}
