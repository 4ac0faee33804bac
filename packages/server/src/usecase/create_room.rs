//! UseCase: ルーム作成処理
//!
//! 作成者には管理権限付きのメンバーシップが与えられる。

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    ChatRepository, IdFactory, IdentityVerifier, Membership, NotificationEvent, Notifier, Room,
    Timestamp, ValueObjectError,
};

use super::{auth::authenticate, error::ChatError};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
    notifier: Arc<dyn Notifier>,
}

impl CreateRoomUseCase {
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

    pub async fn execute(&self, name: &str, token: &str) -> Result<Room, ChatError> {
        let (_, user) =
            authenticate(self.verifier.as_ref(), self.repository.as_ref(), token).await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ValueObjectError::RoomNameBlank.into());
        }

        let room = self
            .repository
            .create_room(Room {
                id: IdFactory::room_id()?,
                name: name.to_string(),
                created_at: Timestamp::now(),
            })
            .await?;
        self.repository
            .save_membership(Membership::new(user.id.clone(), room.id.clone(), true))
            .await?;

        info!(room_id = %room.id, created_by = %user.username, "room created");
        self.notifier.notify(NotificationEvent::RoomCreated {
            room_id: room.id.clone(),
            created_by: user.username,
        });
        Ok(room)
    }
}
