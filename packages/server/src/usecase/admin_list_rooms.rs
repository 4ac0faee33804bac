//! UseCase: 管理者向けルーム一覧取得
//!
//! 各ルームについて、メンバーシップを持つユーザーも併せて返す。

use std::sync::Arc;

use crate::domain::{ChatRepository, IdentityVerifier, Room, User};

use super::{auth::authenticate_admin, error::ChatError};

/// A room together with the users holding a membership in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOverview {
    pub room: Room,
    pub members: Vec<User>,
}

/// 全ルーム一覧のユースケース（管理者のみ）
pub struct AdminListRoomsUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
}

impl AdminListRoomsUseCase {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, repository: Arc<dyn ChatRepository>) -> Self {
        Self {
            verifier,
            repository,
        }
    }

    pub async fn execute(&self, token: &str) -> Result<Vec<RoomOverview>, ChatError> {
        authenticate_admin(self.verifier.as_ref(), self.repository.as_ref(), token).await?;

        let rooms = self.repository.list_rooms().await?;
        let mut overviews = Vec::with_capacity(rooms.len());
        for room in rooms {
            let members = self.repository.list_room_users(&room.id).await?;
            overviews.push(RoomOverview { room, members });
        }
        Ok(overviews)
    }
}
