//! UseCase: 参加ルーム一覧取得

use std::sync::Arc;

use crate::domain::{ChatRepository, IdentityVerifier, Room};

use super::{auth::authenticate, error::ChatError};

/// 呼び出し元が所属するルーム一覧のユースケース
pub struct ListRoomsUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
}

impl ListRoomsUseCase {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, repository: Arc<dyn ChatRepository>) -> Self {
        Self {
            verifier,
            repository,
        }
    }

    /// Rooms the caller holds a membership in, oldest first.
    pub async fn execute(&self, token: &str) -> Result<Vec<Room>, ChatError> {
        let (_, user) =
            authenticate(self.verifier.as_ref(), self.repository.as_ref(), token).await?;
        Ok(self.repository.list_rooms_for_user(&user.id).await?)
    }
}
