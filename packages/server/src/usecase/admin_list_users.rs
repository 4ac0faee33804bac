//! UseCase: 管理者向けユーザー一覧取得

use std::sync::Arc;

use crate::domain::{ChatRepository, IdentityVerifier, User};

use super::{auth::authenticate_admin, error::ChatError};

/// 全ユーザー一覧のユースケース（管理者のみ）
pub struct AdminListUsersUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
}

impl AdminListUsersUseCase {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, repository: Arc<dyn ChatRepository>) -> Self {
        Self {
            verifier,
            repository,
        }
    }

    pub async fn execute(&self, token: &str) -> Result<Vec<User>, ChatError> {
        authenticate_admin(self.verifier.as_ref(), self.repository.as_ref(), token).await?;
        Ok(self.repository.list_users().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::Harness;

    #[tokio::test]
    async fn test_admin_sees_every_user() {
        // テスト項目: 管理者は全ユーザーを取得できる
        // given (前提条件):
        let harness = Harness::new();
        let root = harness.add_admin("u0", "root").await;
        harness.add_user("u1", "alice").await;
        harness.add_user("u2", "bob").await;

        // when (操作):
        let users = AdminListUsersUseCase::new(harness.verifier(), harness.repository())
            .execute(&root)
            .await
            .unwrap();

        // then (期待する結果):
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["root", "alice", "bob"]);
        assert!(users[0].is_admin);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        // テスト項目: 管理者でないユーザーは Forbidden
        let harness = Harness::new();
        let alice = harness.add_user("u1", "alice").await;

        let result = AdminListUsersUseCase::new(harness.verifier(), harness.repository())
            .execute(&alice)
            .await;

        assert_eq!(result, Err(ChatError::Forbidden));
    }
}
