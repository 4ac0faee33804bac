//! UseCase: ルーム参加処理
//!
//! ストレージ上のユーザーとルームを確認し、永続メンバーシップを（未作成なら）
//! 作成してから、レジストリへセッションを参加させる。
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加と MemberJoined の配信
//! - 冪等性：同じセッションの再参加では何も変わらない
//! - 異常系：存在しないルーム・ユーザー、切断済みのセッション
//! - 並行性：同一ユーザーの同時参加でもメンバーシップ行は 1 件

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    domain::{ChatRepository, IdentityVerifier, Membership, NotificationEvent, Notifier, RoomId},
    realtime::{JoinOutcome, RoomRegistry, SessionHandle},
};

use super::{auth::authenticate, error::ChatError};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
    registry: Arc<RoomRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl JoinRoomUseCase {
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

    /// Never returns `JoinOutcome::SessionClosed`; a torn-down session is
    /// reported as `ChatError::SessionClosed` instead.
    pub async fn execute(
        &self,
        session: &SessionHandle,
        room_id: RoomId,
        token: &str,
    ) -> Result<JoinOutcome, ChatError> {
        let (_, user) =
            authenticate(self.verifier.as_ref(), self.repository.as_ref(), token).await?;
        let room = self
            .repository
            .find_room(&room_id)
            .await?
            .ok_or_else(|| ChatError::RoomNotFound(room_id.to_string()))?;

        if !self.registry.is_open(&session.id).await {
            warn!(session_id = %session.id, room_id = %room.id, "join on a closed session");
            return Err(ChatError::SessionClosed);
        }

        self.repository
            .create_membership(Membership::new(user.id.clone(), room.id.clone(), false))
            .await?;

        let identity = user.identity();
        session.bind_identity(identity.clone()).await;

        let outcome = self
            .registry
            .join(&session.id, &identity, &session.outbound, &room.id)
            .await;
        match outcome {
            JoinOutcome::Joined { delivered } => {
                info!(session_id = %session.id, room_id = %room.id, user = %user.username, delivered, "joined room");
                self.notifier.notify(NotificationEvent::UserJoined {
                    username: user.username,
                    room_id: room.id,
                });
            }
            JoinOutcome::AlreadyMember => {
                debug!(session_id = %session.id, room_id = %room.id, "already a member");
            }
            JoinOutcome::SessionClosed => {
                warn!(session_id = %session.id, room_id = %room.id, "session closed during join");
                return Err(ChatError::SessionClosed);
            }
        }
        Ok(outcome)
    }
}
