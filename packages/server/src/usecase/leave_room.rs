//! UseCase: ルーム退出処理
//!
//! 退出はレジストリ上の状態のみを変更し、永続メンバーシップは残す。

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    domain::{RoomId, SessionId},
    realtime::{LeaveOutcome, RoomRegistry},
};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    registry: Arc<RoomRegistry>,
}

impl LeaveRoomUseCase {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Returns whether the session was a member. Remaining members receive
    /// `MemberLeft`.
    pub async fn execute(&self, session_id: &SessionId, room_id: &RoomId) -> bool {
        match self.registry.leave(session_id, room_id).await {
            LeaveOutcome::Left { member, delivered } => {
                info!(
                    session_id = %session_id,
                    room_id = %room_id,
                    user = %member.identity.username,
                    delivered,
                    "left room"
                );
                true
            }
            LeaveOutcome::NotMember => {
                debug!(session_id = %session_id, room_id = %room_id, "leave without membership");
                false
            }
        }
    }
}
