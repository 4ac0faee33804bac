//! UseCase: セッション切断処理
//!
//! 切断されたセッションを全ルームから取り除き、残ったメンバーへ退出を通知する。
//! 2 回目以降の呼び出しは何もしない。

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    domain::{RoomId, SessionId},
    realtime::{RoomRegistry, SessionManager},
};

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    sessions: Arc<SessionManager>,
    registry: Arc<RoomRegistry>,
}

impl DisconnectSessionUseCase {
    pub fn new(sessions: Arc<SessionManager>, registry: Arc<RoomRegistry>) -> Self {
        Self { sessions, registry }
    }

    /// Returns the rooms the session was removed from.
    ///
    /// Departures are announced by the registry with the identity the session
    /// joined each room as.
    pub async fn execute(&self, session_id: &SessionId) -> Vec<RoomId> {
        if self.sessions.close(session_id).await.is_none() {
            debug!(session_id = %session_id, "session already closed");
            return Vec::new();
        }

        let rooms = self.registry.leave_all(session_id).await;
        info!(session_id = %session_id, rooms = rooms.len(), "session closed");
        rooms
    }
}
