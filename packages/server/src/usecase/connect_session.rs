//! UseCase: セッション接続処理

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::realtime::{OutboundEvent, RoomRegistry, SessionHandle, SessionManager};

use super::error::ChatError;

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    sessions: Arc<SessionManager>,
    registry: Arc<RoomRegistry>,
}

impl ConnectSessionUseCase {
    pub fn new(sessions: Arc<SessionManager>, registry: Arc<RoomRegistry>) -> Self {
        Self { sessions, registry }
    }

    /// Open a session and make it known to the registry.
    ///
    /// The receiver yields every event addressed to the session.
    pub async fn execute(
        &self,
    ) -> Result<(Arc<SessionHandle>, mpsc::Receiver<OutboundEvent>), ChatError> {
        let (handle, receiver) = self.sessions.open().await?;
        self.registry.register_session(handle.id.clone()).await;
        info!(session_id = %handle.id, "session opened");
        Ok((handle, receiver))
    }
}
