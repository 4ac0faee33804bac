//! Live session bookkeeping.
//!
//! The manager owns every session; the registry only refers to sessions by
//! id and holds a clone of their outbound sender.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{RwLock, mpsc};

use crate::domain::{IdFactory, Identity, SessionId, Timestamp, ValueObjectError};

use super::dispatcher::{Outbound, OutboundEvent};

/// One live connection
#[derive(Debug)]
pub struct SessionHandle {
    pub id: SessionId,
    pub outbound: Outbound,
    pub connected_at: Timestamp,
    identity: RwLock<Option<Identity>>,
}

impl SessionHandle {
    /// Last identity verified on this connection, if any.
    pub async fn identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    pub async fn bind_identity(&self, identity: Identity) {
        *self.identity.write().await = Some(identity);
    }
}

/// Owner of all live sessions
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<SessionHandle>>>,
    outbound_capacity: usize,
}

impl SessionManager {
    pub fn new(outbound_capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            outbound_capacity,
        }
    }

    /// Create a session with a fresh id and an empty outbound channel.
    pub async fn open(
        &self,
    ) -> Result<(Arc<SessionHandle>, mpsc::Receiver<OutboundEvent>), ValueObjectError> {
        let (outbound, receiver) = Outbound::channel(self.outbound_capacity);
        let handle = Arc::new(SessionHandle {
            id: IdFactory::session_id()?,
            outbound,
            connected_at: Timestamp::now(),
            identity: RwLock::new(None),
        });

        self.sessions
            .write()
            .await
            .insert(handle.id.clone(), Arc::clone(&handle));
        Ok((handle, receiver))
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<SessionHandle>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Forget the session. Only the first call for an id returns it.
    pub async fn close(&self, id: &SessionId) -> Option<Arc<SessionHandle>> {
        self.sessions.write().await.remove(id)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    #[tokio::test]
    async fn test_open_registers_session_without_identity() {
        // テスト項目: 接続直後のセッションは未認証で登録される
        let manager = SessionManager::new(8);

        let (handle, _rx) = manager.open().await.unwrap();

        assert!(manager.get(&handle.id).await.is_some());
        assert!(handle.identity().await.is_none());
        assert_eq!(manager.count().await, 1);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        // テスト項目: 二度目の close は何も返さない
        // given (前提条件):
        let manager = SessionManager::new(8);
        let (handle, _rx) = manager.open().await.unwrap();

        // when (操作):
        let first = manager.close(&handle.id).await;
        let second = manager.close(&handle.id).await;

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(manager.count().await, 0);
    }

    #[tokio::test]
    async fn test_bind_identity() {
        // テスト項目: 検証済みの ID をセッションに紐付けられる
        let manager = SessionManager::new(8);
        let (handle, _rx) = manager.open().await.unwrap();
        let identity = Identity {
            user_id: UserId::new("u1").unwrap(),
            username: "alice".to_string(),
            is_admin: false,
        };

        handle.bind_identity(identity.clone()).await;

        assert_eq!(handle.identity().await, Some(identity));
    }
}
