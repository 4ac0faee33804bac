//! Broadcast dispatcher.
//!
//! Every session owns a bounded outbound channel. Fan-out uses `try_send`, so
//! a slow or vanished consumer only loses its own copy of an event and the
//! producer never waits.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::{BroadcastEvent, RoomId, SessionId};

use super::registry::{RoomMember, RoomRegistry};

/// Event as queued on a session's outbound channel
pub type OutboundEvent = Arc<BroadcastEvent>;

/// Result of handing one event to one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Channel full: the consumer is lagging
    Dropped,
    /// Receiver gone: the session is tearing down
    Closed,
}

/// Sending half of a session's outbound channel.
#[derive(Debug, Clone)]
pub struct Outbound {
    sender: mpsc::Sender<OutboundEvent>,
}

impl Outbound {
    /// Create a channel holding at most `capacity` undelivered events.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutboundEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    pub fn deliver(&self, session_id: &SessionId, event: &OutboundEvent) -> Delivery {
        match self.sender.try_send(Arc::clone(event)) {
            Ok(()) => Delivery::Sent,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    session_id = %session_id,
                    event = event.kind(),
                    "outbound channel full, dropping event for slow consumer"
                );
                Delivery::Dropped
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(session_id = %session_id, "outbound channel closed");
                Delivery::Closed
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Deliver `event` to each member independently; returns how many accepted it.
pub fn fan_out<'a>(
    members: impl IntoIterator<Item = &'a RoomMember>,
    event: BroadcastEvent,
) -> usize {
    let event = Arc::new(event);
    members
        .into_iter()
        .filter(|member| member.outbound.deliver(&member.session_id, &event) == Delivery::Sent)
        .count()
}

/// Entry point used by the use cases to reach every live member of a room.
#[derive(Clone)]
pub struct BroadcastDispatcher {
    registry: Arc<RoomRegistry>,
}

impl BroadcastDispatcher {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Broadcast under the room's serialization point.
    ///
    /// A room without live members is not an error; nothing is delivered.
    pub async fn broadcast(&self, room_id: &RoomId, event: BroadcastEvent) -> usize {
        let kind = event.kind();
        let delivered = self
            .registry
            .with_members(room_id, |members| fan_out(members, event))
            .await
            .unwrap_or(0);
        tracing::debug!(room_id = %room_id, event = kind, delivered, "broadcast");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, MessageId, Timestamp, UserId};

    fn member(name: &str, capacity: usize) -> (RoomMember, mpsc::Receiver<OutboundEvent>) {
        let (outbound, rx) = Outbound::channel(capacity);
        let member = RoomMember {
            session_id: SessionId::new(format!("s-{name}")).unwrap(),
            identity: Identity {
                user_id: UserId::new(name).unwrap(),
                username: name.to_string(),
                is_admin: false,
            },
            outbound,
            joined_at: Timestamp::new(0),
        };
        (member, rx)
    }

    fn deleted(message_id: &str) -> BroadcastEvent {
        BroadcastEvent::MessageDeleted {
            room_id: RoomId::new("r1").unwrap(),
            message_id: MessageId::new(message_id).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_fan_out_reaches_every_member() {
        // テスト項目: 全メンバーにイベントが配信される
        // given (前提条件):
        let (alice, mut rx_alice) = member("alice", 4);
        let (bob, mut rx_bob) = member("bob", 4);

        // when (操作):
        let delivered = fan_out([&alice, &bob], deleted("m1"));

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert_eq!(*rx_alice.recv().await.unwrap(), deleted("m1"));
        assert_eq!(*rx_bob.recv().await.unwrap(), deleted("m1"));
    }

    #[tokio::test]
    async fn test_slow_consumer_does_not_block_others() {
        // テスト項目: 詰まったメンバーがいても他のメンバーへの配信は継続する
        // given (前提条件): alice のチャネルは容量 1 で既に満杯
        let (alice, mut rx_alice) = member("alice", 1);
        let (bob, mut rx_bob) = member("bob", 4);
        fan_out([&alice], deleted("m0"));

        // when (操作):
        let delivered = fan_out([&alice, &bob], deleted("m1"));

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(*rx_bob.recv().await.unwrap(), deleted("m1"));
        assert_eq!(*rx_alice.recv().await.unwrap(), deleted("m0"));
        assert!(rx_alice.try_recv().is_err());
    }

    #[test]
    fn test_closed_receiver_is_silent_no_op() {
        // テスト項目: 切断済みセッションへの配信はエラーにならない
        let (alice, rx_alice) = member("alice", 4);
        drop(rx_alice);

        let event = Arc::new(deleted("m1"));
        assert_eq!(alice.outbound.deliver(&alice.session_id, &event), Delivery::Closed);
        assert!(alice.outbound.is_closed());
    }
}
