//! メッセージ取り込みの状態遷移
//!
//! 1 件のメッセージは Received から始まり、Broadcast / Rejected / Failed の
//! いずれかで終わる。永続化が確認されるまで Broadcast には進めない。

use tracing::{debug, error};

use crate::domain::MessageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    Authorized,
    Enqueued,
    Persisted,
    Broadcast,
    Rejected,
    Failed,
}

/// Observation that moves a message through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestSignal {
    /// Credential, room and membership checks passed
    Accepted,
    /// A check failed before anything was queued
    Refused,
    Queued,
    PersistConfirmed,
    /// Enqueue or the durable write failed
    PersistFailed,
    Dispatched,
}

impl IngestStage {
    /// Next stage, or `None` when the signal is not valid here.
    pub fn on(self, signal: IngestSignal) -> Option<Self> {
        use IngestSignal as S;
        match (self, signal) {
            (Self::Received, S::Accepted) => Some(Self::Authorized),
            (Self::Received, S::Refused) => Some(Self::Rejected),
            (Self::Authorized, S::Queued) => Some(Self::Enqueued),
            (Self::Authorized | Self::Enqueued, S::PersistFailed) => Some(Self::Failed),
            (Self::Enqueued, S::PersistConfirmed) => Some(Self::Persisted),
            (Self::Persisted, S::Dispatched) => Some(Self::Broadcast),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Broadcast | Self::Rejected | Self::Failed)
    }
}

/// Tracks one message through the pipeline and logs each step
#[derive(Debug)]
pub struct IngestTracker {
    message_id: MessageId,
    stage: IngestStage,
}

impl IngestTracker {
    pub fn new(message_id: MessageId) -> Self {
        Self {
            message_id,
            stage: IngestStage::Received,
        }
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    pub fn stage(&self) -> IngestStage {
        self.stage
    }

    /// Apply `signal`. An invalid transition leaves the stage unchanged.
    pub fn advance(&mut self, signal: IngestSignal) -> IngestStage {
        match self.stage.on(signal) {
            Some(next) => {
                debug!(message_id = %self.message_id, from = ?self.stage, to = ?next, "ingest");
                self.stage = next;
            }
            None => {
                error!(
                    message_id = %self.message_id,
                    stage = ?self.stage,
                    signal = ?signal,
                    "invalid ingest transition"
                );
            }
        }
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_reaches_broadcast() {
        // テスト項目: 正常系は Received から Broadcast まで順に進む
        // given (前提条件):
        let mut tracker = IngestTracker::new(MessageId::new("m1").unwrap());

        // when (操作):
        for signal in [
            IngestSignal::Accepted,
            IngestSignal::Queued,
            IngestSignal::PersistConfirmed,
            IngestSignal::Dispatched,
        ] {
            tracker.advance(signal);
        }

        // then (期待する結果):
        assert_eq!(tracker.stage(), IngestStage::Broadcast);
        assert!(tracker.stage().is_terminal());
    }

    #[test]
    fn test_broadcast_requires_persistence() {
        // テスト項目: 永続化前の Dispatched は無視される
        assert_eq!(IngestStage::Enqueued.on(IngestSignal::Dispatched), None);
        assert_eq!(IngestStage::Authorized.on(IngestSignal::Dispatched), None);

        let mut tracker = IngestTracker::new(MessageId::new("m1").unwrap());
        tracker.advance(IngestSignal::Accepted);
        tracker.advance(IngestSignal::Queued);
        assert_eq!(tracker.advance(IngestSignal::Dispatched), IngestStage::Enqueued);
    }

    #[test]
    fn test_failure_edges() {
        // テスト項目: 拒否と永続化失敗はそれぞれ終端状態になる
        assert_eq!(
            IngestStage::Received.on(IngestSignal::Refused),
            Some(IngestStage::Rejected)
        );
        assert_eq!(
            IngestStage::Enqueued.on(IngestSignal::PersistFailed),
            Some(IngestStage::Failed)
        );
        assert_eq!(
            IngestStage::Authorized.on(IngestSignal::PersistFailed),
            Some(IngestStage::Failed)
        );
        assert!(IngestStage::Rejected.is_terminal());
        assert!(IngestStage::Failed.is_terminal());
        assert!(!IngestStage::Persisted.is_terminal());
    }

    #[test]
    fn test_terminal_stages_accept_nothing() {
        // テスト項目: 終端状態からはどの信号でも遷移しない
        let signals = [
            IngestSignal::Accepted,
            IngestSignal::Refused,
            IngestSignal::Queued,
            IngestSignal::PersistConfirmed,
            IngestSignal::PersistFailed,
            IngestSignal::Dispatched,
        ];
        for stage in [IngestStage::Broadcast, IngestStage::Rejected, IngestStage::Failed] {
            for signal in signals {
                assert_eq!(stage.on(signal), None, "{stage:?} + {signal:?}");
            }
        }
    }
}
