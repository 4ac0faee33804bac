//! In-process message write queue.
//!
//! A single consumer task drains the queue in order, writes each message
//! through the repository, and reports the outcome on the message's ticket.
//! Retrying transient storage failures is the consumer's job; the producer
//! only ever sees the final outcome.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::domain::{ChatRepository, Message, MessageQueue, PersistTicket, RepositoryError};

#[derive(Debug, Clone, Copy)]
pub struct QueueSettings {
    pub capacity: usize,
    /// Total write attempts per message, at least one
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            capacity: 1024,
            max_attempts: 3,
            retry_delay: Duration::from_millis(100),
        }
    }
}

struct QueuedWrite {
    message: Message,
    done: oneshot::Sender<Result<(), RepositoryError>>,
}

/// Producer half of the queue
#[derive(Clone)]
pub struct InProcessMessageQueue {
    sender: mpsc::Sender<QueuedWrite>,
}

impl InProcessMessageQueue {
    /// Start the consumer task. It stops once every producer is dropped.
    pub fn spawn(
        repository: Arc<dyn ChatRepository>,
        settings: QueueSettings,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(settings.capacity.max(1));
        let worker = tokio::spawn(consume(receiver, repository, settings));
        (Self { sender }, worker)
    }
}

#[async_trait]
impl MessageQueue for InProcessMessageQueue {
    async fn enqueue(&self, message: Message) -> Result<PersistTicket, RepositoryError> {
        let (done, ticket) = oneshot::channel();
        self.sender
            .send(QueuedWrite { message, done })
            .await
            .map_err(|_| RepositoryError::Storage("message queue is closed".to_string()))?;
        Ok(PersistTicket::new(ticket))
    }
}

async fn consume(
    mut receiver: mpsc::Receiver<QueuedWrite>,
    repository: Arc<dyn ChatRepository>,
    settings: QueueSettings,
) {
    while let Some(QueuedWrite { message, done }) = receiver.recv().await {
        let message_id = message.id.clone();
        let result = persist(repository.as_ref(), message, settings).await;
        match &result {
            Ok(()) => tracing::debug!(message_id = %message_id, "message persisted"),
            Err(err) => tracing::error!(message_id = %message_id, "message write failed: {}", err),
        }
        // producer may have given up waiting
        let _ = done.send(result);
    }
    tracing::info!("message queue consumer stopped");
}

async fn persist(
    repository: &dyn ChatRepository,
    message: Message,
    settings: QueueSettings,
) -> Result<(), RepositoryError> {
    let max_attempts = settings.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match repository.create_message(message.clone()).await {
            Ok(()) => return Ok(()),
            Err(RepositoryError::Storage(reason)) if attempt < max_attempts => {
                tracing::warn!(
                    message_id = %message.id,
                    attempt,
                    "transient write failure, retrying: {}",
                    reason
                );
                attempt += 1;
                tokio::time::sleep(settings.retry_delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
