//! UseCase: メッセージ送信処理
//!
//! 受信したメッセージを検証し、書き込みキューに積み、永続化の完了を待ってから
//! ルームの全メンバーへ配信する。永続化に失敗したメッセージは配信しない。
//! キュー投入後の処理は別タスクで進むため、送信元の接続が切れても
//! 永続化されたメッセージは配信される。
//!
//! ### どのような状況を想定しているか
//! - 正常系：永続化後に送信者を含む全メンバーへ NewMessage が届く
//! - 異常系：存在しないルーム、無効なトークン、永続化の失敗
//! - 中断：永続化待ちの途中で呼び出し元が破棄されても配信される

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::{
        BroadcastEvent, ChatRepository, IdFactory, IdentityVerifier, Message, MessageContent,
        MessageQueue, NotificationEvent, Notifier, PersistTicket, RoomId, Timestamp, User,
    },
    realtime::BroadcastDispatcher,
};

use super::{
    auth::authenticate,
    error::ChatError,
    ingest::{IngestSignal, IngestTracker},
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    verifier: Arc<dyn IdentityVerifier>,
    repository: Arc<dyn ChatRepository>,
    queue: Arc<dyn MessageQueue>,
    dispatcher: BroadcastDispatcher,
    notifier: Arc<dyn Notifier>,
}

impl SendMessageUseCase {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        repository: Arc<dyn ChatRepository>,
        queue: Arc<dyn MessageQueue>,
        dispatcher: BroadcastDispatcher,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            verifier,
            repository,
            queue,
            dispatcher,
            notifier,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 永続化され配信されたメッセージ
    /// * `Err(ChatError)` - 送信失敗（配信は一切行われない）
    pub async fn execute(
        &self,
        room_id: RoomId,
        content: MessageContent,
        token: &str,
    ) -> Result<Message, ChatError> {
        let mut ingest = IngestTracker::new(IdFactory::message_id()?);

        // 1. 認証とルームの存在確認
        let author = match self.authorize(&room_id, token).await {
            Ok(user) => {
                ingest.advance(IngestSignal::Accepted);
                user
            }
            Err(err) => {
                ingest.advance(IngestSignal::Refused);
                return Err(err);
            }
        };

        let message = Message::new(
            ingest.message_id().clone(),
            content,
            author.id.clone(),
            room_id.clone(),
            Timestamp::now(),
        );

        // 2. 書き込みキューへ投入する
        let ticket = match self.queue.enqueue(message.clone()).await {
            Ok(ticket) => ticket,
            Err(err) => {
                ingest.advance(IngestSignal::PersistFailed);
                warn!(message_id = %message.id, room_id = %room_id, error = %err, "message not enqueued");
                return Err(err.into());
            }
        };
        ingest.advance(IngestSignal::Queued);

        // 3. 完了待ちと配信は別タスクで行い、呼び出し元が中断されても配信される
        let tail = tokio::spawn(complete_delivery(
            ingest,
            ticket,
            message,
            author.username,
            self.dispatcher.clone(),
            self.notifier.clone(),
        ));
        tail.await
            .map_err(|err| ChatError::Storage(format!("delivery task failed: {err}")))?
    }

    async fn authorize(&self, room_id: &RoomId, token: &str) -> Result<User, ChatError> {
        let (_, user) =
            authenticate(self.verifier.as_ref(), self.repository.as_ref(), token).await?;
        self.repository
            .find_room(room_id)
            .await?
            .ok_or_else(|| ChatError::RoomNotFound(room_id.to_string()))?;
        Ok(user)
    }
}

/// Wait for the write, then fan the message out. Only persisted messages are
/// broadcast.
async fn complete_delivery(
    mut ingest: IngestTracker,
    ticket: PersistTicket,
    message: Message,
    author_username: String,
    dispatcher: BroadcastDispatcher,
    notifier: Arc<dyn Notifier>,
) -> Result<Message, ChatError> {
    if let Err(err) = ticket.wait().await {
        ingest.advance(IngestSignal::PersistFailed);
        warn!(message_id = %message.id, room_id = %message.room_id, error = %err, "message not persisted");
        return Err(err.into());
    }
    ingest.advance(IngestSignal::PersistConfirmed);

    let delivered = dispatcher
        .broadcast(
            &message.room_id,
            BroadcastEvent::NewMessage {
                message: message.clone(),
                author_username: author_username.clone(),
            },
        )
        .await;
    ingest.advance(IngestSignal::Dispatched);
    info!(message_id = %message.id, room_id = %message.room_id, delivered, "message broadcast");

    notifier.notify(NotificationEvent::NewMessage {
        username: author_username,
        room_id: message.room_id.clone(),
        message: message.content.as_str().to_string(),
    });

    Ok(message)
}
