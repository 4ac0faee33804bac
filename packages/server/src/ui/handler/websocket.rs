//! WebSocket connection handlers.
//!
//! Each connection is one session. Client frames are handled one at a time in
//! arrival order; replies and room events share the socket's send half.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{MessageContent, MessageId, RoomId},
    infrastructure::dto::websocket::{ClientFrame, ServerFrame},
    realtime::SessionHandle,
    ui::state::AppState,
    usecase::ChatError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (session, mut events) = match state.connect_session().execute().await {
        Ok(opened) => opened,
        Err(e) => {
            tracing::error!("Failed to open session: {}", e);
            return;
        }
    };
    let session_id = session.id.clone();
    let (mut sender, mut receiver) = socket.split();

    // Replies go only to this session
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<ServerFrame>();
    let _ = reply_tx.send(ServerFrame::SessionOpened {
        session_id: session_id.to_string(),
    });

    let mut send_task = tokio::spawn(async move {
        loop {
            let encoded = tokio::select! {
                biased;
                Some(reply) = reply_rx.recv() => serde_json::to_string(&reply),
                Some(event) = events.recv() => serde_json::to_string(event.as_ref()),
                else => break,
            };
            let text = match encoded {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to encode frame: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_state = state.clone();
    let recv_session = session.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(session_id = %recv_session.id, "WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let reply = handle_frame(&recv_state, &recv_session, text.as_str()).await;
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::info!(session_id = %recv_session.id, "client requested close");
                    break;
                }
                // Ping/pong is answered by the protocol layer
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.disconnect_session().execute(&session_id).await;
}

async fn handle_frame(state: &AppState, session: &SessionHandle, text: &str) -> ServerFrame {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(session_id = %session.id, "unparseable frame: {}", e);
            return ServerFrame::error("bad-request", format!("unparseable frame: {e}"));
        }
    };

    match dispatch_frame(state, session, frame).await {
        Ok(reply) => reply,
        Err(err) => {
            tracing::debug!(session_id = %session.id, code = err.code(), "request failed: {}", err);
            ServerFrame::error(err.code(), err.to_string())
        }
    }
}

async fn dispatch_frame(
    state: &AppState,
    session: &SessionHandle,
    frame: ClientFrame,
) -> Result<ServerFrame, ChatError> {
    match frame {
        ClientFrame::Join { room_id, token } => {
            let room_id = RoomId::new(room_id)?;
            state
                .join_room()
                .execute(session, room_id.clone(), &token)
                .await?;
            Ok(ServerFrame::ack("join", room_id))
        }
        ClientFrame::Send {
            room_id,
            content,
            token,
        } => {
            let room_id = RoomId::new(room_id)?;
            let content = MessageContent::new(content)?;
            let message = state
                .send_message()
                .execute(room_id, content, &token)
                .await?;
            Ok(ServerFrame::Ack {
                action: "send".to_string(),
                room_id: message.room_id.into_string(),
                message_id: Some(message.id.into_string()),
            })
        }
        ClientFrame::Delete {
            room_id,
            message_id,
            token,
        } => {
            let room_id = RoomId::new(room_id)?;
            let message_id = MessageId::new(message_id)?;
            state
                .delete_message()
                .execute(room_id.clone(), message_id.clone(), &token)
                .await?;
            Ok(ServerFrame::Ack {
                action: "delete".to_string(),
                room_id: room_id.into_string(),
                message_id: Some(message_id.into_string()),
            })
        }
        ClientFrame::Leave { room_id } => {
            let room_id = RoomId::new(room_id)?;
            state.leave_room().execute(&session.id, &room_id).await;
            Ok(ServerFrame::ack("leave", room_id))
        }
    }
}
