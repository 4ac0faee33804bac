//! Server assembly and main loop.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::{ChatRepository, Notifier},
    error::ServerError,
    infrastructure::{
        auth::JwtIdentityVerifier,
        notifier::{NoopNotifier, WebhookNotifier},
        queue::InProcessMessageQueue,
        repository::{InMemoryChatRepository, SeedData},
    },
};

use super::{
    handler::{
        add_member, admin_list_rooms, admin_list_users, create_room, delete_room, health_check,
        list_members, list_messages, list_rooms, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Routes of the HTTP API and the websocket endpoint.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(list_rooms).post(create_room))
        .route("/api/rooms/{room_id}", delete(delete_room))
        .route("/api/rooms/{room_id}/members", get(list_members))
        .route("/api/rooms/{room_id}/users", post(add_member))
        .route("/api/rooms/{room_id}/messages", get(list_messages))
        .route("/api/admin/users", get(admin_list_users))
        .route("/api/admin/rooms", get(admin_list_rooms))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire storage, queue, notifier and verifier from configuration.
///
/// Must be called inside a tokio runtime; the queue consumer is spawned here.
pub async fn build_state(config: &ServerConfig) -> Result<Arc<AppState>, ServerError> {
    let repository = match &config.seed {
        Some(path) => {
            let seed = SeedData::load(path).await?;
            tracing::info!(
                users = seed.users.len(),
                rooms = seed.rooms.len(),
                "loaded seed data from {}",
                path.display()
            );
            InMemoryChatRepository::from_seed(seed)
        }
        None => InMemoryChatRepository::new(),
    };
    let repository: Arc<dyn ChatRepository> = Arc::new(repository);

    let (queue, _worker) =
        InProcessMessageQueue::spawn(repository.clone(), config.queue_settings());

    let notifier: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => {
            tracing::info!("webhook notifications enabled: {}", url);
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => Arc::new(NoopNotifier),
    };

    Ok(Arc::new(AppState::new(
        Arc::new(JwtIdentityVerifier::new(&config.jwt_secret)),
        repository,
        Arc::new(queue),
        notifier,
        config.outbound_buffer,
    )))
}

/// Run the server until a shutdown signal arrives.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = build_state(&config).await?;
    let app = build_app(state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}
