//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
};

use crate::{
    domain::{Membership, RoomId},
    infrastructure::dto::http::{
        AddMemberRequest, AdminRoomDto, CreateRoomRequest, MemberDto, MessageDto, RoomDto, UserDto,
    },
    ui::{error::ApiError, state::AppState},
    usecase::ChatError,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.sessions.count().await,
        "active_rooms": state.registry.active_room_count().await,
    }))
}

/// Create a room owned by the caller
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDto>), ApiError> {
    let token = bearer_token(&headers)?;
    let room = state.create_room().execute(&request.name, token).await?;
    Ok((StatusCode::CREATED, Json(room.into())))
}

/// Rooms the caller holds a membership in
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomDto>>, ApiError> {
    let token = bearer_token(&headers)?;
    let rooms = state.list_rooms().execute(token).await?;
    Ok(Json(rooms.into_iter().map(RoomDto::from).collect()))
}

/// Delete a room with its memberships and history (administrators only)
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = bearer_token(&headers)?;
    let room_id = parse_room_id(room_id)?;
    state.delete_room().execute(room_id.clone(), token).await?;
    Ok(Json(serde_json::json!({
        "message": "room deleted",
        "room_id": room_id,
    })))
}

/// Every stored user (administrators only)
pub async fn admin_list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let token = bearer_token(&headers)?;
    let users = state.admin_list_users().execute(token).await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Every room with its users (administrators only)
pub async fn admin_list_rooms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdminRoomDto>>, ApiError> {
    let token = bearer_token(&headers)?;
    let rooms = state.admin_list_rooms().execute(token).await?;
    Ok(Json(rooms.into_iter().map(AdminRoomDto::from).collect()))
}

/// Grant a user membership in a room
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<Membership>), ApiError> {
    let token = bearer_token(&headers)?;
    let room_id = parse_room_id(room_id)?;
    let membership = state
        .add_member()
        .execute(room_id, &request.username, request.can_manage, token)
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

/// Live sessions currently joined to a room
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<MemberDto>>, ApiError> {
    let token = bearer_token(&headers)?;
    state.verifier.verify(token).map_err(ChatError::from)?;
    let room_id = parse_room_id(room_id)?;

    let members = state.registry.members_of(&room_id).await;
    Ok(Json(members.into_iter().map(MemberDto::from).collect()))
}

/// Message history of a room, oldest first
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let token = bearer_token(&headers)?;
    let room_id = parse_room_id(room_id)?;
    let messages = state.list_messages().execute(room_id, token).await?;
    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))
}

fn parse_room_id(raw: String) -> Result<RoomId, ApiError> {
    RoomId::new(raw).map_err(|err| ChatError::from(err).into())
}
