//! HTTP mapping of use case errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{infrastructure::dto::http::ErrorBody, usecase::ChatError};

/// Error returned by HTTP handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.to_string(),
                error: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "invalid-token", message)
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        let status = match &err {
            ChatError::Auth(_) => StatusCode::UNAUTHORIZED,
            ChatError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ChatError::UserNotFound(_)
            | ChatError::RoomNotFound(_)
            | ChatError::MessageNotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Forbidden => StatusCode::FORBIDDEN,
            ChatError::SessionClosed => StatusCode::GONE,
            ChatError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
