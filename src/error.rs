// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::messages::Message;

/// HTTP API error; every variant renders through the failure envelope
/// except `Unauthorized`, which answers 401 with an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(Message),

    // 401 Unauthorized, no body
    Unauthorized,

    // 401 Unauthorized, with envelope (failed credential checks)
    InvalidCredentials,

    // 403 Forbidden
    Forbidden(Message),

    // 404 Not Found
    NotFound(Message),

    // 409 Conflict
    Conflict(Message),

    // 500 Internal Server Error
    Internal(Message),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message key
    pub fn message(&self) -> Message {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => *msg,
            ApiError::Unauthorized => Message::Unauthorized,
            ApiError::InvalidCredentials => Message::InvalidCredentials,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message().text(),
        })
    }
}

// Static constructors
impl ApiError {
    pub fn bad_request(message: Message) -> Self {
        ApiError::BadRequest(message)
    }

    pub fn forbidden(message: Message) -> Self {
        ApiError::Forbidden(message)
    }

    pub fn not_found(message: Message) -> Self {
        ApiError::NotFound(message)
    }

    pub fn conflict(message: Message) -> Self {
        ApiError::Conflict(message)
    }

    pub fn internal() -> Self {
        ApiError::Internal(Message::InternalError)
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(what) => {
                tracing::debug!("Conflict: {}", what);
                ApiError::conflict(Message::InvalidRequest)
            }
            other => {
                // Log the real error but return the generic message
                tracing::error!("Database error: {}", other);
                ApiError::internal()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Hashing(msg) | AuthError::TokenGeneration(msg) => {
                tracing::error!("Auth internal error: {}", msg);
                ApiError::internal()
            }
            _ => ApiError::Unauthorized,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if self == ApiError::Unauthorized {
            return status.into_response();
        }
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_table_text() {
        let err = ApiError::not_found(Message::TopicNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.to_json(),
            json!({ "success": false, "error": "No such topic." })
        );
    }

    #[test]
    fn database_failures_collapse_to_internal() {
        let err: ApiError = DatabaseError::Sqlx(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err, ApiError::internal());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_failures_map_to_unauthorized() {
        let err: ApiError = AuthError::MissingHeader.into();
        assert_eq!(err, ApiError::Unauthorized);
        let err: ApiError = AuthError::Hashing("boom".into()).into();
        assert_eq!(err, ApiError::internal());
    }
}
