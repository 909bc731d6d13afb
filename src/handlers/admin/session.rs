// handlers/admin/session.rs - POST /api/admin/login, GET /api/admin/session

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::{verify_password, Role};
use crate::database::models::Admin;
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiResponse, ApiResult, Identity, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminSession {
    pub token: String,
    pub username: String,
    /// Seconds
    pub expires_in: u64,
}

pub async fn admin_login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AdminLoginRequest>,
) -> ApiResult<AdminSession> {
    let Some(admin) = state.store.find_admin(&body.username).await? else {
        tracing::warn!("Admin login for unknown admin '{}'", body.username);
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&body.password, &admin.password_hash).await? {
        tracing::warn!("Wrong password for admin '{}'", admin.username);
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.keys.issue(&admin.username, Role::Admin)?;
    tracing::info!("Admin '{}' signed in", admin.username);

    Ok(ApiResponse::success(AdminSession {
        token,
        username: admin.username,
        expires_in: state.keys.expires_in_secs(),
    }))
}

/// Who the admin token belongs to; the admin panel calls this on load.
pub async fn admin_session(State(state): State<AppState>, identity: Identity) -> ApiResult<Admin> {
    let admin = state
        .store
        .find_admin(&identity.username)
        .await?
        .ok_or(ApiError::forbidden(Message::AdminOnly))?;
    Ok(ApiResponse::success(admin))
}
