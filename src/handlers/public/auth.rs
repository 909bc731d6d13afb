// handlers/public/auth.rs - POST /api/public/auth/register, POST /api/public/auth/login
//
// Token acquisition for members. Admins sign in through /api/admin/login.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password, Role};
use crate::database::models::{NewUser, User};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    /// Seconds
    pub expires_in: u64,
    pub user: User,
}

/// 3 to 30 characters of `[A-Za-z0-9_]`
pub fn is_valid_username(username: &str) -> bool {
    (3..=30).contains(&username.len())
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> ApiResult<SessionResponse> {
    if !is_valid_username(&body.username) {
        return Err(ApiError::bad_request(Message::InvalidUsername));
    }
    if body.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::bad_request(Message::PasswordTooShort));
    }

    if !state.store.get_settings().await?.registration_open {
        return Err(ApiError::forbidden(Message::RegistrationClosed));
    }

    let password_hash = hash_password(&body.password, state.bcrypt_cost()).await?;
    let display_name = body
        .display_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| body.username.clone());

    let user = match state
        .store
        .create_user(NewUser {
            username: body.username,
            password_hash,
            display_name,
        })
        .await
    {
        Ok(user) => user,
        Err(DatabaseError::Conflict(_)) => return Err(ApiError::conflict(Message::UsernameTaken)),
        Err(e) => return Err(e.into()),
    };

    let token = state.keys.issue(&user.username, Role::Member)?;
    tracing::info!("Registered member '{}'", user.username);

    Ok(ApiResponse::created(SessionResponse {
        token,
        expires_in: state.keys.expires_in_secs(),
        user,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let Some(user) = state.store.find_user(&body.username).await? else {
        tracing::info!("Login for unknown member '{}'", body.username);
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&body.password, &user.password_hash).await? {
        tracing::info!("Wrong password for member '{}'", user.username);
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.keys.issue(&user.username, Role::Member)?;

    Ok(ApiResponse::success(SessionResponse {
        token,
        expires_in: state.keys.expires_in_secs(),
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(is_valid_username("ada_lovelace"));
        assert!(is_valid_username("abc"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("dash-ed"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }
}
