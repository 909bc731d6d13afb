// handlers/me/profile.rs - GET/PATCH /api/me, PUT /api/me/avatar, PUT /api/me/visibility

use axum::extract::State;
use serde::Deserialize;

use crate::database::models::user::is_known_avatar;
use crate::database::models::{User, UserPatch, Visibility};
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiResponse, ApiResult, Identity, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    pub avatar: String,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visibility: Visibility,
}

/// Own profile, including the visibility setting.
pub async fn me_get(State(state): State<AppState>, identity: Identity) -> ApiResult<User> {
    let user = state
        .store
        .find_user(&identity.username)
        .await?
        .ok_or(ApiError::not_found(Message::UserNotFound))?;

    Ok(ApiResponse::success(user))
}

pub async fn me_patch(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(body): JsonBody<ProfileUpdate>,
) -> ApiResult<User> {
    let display_name = match body.display_name {
        Some(name) if name.trim().is_empty() => {
            return Err(ApiError::bad_request(Message::InvalidRequest));
        }
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };

    let patch = UserPatch {
        display_name,
        bio: body.bio,
        ..Default::default()
    };
    apply(&state, &identity, patch).await
}

pub async fn avatar_put(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(body): JsonBody<AvatarRequest>,
) -> ApiResult<User> {
    if !is_known_avatar(&body.avatar) {
        return Err(ApiError::bad_request(Message::InvalidAvatar));
    }

    let patch = UserPatch {
        avatar: Some(body.avatar),
        ..Default::default()
    };
    apply(&state, &identity, patch).await
}

pub async fn visibility_put(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(body): JsonBody<VisibilityRequest>,
) -> ApiResult<User> {
    let patch = UserPatch {
        visibility: Some(body.visibility),
        ..Default::default()
    };
    apply(&state, &identity, patch).await
}

async fn apply(state: &AppState, identity: &Identity, patch: UserPatch) -> ApiResult<User> {
    let user = state
        .store
        .update_user(&identity.username, patch)
        .await?
        .ok_or(ApiError::not_found(Message::UserNotFound))?;

    tracing::debug!("Updated profile of '{}'", user.username);
    Ok(ApiResponse::success(user))
}
