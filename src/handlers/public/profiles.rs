// handlers/public/profiles.rs - GET /api/public/users/:username

use axum::extract::State;

use crate::auth::Role;
use crate::database::models::{PublicProfile, Visibility};
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiPath, ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;

/// Public profile of a member. Private profiles answer 404 to everyone but
/// their owner, so their existence is not revealed.
pub async fn profile_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<PublicProfile> {
    let user = state
        .store
        .find_user(&username)
        .await?
        .ok_or(ApiError::not_found(Message::UserNotFound))?;

    let is_owner = ctx
        .identity
        .as_ref()
        .is_some_and(|identity| identity.role == Role::Member && identity.username == user.username);

    if user.visibility == Visibility::Private && !is_owner {
        return Err(ApiError::not_found(Message::UserNotFound));
    }

    Ok(ApiResponse::success(user.public_profile()))
}
