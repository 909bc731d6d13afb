// handlers/admin/users.rs - GET /api/admin/users

use axum::extract::State;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Every member, oldest first, private profiles included.
pub async fn user_list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.store.list_users().await?;
    Ok(ApiResponse::success(users))
}
