// handlers/admin/posts.rs - DELETE /api/admin/posts/:id (moderation)

use axum::extract::State;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::Deleted;
use crate::messages::Message;
use crate::middleware::{ApiPath, ApiResponse, ApiResult, Identity};
use crate::state::AppState;

pub async fn post_remove(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Deleted> {
    if !state.store.delete_post(id).await? {
        return Err(ApiError::not_found(Message::PostNotFound));
    }
    tracing::info!("Post {} removed by admin '{}'", id, identity.username);
    Ok(ApiResponse::success(Deleted { id }))
}
