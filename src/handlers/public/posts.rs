// handlers/public/posts.rs - GET /api/public/posts[/:id]

use axum::extract::State;
use uuid::Uuid;

use crate::database::models::Post;
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiPath, ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn post_list(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state.store.list_posts().await?;
    Ok(ApiResponse::success(posts))
}

pub async fn post_get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Post> {
    let post = state
        .store
        .get_post(id)
        .await?
        .ok_or(ApiError::not_found(Message::PostNotFound))?;

    Ok(ApiResponse::success(post))
}
