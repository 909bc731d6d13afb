// handlers/me/posts.rs - /api/me/posts

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{NewPost, Post};
use crate::error::ApiError;
use crate::handlers::Deleted;
use crate::messages::Message;
use crate::middleware::{ApiPath, ApiResponse, ApiResult, Identity, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}

pub async fn my_posts(State(state): State<AppState>, identity: Identity) -> ApiResult<Vec<Post>> {
    let posts = state.store.list_posts_by(&identity.username).await?;
    Ok(ApiResponse::success(posts))
}

pub async fn post_create(
    State(state): State<AppState>,
    identity: Identity,
    JsonBody(body): JsonBody<CreatePostRequest>,
) -> ApiResult<Post> {
    let title = body.title.trim();
    let text = body.body.trim();
    if title.is_empty() || text.is_empty() {
        return Err(ApiError::bad_request(Message::PostContentRequired));
    }

    let post = state
        .store
        .create_post(NewPost {
            author: identity.username,
            title: title.to_string(),
            body: text.to_string(),
        })
        .await?;

    Ok(ApiResponse::created(post))
}

/// Members may only delete their own posts.
pub async fn post_delete(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Deleted> {
    let post = state
        .store
        .get_post(id)
        .await?
        .ok_or(ApiError::not_found(Message::PostNotFound))?;

    if post.author != identity.username {
        return Err(ApiError::forbidden(Message::NotPostAuthor));
    }

    if !state.store.delete_post(id).await? {
        return Err(ApiError::not_found(Message::PostNotFound));
    }
    Ok(ApiResponse::success(Deleted { id }))
}
