// handlers/public/topics.rs - GET /api/public/topics[/:id[/quizzes]]

use axum::extract::State;
use uuid::Uuid;

use crate::database::models::{PublicQuiz, TopicDetail, TopicSummary};
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiPath, ApiResponse, ApiResult};
use crate::state::AppState;

/// All topics, newest first, with their roadmap counts.
pub async fn topic_list(State(state): State<AppState>) -> ApiResult<Vec<TopicSummary>> {
    let topics = state.store.list_topics().await?;
    Ok(ApiResponse::success(topics))
}

pub async fn topic_get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<TopicDetail> {
    let topic = state
        .store
        .get_topic(id)
        .await?
        .ok_or(ApiError::not_found(Message::TopicNotFound))?;

    Ok(ApiResponse::success(topic))
}

/// Quizzes attached to a topic, answers stripped.
pub async fn topic_quizzes(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<PublicQuiz>> {
    if state.store.get_topic(id).await?.is_none() {
        return Err(ApiError::not_found(Message::TopicNotFound));
    }

    let quizzes = state.store.list_quizzes(id).await?;
    Ok(ApiResponse::success(
        quizzes.iter().map(|quiz| quiz.public_view()).collect(),
    ))
}
