// handlers/admin/quizzes.rs - POST /api/admin/quizzes

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{NewQuiz, Question, Quiz};
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    pub topic_id: Uuid,
    pub title: String,
    pub questions: Vec<Question>,
}

/// Returns the full quiz, answers included.
pub async fn quiz_create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateQuizRequest>,
) -> ApiResult<Quiz> {
    if state.store.get_topic(body.topic_id).await?.is_none() {
        return Err(ApiError::not_found(Message::TopicNotFound));
    }
    if !Quiz::is_well_formed(&body.title, &body.questions) {
        return Err(ApiError::bad_request(Message::InvalidQuiz));
    }

    let quiz = state
        .store
        .create_quiz(NewQuiz {
            topic_id: body.topic_id,
            title: body.title.trim().to_string(),
            questions: body.questions,
        })
        .await?;

    tracing::info!("Quiz '{}' added to topic {}", quiz.title, quiz.topic_id);
    Ok(ApiResponse::created(quiz))
}
