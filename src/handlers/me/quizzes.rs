// handlers/me/quizzes.rs - POST /api/me/quizzes/:id/attempts, GET /api/me/quizzes/attempts

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{NewAttempt, QuizAttempt};
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiPath, ApiResponse, ApiResult, Identity, JsonBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AttemptRequest {
    /// One choice index per question, in question order
    pub answers: Vec<usize>,
}

pub async fn attempt_create(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<Uuid>,
    JsonBody(body): JsonBody<AttemptRequest>,
) -> ApiResult<QuizAttempt> {
    let quiz = state
        .store
        .get_quiz(id)
        .await?
        .ok_or(ApiError::not_found(Message::QuizNotFound))?;

    let score = quiz
        .score(&body.answers)
        .ok_or(ApiError::bad_request(Message::AnswerCountMismatch))?;

    let attempt = state
        .store
        .record_attempt(NewAttempt {
            quiz_id: quiz.id,
            username: identity.username,
            score,
            total: quiz.questions.len() as i32,
        })
        .await?;

    tracing::debug!(
        "'{}' scored {}/{} on quiz {}",
        attempt.username,
        attempt.score,
        attempt.total,
        attempt.quiz_id
    );
    Ok(ApiResponse::created(attempt))
}

pub async fn attempt_list(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Vec<QuizAttempt>> {
    let attempts = state.store.list_attempts(&identity.username).await?;
    Ok(ApiResponse::success(attempts))
}
