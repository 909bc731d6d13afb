// handlers/public/quizzes.rs - GET /api/public/quizzes/:id

use axum::extract::State;
use uuid::Uuid;

use crate::database::models::PublicQuiz;
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiPath, ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn quiz_get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<PublicQuiz> {
    let quiz = state
        .store
        .get_quiz(id)
        .await?
        .ok_or(ApiError::not_found(Message::QuizNotFound))?;

    Ok(ApiResponse::success(quiz.public_view()))
}
