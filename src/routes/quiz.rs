use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::quiz::QuizRequest, error::AppError, quiz::QuizState, services::quiz_service,
    state::SharedState,
};

/// Routes handling quiz generation.
pub fn router() -> Router<SharedState> {
    Router::new().route("/quiz", post(generate_quiz))
}

/// Generate a normalized three-tier quiz for the selected content.
#[utoipa::path(
    post,
    path = "/api/quiz",
    tag = "quiz",
    request_body = QuizRequest,
    responses(
        (status = 200, description = "Normalized quiz", body = QuizState),
        (status = 400, description = "Missing content title"),
        (status = 500, description = "Generation produced no payload")
    )
)]
pub async fn generate_quiz(
    State(state): State<SharedState>,
    Json(payload): Json<QuizRequest>,
) -> Result<Json<QuizState>, AppError> {
    let quiz = quiz_service::generate_quiz(&state, payload).await?;
    Ok(Json(quiz))
}
