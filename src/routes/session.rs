use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::session::{
        AnswerRequest, AnswerView, GuessRequest, GuessView, HintView, ResultsSummary, SessionView,
        StartSessionRequest,
    },
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Routes handling the gameplay session lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/session", post(start_session).get(get_session))
        .route("/session/answer", post(submit_answer))
        .route("/session/advance", post(advance_session))
        .route("/session/reset", post(reset_session))
        .route("/session/results", get(session_results))
        .route("/session/guess", post(submit_guess))
        .route("/session/hint", get(session_hint))
}

/// Start a round from a normalized quiz, replacing any running one.
#[utoipa::path(
    post,
    path = "/api/session",
    tag = "session",
    request_body = StartSessionRequest,
    responses(
        (status = 200, description = "Session started", body = SessionView),
        (status = 400, description = "A tier has no questions")
    )
)]
pub async fn start_session(
    State(state): State<SharedState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = session_service::start(&state, payload).await?;
    Ok(Json(view))
}

/// Snapshot the running session.
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "session",
    responses(
        (status = 200, description = "Current session state", body = SessionView),
        (status = 404, description = "No active session")
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
) -> Result<Json<SessionView>, AppError> {
    let view = session_service::view(&state).await?;
    Ok(Json(view))
}

/// Answer the question currently on screen.
#[utoipa::path(
    post,
    path = "/api/session/answer",
    tag = "session",
    request_body = AnswerRequest,
    responses(
        (status = 200, description = "Answer resolved", body = AnswerView),
        (status = 404, description = "No active session"),
        (status = 409, description = "No question is awaiting an answer")
    )
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerView>, AppError> {
    let outcome = session_service::submit_answer(&state, payload).await?;
    Ok(Json(outcome))
}

/// Skip the reveal pause and move to the next question immediately.
#[utoipa::path(
    post,
    path = "/api/session/advance",
    tag = "session",
    responses(
        (status = 200, description = "Session advanced", body = SessionView),
        (status = 404, description = "No active session"),
        (status = 409, description = "The round is already finished")
    )
)]
pub async fn advance_session(
    State(state): State<SharedState>,
) -> Result<Json<SessionView>, AppError> {
    let view = session_service::force_advance(&state).await?;
    Ok(Json(view))
}

/// Discard the running session.
#[utoipa::path(
    post,
    path = "/api/session/reset",
    tag = "session",
    responses((status = 204, description = "Session discarded"))
)]
pub async fn reset_session(State(state): State<SharedState>) -> StatusCode {
    session_service::reset(&state).await;
    StatusCode::NO_CONTENT
}

/// Guess the content title (legend mode); a match scores the legend bonus.
#[utoipa::path(
    post,
    path = "/api/session/guess",
    tag = "session",
    request_body = GuessRequest,
    responses(
        (status = 200, description = "Guess checked", body = GuessView),
        (status = 400, description = "Empty guess"),
        (status = 404, description = "No active session"),
        (status = 409, description = "No content attached or title already guessed")
    )
)]
pub async fn submit_guess(
    State(state): State<SharedState>,
    Json(payload): Json<GuessRequest>,
) -> Result<Json<GuessView>, AppError> {
    let outcome = session_service::submit_guess(&state, payload).await?;
    Ok(Json(outcome))
}

/// Generate an indirect clue about the session's content (legend mode).
#[utoipa::path(
    get,
    path = "/api/session/hint",
    tag = "session",
    responses(
        (status = 200, description = "Indirect clue", body = HintView),
        (status = 404, description = "No active session"),
        (status = 409, description = "No content attached"),
        (status = 500, description = "Hint generation failed")
    )
)]
pub async fn session_hint(
    State(state): State<SharedState>,
) -> Result<Json<HintView>, AppError> {
    let hint = session_service::hint(&state).await?;
    Ok(Json(hint))
}

/// Final score, question count, and accuracy of the round.
#[utoipa::path(
    get,
    path = "/api/session/results",
    tag = "session",
    responses(
        (status = 200, description = "Round results", body = ResultsSummary),
        (status = 404, description = "No active session")
    )
)]
pub async fn session_results(
    State(state): State<SharedState>,
) -> Result<Json<ResultsSummary>, AppError> {
    let summary = session_service::results(&state).await?;
    Ok(Json(summary))
}
