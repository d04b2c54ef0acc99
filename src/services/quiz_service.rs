//! Quiz generation: single-flight AI call followed by normalization.

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    dto::quiz::QuizRequest,
    error::ServiceError,
    generation::QuizSubject,
    quiz::{QuizState, normalizer::normalize_levels},
    state::SharedState,
};

/// Generate and normalize a quiz for the requested content.
///
/// The upstream call runs under the process-wide single-flight gate, so a
/// burst of requests results in one generation whose payload every caller
/// normalizes. When generation yields nothing there is no metadata to build
/// a meaningful fallback from at this layer, so the failure is surfaced.
pub async fn generate_quiz(
    state: &SharedState,
    request: QuizRequest,
) -> Result<QuizState, ServiceError> {
    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("content title is required".into()))?
        .to_owned();

    let subject = QuizSubject::from_request(title, &request);

    let raw = state
        .generation_gate()
        .run({
            let generator = Arc::clone(state.generator());
            let subject = subject.clone();
            move || {
                let generator = Arc::clone(&generator);
                let subject = subject.clone();
                async move { generator.generate(&subject).await }
            }
        })
        .await;

    let Some(raw) = raw else {
        error!(title = %subject.title, "quiz generator returned no payload");
        return Err(ServiceError::GenerationFailed);
    };

    let question_map = normalize_levels(&raw, &subject.title);
    info!(
        title = %subject.title,
        questions = question_map.total_questions(),
        "quiz ready"
    );

    Ok(QuizState::new(question_map))
}
