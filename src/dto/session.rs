//! DTOs for the gameplay session endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::content::ContentItem,
    quiz::{Difficulty, Question, QuestionMap},
    state::session::{GameplaySession, SessionPhase},
};

/// Body of `POST /api/session`: a normalized quiz plus the selected content.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    /// Normalized question map, typically the output of `POST /api/quiz`.
    pub question_map: QuestionMap,
    /// Content the round is about; kept for result screens and legend hints.
    #[serde(default)]
    pub content: Option<ContentItem>,
}

/// Body of `POST /api/session/answer`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnswerRequest {
    /// The option text the player picked.
    pub option: String,
}

/// Projection of a question that hides the correct answer.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionView {
    /// Question identifier.
    pub id: String,
    /// Question text.
    pub question: String,
    /// Answer options in presentation order.
    pub options: Vec<String>,
    /// Difficulty tag.
    pub difficulty: Difficulty,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            question: question.question.clone(),
            options: question.options.clone(),
            difficulty: question.difficulty,
        }
    }
}

/// Wire label for the session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhaseDto {
    /// A question is on screen and the countdown is running.
    AwaitingAnswer,
    /// The correct option is revealed before auto-advancing.
    Revealing,
    /// All questions are resolved.
    Finished,
}

impl From<&SessionPhase> for SessionPhaseDto {
    fn from(phase: &SessionPhase) -> Self {
        match phase {
            SessionPhase::AwaitingAnswer => SessionPhaseDto::AwaitingAnswer,
            SessionPhase::Revealing { .. } => SessionPhaseDto::Revealing,
            SessionPhase::Finished => SessionPhaseDto::Finished,
        }
    }
}

/// Snapshot of the running session returned by `GET /api/session`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Session identifier.
    pub id: Uuid,
    /// Current phase.
    pub phase: SessionPhaseDto,
    /// Zero-based tier index (0..=2).
    pub level: usize,
    /// Zero-based question index within the tier.
    pub index: usize,
    /// The question on screen, without its answer; absent once finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    /// Seconds left on the countdown; zero outside the answering phase.
    pub timer_remaining: u64,
    /// Correct option, revealed only after the question resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_answer: Option<String>,
    /// Current score.
    pub score: u32,
}

impl SessionView {
    /// Project a session into its client view, computing the remaining time.
    pub fn from_session(session: &GameplaySession) -> Self {
        Self {
            id: session.id,
            phase: (&session.phase).into(),
            level: session.level,
            index: session.index,
            question: session.current_question().map(QuestionView::from),
            timer_remaining: session.remaining_seconds(),
            revealed_answer: session.revealed_answer().map(str::to_owned),
            score: session.score,
        }
    }
}

/// Outcome of an answered (or timed-out) question.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    /// Whether the submitted option was correct.
    pub correct: bool,
    /// The correct option, always revealed.
    pub correct_answer: String,
    /// Score after this question.
    pub score: u32,
}

/// Body of `POST /api/session/guess` (legend mode).
#[derive(Debug, Deserialize, ToSchema)]
pub struct GuessRequest {
    /// Free-text title guess.
    pub guess: String,
}

/// Outcome of a legend-mode guess.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuessView {
    /// Whether the guess matched the title.
    pub correct: bool,
    /// Score after the guess.
    pub score: u32,
}

/// Indirect clue returned by `GET /api/session/hint` (legend mode).
#[derive(Debug, Serialize, ToSchema)]
pub struct HintView {
    /// One-sentence clue that avoids naming the title.
    pub hint: String,
}

/// Final results of a round, returned by `GET /api/session/results`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    /// Final score.
    pub score: u32,
    /// Number of questions actually played (levels may be shorter than 3).
    pub total_questions: usize,
    /// Rounded percentage of the maximum achievable score.
    pub accuracy: u32,
}
