//! Gameplay session lifecycle: event handling plus the countdown timers.
//!
//! The session state machine itself is pure (see `state::session`); this
//! service feeds it events. Exactly one timer task exists at a time, owned by
//! the transition that armed it: arming a new one aborts the old handle, and
//! every timer double-checks the question epoch before acting so a stale
//! firing is a no-op rather than a duplicate event.

use std::{future::Future, pin::Pin, time::Duration};

use tokio::time::sleep;
use tracing::debug;

use crate::{
    dto::session::{
        AnswerRequest, AnswerView, GuessRequest, GuessView, HintView, ResultsSummary, SessionView,
        StartSessionRequest,
    },
    error::ServiceError,
    quiz::legend::LegendVerdict,
    state::{
        SharedState,
        session::{GameplaySession, Progress, SessionPhase, SessionStateError},
    },
};

/// Start a fresh round from a normalized quiz, replacing any running one.
pub async fn start(
    state: &SharedState,
    request: StartSessionRequest,
) -> Result<SessionView, ServiceError> {
    let rules = state.config().rules;
    let session = GameplaySession::start(request.question_map, request.content, rules)?;
    let epoch = session.epoch;
    let view = SessionView::from_session(&session);

    *state.session().write().await = Some(session);
    arm_question_timer(state, epoch).await;

    debug!(session_id = %view.id, "session started");
    Ok(view)
}

/// Snapshot the running session.
pub async fn view(state: &SharedState) -> Result<SessionView, ServiceError> {
    let guard = state.session().read().await;
    let session = guard
        .as_ref()
        .ok_or_else(|| ServiceError::NotFound("no active session".into()))?;
    Ok(SessionView::from_session(session))
}

/// Resolve the current question with the player's pick.
pub async fn submit_answer(
    state: &SharedState,
    request: AnswerRequest,
) -> Result<AnswerView, ServiceError> {
    let resolution = {
        let mut guard = state.session().write().await;
        let session = guard
            .as_mut()
            .ok_or_else(|| ServiceError::NotFound("no active session".into()))?;
        session.answer(&request.option)?
    };

    // The answer cancels the countdown; the reveal pause takes its place.
    arm_advance_timer(state, resolution.epoch).await;

    Ok(AnswerView {
        correct: resolution.correct,
        correct_answer: resolution.correct_answer,
        score: resolution.score,
    })
}

/// Force the session forward, cancelling any reveal pause.
pub async fn force_advance(state: &SharedState) -> Result<SessionView, ServiceError> {
    advance_session(state, None).await?;
    view(state).await
}

/// Check a legend-mode title guess against the session's content.
///
/// Guessing runs alongside the classic flow and never touches its timers.
pub async fn submit_guess(
    state: &SharedState,
    request: GuessRequest,
) -> Result<GuessView, ServiceError> {
    let mut guard = state.session().write().await;
    let session = guard
        .as_mut()
        .ok_or_else(|| ServiceError::NotFound("no active session".into()))?;

    let outcome = session.guess(&request.guess)?;
    match outcome.verdict {
        LegendVerdict::Empty => Err(ServiceError::InvalidInput("guess is empty".into())),
        verdict => Ok(GuessView {
            correct: verdict == LegendVerdict::Correct,
            score: outcome.score,
        }),
    }
}

/// Generate an indirect legend-mode clue about the session's content.
pub async fn hint(state: &SharedState) -> Result<HintView, ServiceError> {
    let (content, round) = {
        let guard = state.session().read().await;
        let session = guard
            .as_ref()
            .ok_or_else(|| ServiceError::NotFound("no active session".into()))?;
        let content = session
            .content
            .clone()
            .ok_or(SessionStateError::NoContent)?;
        (content, session.slot_number())
    };

    let hint = state
        .generator()
        .generate_hint(&content, round)
        .await
        .ok_or(ServiceError::GenerationFailed)?;

    Ok(HintView { hint })
}

/// Drop the running session and its timer.
pub async fn reset(state: &SharedState) {
    state.session().write().await.take();
    state.replace_timer(None).await;
    debug!("session reset");
}

/// Final results of the running (or just finished) session.
pub async fn results(state: &SharedState) -> Result<ResultsSummary, ServiceError> {
    let guard = state.session().read().await;
    let session = guard
        .as_ref()
        .ok_or_else(|| ServiceError::NotFound("no active session".into()))?;

    let results = session.results();
    Ok(ResultsSummary {
        score: results.score,
        total_questions: results.total_questions,
        accuracy: results.accuracy,
    })
}

/// Arm the per-question countdown for the question identified by `epoch`.
fn arm_question_timer<'a>(
    state: &'a SharedState,
    epoch: u64,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    // Boxed (not `async fn`) to break the async type cycle between the
    // timer fns, which would otherwise make the spawned futures un-nameable.
    Box::pin(async move {
        let duration = Duration::from_secs(state.config().rules.question_seconds);
        let task_state = state.clone();
        let handle = tokio::spawn(async move {
            sleep(duration).await;
            resolve_timeout(&task_state, epoch).await;
        });
        state.replace_timer(Some(handle)).await;
    })
}

/// Arm the reveal pause that auto-advances past the resolved question.
async fn arm_advance_timer(state: &SharedState, epoch: u64) {
    let duration = Duration::from_secs(state.config().rules.reveal_pause_seconds);
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        sleep(duration).await;
        let _ = advance_session(&task_state, Some(epoch)).await;
    });
    state.replace_timer(Some(handle)).await;
}

/// Treat an expired countdown as an incorrect answer, exactly once.
async fn resolve_timeout(state: &SharedState, epoch: u64) {
    let resolution = {
        let mut guard = state.session().write().await;
        let Some(session) = guard.as_mut() else {
            return;
        };
        // Stale firing: the question it was armed for is gone.
        if session.epoch != epoch || session.phase != SessionPhase::AwaitingAnswer {
            return;
        }
        match session.timeout() {
            Ok(resolution) => resolution,
            Err(_) => return,
        }
    };

    debug!(epoch, "question timed out");
    arm_advance_timer(state, resolution.epoch).await;
}

/// Advance the session; with `expected_epoch` set, only if the question it
/// was scheduled for is still current.
async fn advance_session(
    state: &SharedState,
    expected_epoch: Option<u64>,
) -> Result<(), ServiceError> {
    let progress = {
        let mut guard = state.session().write().await;
        let session = guard
            .as_mut()
            .ok_or_else(|| ServiceError::NotFound("no active session".into()))?;
        if let Some(expected) = expected_epoch {
            if session.epoch != expected {
                return Ok(());
            }
        }
        session.advance()?
    };

    match progress {
        Progress::NextQuestion { epoch } => arm_question_timer(state, epoch).await,
        Progress::Finished => state.replace_timer(None).await,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{AppConfig, Credentials},
        dto::session::SessionPhaseDto,
        quiz::{Level, Question, QuestionMap},
        state::AppState,
    };
    use tokio::task::yield_now;

    fn full_map() -> QuestionMap {
        let mut map = QuestionMap::default();
        for level in Level::ALL {
            for slot in 0..3 {
                map.level_mut(level).push(Question {
                    id: format!("{level}-{slot}"),
                    question: "q".into(),
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    answer: "B".into(),
                    difficulty: level.difficulty(),
                });
            }
        }
        map
    }

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default(), Credentials::default())
    }

    async fn settle() {
        for _ in 0..10 {
            yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_expiry_times_out_once_and_auto_advances() {
        let state = test_state();
        let view = start(
            &state,
            StartSessionRequest {
                question_map: full_map(),
                content: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(view.phase, SessionPhaseDto::AwaitingAnswer);
        assert_eq!(view.timer_remaining, 20);

        // Past the 20s countdown: the slot resolves as incorrect.
        sleep(Duration::from_secs(21)).await;
        settle().await;
        let view = self::view(&state).await.unwrap();
        assert_eq!(view.phase, SessionPhaseDto::Revealing);
        assert_eq!(view.revealed_answer.as_deref(), Some("B"));
        assert_eq!(view.score, 0);

        // Past the 2s reveal pause: the next question is presented, once.
        sleep(Duration::from_secs(3)).await;
        settle().await;
        let view = self::view(&state).await.unwrap();
        assert_eq!(view.phase, SessionPhaseDto::AwaitingAnswer);
        assert_eq!((view.level, view.index), (0, 1));
        assert_eq!(view.score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn answering_cancels_the_countdown_and_scores() {
        let state = test_state();
        start(
            &state,
            StartSessionRequest {
                question_map: full_map(),
                content: None,
            },
        )
        .await
        .unwrap();

        let outcome = submit_answer(
            &state,
            AnswerRequest {
                option: "B".into(),
            },
        )
        .await
        .unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.score, 10);

        // Well past the original countdown: the timeout must not fire for
        // the resolved slot, and the pause advanced exactly one step.
        sleep(Duration::from_secs(30)).await;
        settle().await;
        let view = view(&state).await.unwrap();
        assert_eq!((view.level, view.index), (0, 1));
        assert_eq!(view.score, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn forced_advance_cancels_the_reveal_pause() {
        let state = test_state();
        start(
            &state,
            StartSessionRequest {
                question_map: full_map(),
                content: None,
            },
        )
        .await
        .unwrap();

        submit_answer(
            &state,
            AnswerRequest {
                option: "A".into(),
            },
        )
        .await
        .unwrap();
        let view = force_advance(&state).await.unwrap();
        assert_eq!((view.level, view.index), (0, 1));

        // The superseded pause task must not advance a second time.
        sleep(Duration::from_secs(5)).await;
        settle().await;
        let view = self::view(&state).await.unwrap();
        assert_eq!((view.level, view.index), (0, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_discards_session_and_timers() {
        let state = test_state();
        start(
            &state,
            StartSessionRequest {
                question_map: full_map(),
                content: None,
            },
        )
        .await
        .unwrap();

        reset(&state).await;
        assert!(matches!(
            view(&state).await,
            Err(ServiceError::NotFound(_))
        ));

        // A late countdown firing against the dropped session is harmless.
        sleep(Duration::from_secs(30)).await;
        settle().await;
        assert!(view(&state).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn legend_guess_awards_the_bonus_alongside_the_classic_flow() {
        use crate::dto::content::{ContentItem, MediaType, Source};

        let content = ContentItem {
            id: "603".into(),
            title: "The Matrix".into(),
            media_type: MediaType::Movie,
            poster: String::new(),
            year: None,
            genre: None,
            overview: None,
            source: Source::Tmdb,
            artist: None,
            album: None,
            preview_url: None,
            duration_secs: None,
            followers: None,
        };

        let state = test_state();
        start(
            &state,
            StartSessionRequest {
                question_map: full_map(),
                content: Some(content),
            },
        )
        .await
        .unwrap();

        let empty = submit_guess(
            &state,
            GuessRequest {
                guess: "   ".into(),
            },
        )
        .await;
        assert!(matches!(empty, Err(ServiceError::InvalidInput(_))));

        let outcome = submit_guess(
            &state,
            GuessRequest {
                guess: "matrix".into(),
            },
        )
        .await
        .unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.score, 20);

        // The question on screen is still answerable for its own points.
        let answer = submit_answer(
            &state,
            AnswerRequest {
                option: "B".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(answer.score, 30);
    }

    #[tokio::test(start_paused = true)]
    async fn hint_without_content_is_rejected() {
        let state = test_state();
        start(
            &state,
            StartSessionRequest {
                question_map: full_map(),
                content: None,
            },
        )
        .await
        .unwrap();

        assert!(matches!(
            hint(&state).await,
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn playing_through_all_questions_finishes_the_round() {
        let state = test_state();
        start(
            &state,
            StartSessionRequest {
                question_map: full_map(),
                content: None,
            },
        )
        .await
        .unwrap();

        for _ in 0..9 {
            submit_answer(
                &state,
                AnswerRequest {
                    option: "B".into(),
                },
            )
            .await
            .unwrap();
            force_advance(&state).await.unwrap();
        }

        let view = view(&state).await.unwrap();
        assert_eq!(view.phase, SessionPhaseDto::Finished);

        let summary = results(&state).await.unwrap();
        assert_eq!(summary.score, 90);
        assert_eq!(summary.total_questions, 9);
        assert_eq!(summary.accuracy, 100);
    }
}
