//! Gameplay session state machine driving one quiz round.
//!
//! The session only moves in response to discrete events (answer, timeout,
//! advance); timers live in the service layer and feed events in. An epoch
//! counter increments every time a question is presented so stale timer
//! firings can be recognized and ignored.

use std::time::Instant;

use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::GameplayRules,
    dto::content::ContentItem,
    quiz::{
        Level, Question, QuestionMap,
        legend::{LegendVerdict, check_guess},
    },
};

/// Phase of a running quiz round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// A question is presented and the countdown is running.
    AwaitingAnswer,
    /// The question resolved; the correct option is on display.
    Revealing {
        /// The correct option being revealed.
        correct_answer: String,
    },
    /// Every question has been resolved.
    Finished,
}

/// Error returned when an event cannot be applied to the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStateError {
    /// A round cannot start with an empty level.
    #[error("level {0} has no questions")]
    EmptyLevel(&'static str),
    /// An answer/timeout arrived while no question was awaiting one.
    #[error("no question is awaiting an answer")]
    NotAwaitingAnswer,
    /// The round is already finished.
    #[error("the round is already finished")]
    Finished,
    /// A legend guess arrived but the session carries no content item.
    #[error("the session has no content attached")]
    NoContent,
    /// The title was already guessed this round.
    #[error("the title was already guessed")]
    LegendSolved,
}

/// Resolution of one question slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Whether the submitted option matched the answer.
    pub correct: bool,
    /// The correct option, revealed regardless of outcome.
    pub correct_answer: String,
    /// Score after applying this resolution.
    pub score: u32,
    /// Epoch of the question that was resolved.
    pub epoch: u64,
}

/// Outcome of a legend-mode title guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessOutcome {
    /// How the guess matched.
    pub verdict: LegendVerdict,
    /// Score after applying the guess.
    pub score: u32,
}

/// Where the session landed after an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A new question was presented; its epoch is attached.
    NextQuestion {
        /// Epoch of the freshly presented question.
        epoch: u64,
    },
    /// The round is over.
    Finished,
}

/// Final round results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResults {
    /// Final score.
    pub score: u32,
    /// Number of question slots actually played.
    pub total_questions: usize,
    /// Rounded percentage of the maximum achievable score.
    pub accuracy: u32,
}

/// State for one quiz round.
#[derive(Debug, Clone)]
pub struct GameplaySession {
    /// Session identifier.
    pub id: Uuid,
    /// Content the round is about, when the client provided it.
    pub content: Option<ContentItem>,
    /// Current tier index (0..=2).
    pub level: usize,
    /// Current question index within the tier (0..=2).
    pub index: usize,
    /// Running score.
    pub score: u32,
    /// Current phase.
    pub phase: SessionPhase,
    /// Increments each time a question is presented.
    pub epoch: u64,
    question_map: QuestionMap,
    rules: GameplayRules,
    presented_at: Instant,
    legend_solved: bool,
}

impl GameplaySession {
    /// Start a round, presenting the first playable question.
    ///
    /// Fails when any level is empty; a normalized quiz always has all three
    /// levels filled, so an empty one means the caller skipped normalization.
    pub fn start(
        question_map: QuestionMap,
        content: Option<ContentItem>,
        rules: GameplayRules,
    ) -> Result<Self, SessionStateError> {
        for level in Level::ALL {
            if question_map.level(level).is_empty() {
                return Err(SessionStateError::EmptyLevel(level.as_str()));
            }
        }

        let mut session = Self {
            id: Uuid::new_v4(),
            content,
            level: 0,
            index: 0,
            score: 0,
            phase: SessionPhase::AwaitingAnswer,
            epoch: 0,
            question_map,
            rules,
            presented_at: Instant::now(),
            legend_solved: false,
        };
        session.present();
        Ok(session)
    }

    /// The question currently on display, if any.
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == SessionPhase::Finished {
            return None;
        }
        self.level_questions()?.get(self.index)
    }

    /// The revealed correct option, once the current question resolved.
    pub fn revealed_answer(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Revealing { correct_answer } => Some(correct_answer),
            _ => None,
        }
    }

    /// Seconds left on the countdown; zero outside the answering phase.
    pub fn remaining_seconds(&self) -> u64 {
        if self.phase != SessionPhase::AwaitingAnswer {
            return 0;
        }
        let elapsed = self.presented_at.elapsed().as_secs();
        self.rules.question_seconds.saturating_sub(elapsed)
    }

    /// Resolve the current question with the player's pick.
    ///
    /// Exact string equality against the stored answer; a match awards the
    /// configured points. The correct option is revealed either way.
    pub fn answer(&mut self, selected: &str) -> Result<Resolution, SessionStateError> {
        let question = self.awaiting_question()?;
        let correct_answer = question.answer.clone();
        let correct = selected == correct_answer;

        if correct {
            self.score += self.rules.points_per_correct;
        }

        self.phase = SessionPhase::Revealing {
            correct_answer: correct_answer.clone(),
        };

        Ok(Resolution {
            correct,
            correct_answer,
            score: self.score,
            epoch: self.epoch,
        })
    }

    /// Resolve the current question as expired: no score change, same reveal.
    pub fn timeout(&mut self) -> Result<Resolution, SessionStateError> {
        let question = self.awaiting_question()?;
        let correct_answer = question.answer.clone();

        self.phase = SessionPhase::Revealing {
            correct_answer: correct_answer.clone(),
        };

        Ok(Resolution {
            correct: false,
            correct_answer,
            score: self.score,
            epoch: self.epoch,
        })
    }

    /// Check a legend-mode title guess against the attached content.
    ///
    /// A match scores the configured legend bonus, once per round. Guessing
    /// does not resolve the question on screen; it runs alongside it.
    pub fn guess(&mut self, guess: &str) -> Result<GuessOutcome, SessionStateError> {
        if self.phase == SessionPhase::Finished {
            return Err(SessionStateError::Finished);
        }
        if self.legend_solved {
            return Err(SessionStateError::LegendSolved);
        }
        let title = self
            .content
            .as_ref()
            .map(|content| content.title.as_str())
            .ok_or(SessionStateError::NoContent)?;

        let verdict = check_guess(guess, title, self.rules.legend_match);
        if verdict == LegendVerdict::Correct {
            self.legend_solved = true;
            self.score += self.rules.legend_points;
        }

        Ok(GuessOutcome {
            verdict,
            score: self.score,
        })
    }

    /// Zero-based slot counter across the whole round, used to rotate legend
    /// hint styles.
    pub fn slot_number(&self) -> usize {
        Level::ALL
            .iter()
            .take(self.level)
            .map(|level| self.question_map.level(*level).len())
            .sum::<usize>()
            + self.index
    }

    /// Move to the next question slot, rolling over levels as needed.
    pub fn advance(&mut self) -> Result<Progress, SessionStateError> {
        if self.phase == SessionPhase::Finished {
            return Err(SessionStateError::Finished);
        }

        self.index += 1;
        if self
            .level_questions()
            .is_none_or(|questions| self.index >= questions.len())
        {
            self.index = 0;
            self.level += 1;
        }

        Ok(self.present())
    }

    /// Final results; totals come from the actual level lengths, which may be
    /// shorter than three after normalization capping.
    pub fn results(&self) -> RoundResults {
        let total_questions = self.question_map.total_questions();
        let max_score = total_questions as u32 * self.rules.points_per_correct;
        let accuracy = if max_score == 0 {
            0
        } else {
            (f64::from(self.score) / f64::from(max_score) * 100.0).round() as u32
        };

        RoundResults {
            score: self.score,
            total_questions,
            accuracy,
        }
    }

    /// Present the slot at (`level`, `index`), skipping unplayable slots.
    ///
    /// A slot with no question or no options is skipped forward instead of
    /// faulting, in case an upstream normalization gap slipped through.
    fn present(&mut self) -> Progress {
        loop {
            let Some(questions) = self.level_questions() else {
                self.phase = SessionPhase::Finished;
                return Progress::Finished;
            };

            match questions.get(self.index) {
                Some(question) if !question.options.is_empty() => {
                    self.epoch += 1;
                    self.presented_at = Instant::now();
                    self.phase = SessionPhase::AwaitingAnswer;
                    return Progress::NextQuestion { epoch: self.epoch };
                }
                Some(_) => {
                    self.index += 1;
                }
                None => {
                    self.index = 0;
                    self.level += 1;
                }
            }
        }
    }

    fn awaiting_question(&self) -> Result<&Question, SessionStateError> {
        match self.phase {
            SessionPhase::AwaitingAnswer => {
                self.current_question().ok_or(SessionStateError::Finished)
            }
            SessionPhase::Finished => Err(SessionStateError::Finished),
            _ => Err(SessionStateError::NotAwaitingAnswer),
        }
    }

    fn level_questions(&self) -> Option<&[Question]> {
        Level::ALL
            .get(self.level)
            .map(|level| self.question_map.level(*level))
    }
}
