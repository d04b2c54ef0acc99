//! Core quiz domain: raw AI payload parsing, normalization into the fixed
//! three-level question structure, the deterministic fallback bank, and the
//! optional legend guessing mode.

pub mod fallback;
pub mod legend;
pub mod normalizer;
pub mod payload;

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Difficulty tag attached to every normalized question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Beginner-level question.
    Easy,
    /// Intermediate-level question.
    Medium,
    /// Master-level question.
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

/// One of the three fixed quiz tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// First tier, tagged [`Difficulty::Easy`].
    Beginner,
    /// Second tier, tagged [`Difficulty::Medium`].
    Intermediate,
    /// Third tier, tagged [`Difficulty::Hard`].
    Master,
}

impl Level {
    /// All tiers in play order.
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Master];

    /// The difficulty tag applied to questions of this tier.
    pub fn difficulty(self) -> Difficulty {
        match self {
            Level::Beginner => Difficulty::Easy,
            Level::Intermediate => Difficulty::Medium,
            Level::Master => Difficulty::Hard,
        }
    }

    /// Wire name of the tier (`beginner` / `intermediate` / `master`).
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Master => "master",
        }
    }

    /// Parse a (case-insensitive) tier name.
    pub fn parse(name: &str) -> Option<Level> {
        match name.to_ascii_lowercase().as_str() {
            "beginner" => Some(Level::Beginner),
            "intermediate" => Some(Level::Intermediate),
            "master" => Some(Level::Master),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully normalized quiz question.
///
/// Instances only come out of the normalizer (or the fallback bank), which
/// guarantees `answer` is always one of `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    /// Stable identifier, either AI-provided or synthesized.
    pub id: String,
    /// Sanitized question text.
    pub question: String,
    /// Ordered answer options (nominally four).
    pub options: Vec<String>,
    /// The correct option; always an element of `options`.
    pub answer: String,
    /// Difficulty tag matching the tier the question belongs to.
    pub difficulty: Difficulty,
}

/// Questions grouped by tier, at most three per tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionMap {
    /// Beginner tier questions.
    pub beginner: Vec<Question>,
    /// Intermediate tier questions.
    pub intermediate: Vec<Question>,
    /// Master tier questions.
    pub master: Vec<Question>,
}

impl QuestionMap {
    /// Borrow the questions of one tier.
    pub fn level(&self, level: Level) -> &[Question] {
        match level {
            Level::Beginner => &self.beginner,
            Level::Intermediate => &self.intermediate,
            Level::Master => &self.master,
        }
    }

    /// Mutable access to the questions of one tier.
    pub fn level_mut(&mut self, level: Level) -> &mut Vec<Question> {
        match level {
            Level::Beginner => &mut self.beginner,
            Level::Intermediate => &mut self.intermediate,
            Level::Master => &mut self.master,
        }
    }

    /// True when every tier holds at least one question.
    pub fn is_complete(&self) -> bool {
        Level::ALL.iter().all(|level| !self.level(*level).is_empty())
    }

    /// Total number of questions across all tiers.
    pub fn total_questions(&self) -> usize {
        Level::ALL
            .iter()
            .map(|level| self.level(*level).len())
            .sum()
    }
}

/// Quiz payload handed to the client once normalization succeeds.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    /// Normalized questions grouped by tier.
    pub question_map: QuestionMap,
    /// Running score; starts at zero.
    pub score: u32,
}

impl QuizState {
    /// Wrap a normalized question map into a fresh quiz state.
    pub fn new(question_map: QuestionMap) -> Self {
        Self {
            question_map,
            score: 0,
        }
    }
}
