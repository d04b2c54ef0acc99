//! Coercion of raw AI payloads into the strict three-tier question structure.

use time::OffsetDateTime;
use tracing::warn;

use crate::quiz::{
    Level, Question, QuestionMap,
    fallback::fallback_question_map,
    payload::{RawQuestion, RawQuizPayload},
};

/// Maximum number of questions kept per tier.
const QUESTIONS_PER_LEVEL: usize = 3;
/// Prefix stripped from question text when the AI leaks the legend-mode tag.
const LEGEND_PREFIX: &str = "legend mode:";
/// Replacement text for questions that end up empty after sanitation.
const MISSING_QUESTION_TEXT: &str = "Question missing";

/// Normalize a raw payload into a complete question map.
///
/// This never fails: payloads whose structure cannot be salvaged resolve to
/// the deterministic fallback bank built around `fallback_subject`, so the
/// caller always receives a playable quiz.
pub fn normalize_levels(payload: &RawQuizPayload, fallback_subject: &str) -> QuestionMap {
    match payload {
        RawQuizPayload::Direct {
            beginner,
            intermediate,
            master,
        } => QuestionMap {
            beginner: normalize_array(beginner, Level::Beginner),
            intermediate: normalize_array(intermediate, Level::Intermediate),
            master: normalize_array(master, Level::Master),
        },
        RawQuizPayload::Tiered(levels) if !levels.is_empty() => {
            let mut map = QuestionMap::default();
            for entry in levels {
                if let Some(level) = Level::parse(&entry.id) {
                    *map.level_mut(level) = normalize_array(&entry.questions, level);
                }
            }

            // The tiered shape is only trusted when every tier got filled.
            if map.is_complete() {
                map
            } else {
                warn!(subject = %fallback_subject, "tiered payload left empty levels; using fallback");
                fallback_question_map(fallback_subject)
            }
        }
        _ => {
            warn!(subject = %fallback_subject, "unusable quiz payload; using fallback");
            fallback_question_map(fallback_subject)
        }
    }
}

/// Normalize one tier's raw questions, capped at [`QUESTIONS_PER_LEVEL`].
fn normalize_array(raw: &[RawQuestion], level: Level) -> Vec<Question> {
    raw.iter()
        .take(QUESTIONS_PER_LEVEL)
        .enumerate()
        .map(|(index, question)| normalize_question(question, level, index))
        .collect()
}

fn normalize_question(raw: &RawQuestion, level: Level, index: usize) -> Question {
    let answer = resolve_answer(raw);

    let mut options = if raw.options.is_empty() {
        default_options()
    } else {
        raw.options.clone()
    };

    // Invariant repair: the answer must be selectable, so claim the first
    // option slot instead of discarding the question.
    if !options.contains(&answer) {
        warn!(answer = %answer, "answer missing from options; repairing first slot");
        options[0] = answer.clone();
    }

    let id = raw
        .id
        .clone()
        .unwrap_or_else(|| format!("{}-{}-{}", level.difficulty(), index, unix_millis()));

    Question {
        id,
        question: sanitize_text(raw.question.as_deref()),
        options,
        answer,
        difficulty: level.difficulty(),
    }
}

/// Resolve the intended answer following the original priority order:
/// numeric `correct` index, then textual `answer`, then the first option,
/// then the literal `"A"`.
fn resolve_answer(raw: &RawQuestion) -> String {
    if let Some(index) = raw.correct {
        if let Some(option) = raw.options.get(index) {
            return option.clone();
        }
    }

    if let Some(answer) = raw.answer.as_deref() {
        let trimmed = answer.trim();
        if !trimmed.is_empty() {
            return trimmed.to_owned();
        }
    }

    raw.options
        .first()
        .cloned()
        .unwrap_or_else(|| "A".to_owned())
}

fn sanitize_text(text: Option<&str>) -> String {
    let trimmed = text.unwrap_or_default().trim();
    let stripped = strip_legend_prefix(trimmed).trim();

    if stripped.is_empty() {
        MISSING_QUESTION_TEXT.to_owned()
    } else {
        stripped.to_owned()
    }
}

/// Remove a leading case-insensitive `LEGEND MODE:` tag, if present.
fn strip_legend_prefix(text: &str) -> &str {
    match text.get(..LEGEND_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(LEGEND_PREFIX) => &text[LEGEND_PREFIX.len()..],
        _ => text,
    }
}

fn default_options() -> Vec<String> {
    ["A", "B", "C", "D"]
        .iter()
        .map(|option| (*option).to_owned())
        .collect()
}

fn unix_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{Difficulty, payload::parse_payload};
    use serde_json::json;

    fn direct_payload() -> RawQuizPayload {
        let value = json!({
            "beginner": [
                {"question": "Who directed it?", "options": ["A", "B", "C", "D"], "correct": 2},
                {"question": "Release year?", "options": ["1999", "2001"], "answer": "2001"},
                {"question": "Lead actor?", "options": ["X", "Y", "Z", "W"], "correct": 0},
            ],
            "intermediate": [
                {"question": "Composer?", "options": ["P", "Q", "R", "S"], "answer": "R"},
            ],
            "master": [
                {"question": "Hidden cameo?", "options": ["M", "N", "O", "L"], "correct": 3},
            ],
        });
        parse_payload(&value).expect("payload should be recognized")
    }

    #[test]
    fn direct_payload_keeps_per_level_shape_and_invariant() {
        let map = normalize_levels(&direct_payload(), "subject");

        assert_eq!(map.beginner.len(), 3);
        assert_eq!(map.intermediate.len(), 1);
        assert_eq!(map.master.len(), 1);

        for level in Level::ALL {
            for question in map.level(level) {
                assert!(
                    question.options.contains(&question.answer),
                    "answer {:?} missing from {:?}",
                    question.answer,
                    question.options
                );
                assert_eq!(question.difficulty, level.difficulty());
            }
        }
    }

    #[test]
    fn numeric_correct_index_resolves_to_option_text() {
        let map = normalize_levels(&direct_payload(), "subject");
        assert_eq!(map.beginner[0].answer, "C");
        assert_eq!(map.master[0].answer, "L");
    }

    #[test]
    fn answer_outside_options_claims_first_slot() {
        let value = json!({
            "beginner": [{"question": "Q", "options": ["A", "B", "D", "E"], "answer": "C"}],
            "intermediate": [{"question": "Q", "options": ["A", "B", "C", "D"], "correct": 0}],
            "master": [{"question": "Q", "options": ["A", "B", "C", "D"], "correct": 0}],
        });
        let payload = parse_payload(&value).unwrap();

        let map = normalize_levels(&payload, "subject");
        assert_eq!(map.beginner[0].answer, "C");
        assert_eq!(map.beginner[0].options[0], "C");
    }

    #[test]
    fn levels_are_capped_at_three_questions() {
        let question = json!({"question": "Q", "options": ["A", "B", "C", "D"], "correct": 1});
        let value = json!({
            "beginner": [question, question, question, question, question],
            "intermediate": [question],
            "master": [question],
        });
        let payload = parse_payload(&value).unwrap();

        let map = normalize_levels(&payload, "subject");
        assert_eq!(map.beginner.len(), 3);
    }

    #[test]
    fn unrecognizable_payload_falls_back_to_the_fixed_bank() {
        let map = normalize_levels(&RawQuizPayload::Partial, "Blade Runner");

        assert_eq!(map.total_questions(), 9);
        assert_eq!(map.beginner[0].id, "fallback-1");
        assert_eq!(map.master[2].id, "fallback-9");
        assert!(map.beginner[0].question.contains("Blade Runner"));
    }

    #[test]
    fn tiered_payload_with_empty_level_falls_back() {
        let value = json!({
            "levels": [
                {"id": "beginner", "questions": [{"question": "Q", "options": ["A", "B"], "correct": 0}]},
                {"id": "intermediate", "questions": []},
                {"id": "master", "questions": [{"question": "Q", "options": ["A", "B"], "correct": 0}]},
            ]
        });
        let payload = parse_payload(&value).unwrap();

        let map = normalize_levels(&payload, "subject");
        assert_eq!(map.beginner[0].id, "fallback-1");
    }

    #[test]
    fn tiered_payload_with_all_levels_is_used_directly() {
        let question = json!({"question": "Q", "options": ["A", "B", "C", "D"], "correct": 1});
        let value = json!({
            "levels": [
                {"id": "Beginner", "questions": [question]},
                {"id": "INTERMEDIATE", "questions": [question]},
                {"id": "master", "questions": [question]},
            ]
        });
        let payload = parse_payload(&value).unwrap();

        let map = normalize_levels(&payload, "subject");
        assert!(map.is_complete());
        assert_eq!(map.intermediate[0].answer, "B");
        assert_eq!(map.intermediate[0].difficulty, Difficulty::Medium);
    }

    #[test]
    fn normalization_is_idempotent_for_already_normalized_payloads() {
        let first = normalize_levels(&direct_payload(), "subject");

        // Re-encode the normalized map as a direct payload and run it through
        // again; ids must survive untouched and nothing may be re-escaped.
        let value = serde_json::to_value(&first).unwrap();
        let payload = parse_payload(&value).unwrap();
        let second = normalize_levels(&payload, "subject");

        assert_eq!(first, second);
    }

    #[test]
    fn text_sanitation_trims_strips_legend_tag_and_fills_blanks() {
        let value = json!({
            "beginner": [
                {"question": "  LEGEND MODE:  Guess the composer  ", "options": ["A", "B"], "correct": 0},
                {"question": "   ", "options": ["A", "B"], "correct": 0},
                {"options": ["A", "B"], "correct": 0},
            ],
            "intermediate": [{"question": "Q", "options": ["A", "B"], "correct": 0}],
            "master": [{"question": "Q", "options": ["A", "B"], "correct": 0}],
        });
        let payload = parse_payload(&value).unwrap();

        let map = normalize_levels(&payload, "subject");
        assert_eq!(map.beginner[0].question, "Guess the composer");
        assert_eq!(map.beginner[1].question, MISSING_QUESTION_TEXT);
        assert_eq!(map.beginner[2].question, MISSING_QUESTION_TEXT);
    }

    #[test]
    fn question_without_options_gets_defaults_and_answer_a() {
        let value = json!({
            "beginner": [{"question": "Q"}],
            "intermediate": [{"question": "Q", "options": ["A", "B"], "correct": 0}],
            "master": [{"question": "Q", "options": ["A", "B"], "correct": 0}],
        });
        let payload = parse_payload(&value).unwrap();

        let map = normalize_levels(&payload, "subject");
        assert_eq!(map.beginner[0].options, vec!["A", "B", "C", "D"]);
        assert_eq!(map.beginner[0].answer, "A");
    }

    #[test]
    fn synthesized_ids_carry_difficulty_and_index() {
        let value = json!({
            "beginner": [{"question": "Q", "options": ["A", "B"], "correct": 0}],
            "intermediate": [{"question": "Q", "options": ["A", "B"], "correct": 0}],
            "master": [{"question": "Q", "options": ["A", "B"], "correct": 0}],
        });
        let payload = parse_payload(&value).unwrap();

        let map = normalize_levels(&payload, "subject");
        assert!(map.beginner[0].id.starts_with("easy-0-"));
        assert!(map.master[0].id.starts_with("hard-0-"));
    }
}
