//! Lenient parsing of the raw AI response into a tagged payload.
//!
//! The generator can answer in two structurally different shapes (direct
//! per-tier arrays, or a `levels` array with tagged entries). The shape is
//! resolved exactly once here; the normalizer only ever branches on the
//! resulting enum.

use serde_json::Value;

/// A single question as the AI produced it. Untrusted and possibly partial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuestion {
    /// AI-provided identifier, if any.
    pub id: Option<String>,
    /// Question text, if any.
    pub question: Option<String>,
    /// Answer options; possibly empty.
    pub options: Vec<String>,
    /// Answer given as text.
    pub answer: Option<String>,
    /// Answer given as an index into `options`.
    pub correct: Option<usize>,
}

/// One entry of the `levels` array in the tiered shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLevel {
    /// Tier name as provided (matched case-insensitively later).
    pub id: String,
    /// Questions attached to this tier.
    pub questions: Vec<RawQuestion>,
}

/// Raw quiz payload with its shape resolved at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RawQuizPayload {
    /// All three tier keys are present as arrays.
    Direct {
        /// Beginner tier questions as provided.
        beginner: Vec<RawQuestion>,
        /// Intermediate tier questions as provided.
        intermediate: Vec<RawQuestion>,
        /// Master tier questions as provided.
        master: Vec<RawQuestion>,
    },
    /// A `levels` array is present.
    Tiered(Vec<RawLevel>),
    /// At least one tier key is an array, but not all three. Recognized as a
    /// quiz attempt, yet never usable: normalization falls back.
    Partial,
}

/// Resolve the payload shape from a parsed JSON value.
///
/// Returns `None` for structures that are not recognizable as a quiz at all,
/// which the generation adapter reports as a failed generation.
pub fn parse_payload(value: &Value) -> Option<RawQuizPayload> {
    let beginner = value.get("beginner").and_then(Value::as_array);
    let intermediate = value.get("intermediate").and_then(Value::as_array);
    let master = value.get("master").and_then(Value::as_array);

    if let (Some(beginner), Some(intermediate), Some(master)) = (beginner, intermediate, master) {
        return Some(RawQuizPayload::Direct {
            beginner: parse_questions(beginner),
            intermediate: parse_questions(intermediate),
            master: parse_questions(master),
        });
    }

    if let Some(levels) = value.get("levels").and_then(Value::as_array) {
        let levels = levels
            .iter()
            .filter_map(|entry| {
                let id = entry.get("id")?.as_str()?.to_owned();
                let questions = entry
                    .get("questions")
                    .and_then(Value::as_array)
                    .map(|questions| parse_questions(questions))
                    .unwrap_or_default();
                Some(RawLevel { id, questions })
            })
            .collect();
        return Some(RawQuizPayload::Tiered(levels));
    }

    if [beginner, intermediate, master].iter().any(Option::is_some) {
        return Some(RawQuizPayload::Partial);
    }

    None
}

fn parse_questions(entries: &[Value]) -> Vec<RawQuestion> {
    entries.iter().map(parse_question).collect()
}

fn parse_question(entry: &Value) -> RawQuestion {
    RawQuestion {
        id: string_field(entry, "id"),
        question: string_field(entry, "question"),
        options: entry
            .get("options")
            .and_then(Value::as_array)
            .map(|options| options.iter().map(scalar_to_string).collect())
            .unwrap_or_default(),
        answer: string_field(entry, "answer"),
        correct: entry
            .get("correct")
            .and_then(Value::as_u64)
            .map(|index| index as usize),
    }
}

fn string_field(entry: &Value, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Coerce option entries into text: strings verbatim, other scalars rendered.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direct_shape_is_resolved_with_all_three_tiers() {
        let value = json!({
            "beginner": [{"question": "Q1", "options": ["A", "B"], "correct": 1}],
            "intermediate": [],
            "master": [{"question": "Q2", "answer": "B"}],
        });

        match parse_payload(&value) {
            Some(RawQuizPayload::Direct {
                beginner,
                intermediate,
                master,
            }) => {
                assert_eq!(beginner.len(), 1);
                assert_eq!(beginner[0].correct, Some(1));
                assert!(intermediate.is_empty());
                assert_eq!(master[0].answer.as_deref(), Some("B"));
            }
            other => panic!("expected direct payload, got {other:?}"),
        }
    }

    #[test]
    fn tiered_shape_keeps_level_ids() {
        let value = json!({
            "levels": [
                {"id": "Beginner", "questions": [{"question": "Q"}]},
                {"id": "master", "questions": []},
            ]
        });

        match parse_payload(&value) {
            Some(RawQuizPayload::Tiered(levels)) => {
                assert_eq!(levels.len(), 2);
                assert_eq!(levels[0].id, "Beginner");
                assert_eq!(levels[0].questions.len(), 1);
            }
            other => panic!("expected tiered payload, got {other:?}"),
        }
    }

    #[test]
    fn missing_tier_key_downgrades_to_partial() {
        let value = json!({"beginner": [{"question": "Q"}]});
        assert_eq!(parse_payload(&value), Some(RawQuizPayload::Partial));
    }

    #[test]
    fn unrelated_structure_is_rejected() {
        assert_eq!(parse_payload(&json!({"foo": "bar"})), None);
        assert_eq!(parse_payload(&json!({})), None);
        assert_eq!(parse_payload(&json!([1, 2, 3])), None);
    }

    #[test]
    fn numeric_options_are_rendered_as_text() {
        let value = json!({
            "beginner": [{"question": "Q", "options": [1, 2, "three"]}],
            "intermediate": [],
            "master": [],
        });

        let Some(RawQuizPayload::Direct { beginner, .. }) = parse_payload(&value) else {
            panic!("expected direct payload");
        };
        assert_eq!(beginner[0].options, vec!["1", "2", "three"]);
    }
}
