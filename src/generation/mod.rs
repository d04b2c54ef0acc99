//! Quiz generation through the OpenRouter chat-completions API.

pub mod single_flight;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::{
    dto::{content::ContentItem, quiz::QuizRequest},
    quiz::{
        legend::legend_prompt,
        payload::{RawQuizPayload, parse_payload},
    },
};

const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const MODEL: &str = "openai/gpt-4.1-mini";

const SYSTEM_PROMPT: &str = r#"
You are PIXEL — a strict quiz generator.

Return ONLY valid JSON:

{
  "beginner": [
    {
      "question": "",
      "options": ["", "", "", ""],
      "correct": 0
    }
  ],
  "intermediate": [same],
  "master": [same]
}

Rules:
- 3 questions ONLY per level
- Correct must be a NUMBER (0,1,2,3)
- Do NOT wrap in markdown
- Do NOT write explanations
"#;

/// Content metadata fed into the generation prompt.
#[derive(Debug, Clone)]
pub struct QuizSubject {
    /// Title of the content the quiz is about.
    pub title: String,
    /// Media type label.
    pub media_type: String,
    /// Release year.
    pub year: String,
    /// Genre list.
    pub genre: String,
    /// Synopsis.
    pub overview: String,
}

impl QuizSubject {
    /// Build a subject from a quiz request whose title has been validated.
    pub fn from_request(title: String, request: &QuizRequest) -> Self {
        Self {
            title,
            media_type: request.media_type.clone().unwrap_or_default(),
            year: request.year.clone().unwrap_or_default(),
            genre: request.genre.clone().unwrap_or_default(),
            overview: request.overview.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Adapter around the LLM completion endpoint.
///
/// Every failure mode (missing key, transport error, non-JSON answer,
/// unrecognized structure) resolves to `None`; the caller decides whether a
/// fallback is meaningful at its layer.
pub struct QuizGenerator {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl QuizGenerator {
    /// Build a generator; a `None` key disables generation.
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Request a quiz about `subject`, returning the raw payload or `None`.
    pub async fn generate(&self, subject: &QuizSubject) -> Option<RawQuizPayload> {
        let Some(api_key) = self.api_key.as_deref() else {
            error!("no OPENROUTER_API_KEY configured; cannot generate a quiz");
            return None;
        };

        debug!(title = %subject.title, "generating quiz");

        let body = json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt(subject)},
            ],
            "temperature": 0.7,
            "max_tokens": 2000,
        });

        let response = match self
            .client
            .post(OPENROUTER_ENDPOINT)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "quiz generation request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "quiz generation returned an error status");
            return None;
        }

        let completion: ChatCompletion = match response.json().await {
            Ok(completion) => completion,
            Err(err) => {
                warn!(error = %err, "failed to decode completion response");
                return None;
            }
        };

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)?;

        let Some(block) = extract_json_block(&content) else {
            warn!("completion contained no JSON braces");
            return None;
        };

        let value: serde_json::Value = match serde_json::from_str(block) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "completion JSON failed to parse");
                return None;
            }
        };

        match parse_payload(&value) {
            Some(payload) => Some(payload),
            None => {
                warn!("completion JSON has no recognizable quiz structure");
                None
            }
        }
    }

    /// Ask the model for one indirect legend-mode clue about `content`,
    /// rotating the clue style with `round`.
    pub async fn generate_hint(&self, content: &ContentItem, round: usize) -> Option<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            error!("no OPENROUTER_API_KEY configured; cannot generate a hint");
            return None;
        };

        debug!(title = %content.title, round, "generating legend hint");

        let body = json!({
            "model": MODEL,
            "messages": [
                {"role": "user", "content": legend_prompt(content, round)},
            ],
            "temperature": 0.9,
            "max_tokens": 120,
        });

        let response = match self
            .client
            .post(OPENROUTER_ENDPOINT)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "hint generation request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "hint generation returned an error status");
            return None;
        }

        let completion: ChatCompletion = match response.json().await {
            Ok(completion) => completion,
            Err(err) => {
                warn!(error = %err, "failed to decode hint response");
                return None;
            }
        };

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .filter(|hint| !hint.is_empty())
    }
}

fn user_prompt(subject: &QuizSubject) -> String {
    format!(
        "TITLE: {}\nMEDIA TYPE: {}\nYEAR: {}\nGENRES: {}\nOVERVIEW: {}\n\n\
         Create fun and creative quiz questions for real fans.\n\
         Avoid obvious stuff. No title in options.",
        subject.title, subject.media_type, subject.year, subject.genre, subject.overview,
    )
}

/// Slice out the outermost brace-delimited block of a completion, tolerating
/// prose or markdown fences around the JSON.
fn extract_json_block(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end >= start).then(|| &content[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_block_is_extracted_from_surrounding_prose() {
        let content = "Sure! Here is the quiz:\n```json\n{\"beginner\": []}\n```\nEnjoy!";
        assert_eq!(extract_json_block(content), Some("{\"beginner\": []}"));
    }

    #[test]
    fn content_without_braces_is_rejected() {
        assert_eq!(extract_json_block("no json here"), None);
        assert_eq!(extract_json_block("} inverted {"), None);
    }

    #[test]
    fn bare_json_passes_through() {
        let content = "{\"levels\": []}";
        assert_eq!(extract_json_block(content), Some(content));
    }

    #[test]
    fn prompt_embeds_all_metadata_fields() {
        let subject = QuizSubject {
            title: "Dune".into(),
            media_type: "movie".into(),
            year: "2021".into(),
            genre: "Sci-Fi".into(),
            overview: "Spice.".into(),
        };

        let prompt = user_prompt(&subject);
        assert!(prompt.contains("TITLE: Dune"));
        assert!(prompt.contains("YEAR: 2021"));
        assert!(prompt.contains("No title in options"));
    }
}
