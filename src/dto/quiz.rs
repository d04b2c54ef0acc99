//! Request DTOs for the quiz generation endpoint.

use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /api/quiz`: the content item the quiz should be about.
///
/// Everything except the title is optional so loosely-shaped clients (and the
/// detail objects of any provider) are accepted as-is.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    /// Title of the selected content; the only required field.
    #[serde(default)]
    pub title: Option<String>,
    /// Media type label forwarded to the prompt.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Release year forwarded to the prompt.
    #[serde(default)]
    pub year: Option<String>,
    /// Genre list forwarded to the prompt.
    #[serde(default)]
    pub genre: Option<String>,
    /// Synopsis forwarded to the prompt.
    #[serde(default)]
    pub overview: Option<String>,
}
