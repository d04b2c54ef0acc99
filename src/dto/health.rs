use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Providers with usable credentials.
    pub providers: Vec<String>,
    /// Whether the quiz generator has credentials.
    pub generator: bool,
}

impl HealthResponse {
    /// Build a health response from the configured collaborator set.
    pub fn new(providers: Vec<String>, generator: bool) -> Self {
        let status = if generator { "ok" } else { "degraded" };
        Self {
            status: status.to_string(),
            providers,
            generator,
        }
    }
}
