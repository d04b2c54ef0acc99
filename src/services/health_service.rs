//! Liveness report over the configured collaborators.

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report which providers hold credentials and whether generation is enabled.
pub fn health(state: &SharedState) -> HealthResponse {
    let providers = state
        .providers()
        .iter()
        .filter(|provider| provider.is_configured())
        .map(|provider| provider.source().to_string())
        .collect();

    HealthResponse::new(providers, state.generator().is_configured())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{AppConfig, Credentials},
        state::AppState,
    };

    #[test]
    fn bare_state_reports_degraded() {
        let state = AppState::new(AppConfig::default(), Credentials::default());
        let report = health(&state);
        assert_eq!(report.status, "degraded");
        assert!(report.providers.is_empty());
        assert!(!report.generator);
    }

    #[test]
    fn configured_providers_are_listed_in_merge_order() {
        let credentials = Credentials {
            tmdb_api_key: Some("k".into()),
            spotify_client_id: Some("id".into()),
            spotify_client_secret: Some("secret".into()),
            openrouter_api_key: Some("or".into()),
            ..Credentials::default()
        };
        let state = AppState::new(AppConfig::default(), credentials);

        let report = health(&state);
        assert_eq!(report.status, "ok");
        assert_eq!(report.providers, vec!["tmdb", "spotify"]);
        assert!(report.generator);
    }
}
