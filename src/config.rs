//! Application-level configuration loading: gameplay tunables and API credentials.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::quiz::legend::MatchStrictness;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PIXEL_QUIZ_CONFIG_PATH";

/// Gameplay constants applied to every quiz round.
#[derive(Debug, Clone, Copy)]
pub struct GameplayRules {
    /// Countdown allowed per question, in seconds.
    pub question_seconds: u64,
    /// Pause after a question resolves before auto-advancing, in seconds.
    pub reveal_pause_seconds: u64,
    /// Points awarded for a correct classic answer.
    pub points_per_correct: u32,
    /// Points awarded for a correct legend-mode guess.
    pub legend_points: u32,
    /// Strictness applied when matching legend-mode guesses.
    pub legend_match: MatchStrictness,
}

impl Default for GameplayRules {
    fn default() -> Self {
        Self {
            question_seconds: 20,
            reveal_pause_seconds: 2,
            points_per_correct: 10,
            legend_points: 20,
            legend_match: MatchStrictness::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Gameplay constants for quiz rounds.
    pub rules: GameplayRules,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(path = %path.display(), "loaded gameplay config");
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    question_seconds: Option<u64>,
    reveal_pause_seconds: Option<u64>,
    points_per_correct: Option<u32>,
    legend_points: Option<u32>,
    legend_exact_match: Option<bool>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = GameplayRules::default();
        let legend_match = match value.legend_exact_match {
            Some(true) => MatchStrictness::Exact,
            _ => MatchStrictness::default(),
        };

        Self {
            rules: GameplayRules {
                question_seconds: value.question_seconds.unwrap_or(defaults.question_seconds),
                reveal_pause_seconds: value
                    .reveal_pause_seconds
                    .unwrap_or(defaults.reveal_pause_seconds),
                points_per_correct: value
                    .points_per_correct
                    .unwrap_or(defaults.points_per_correct),
                legend_points: value.legend_points.unwrap_or(defaults.legend_points),
                legend_match,
            },
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Third-party API credentials read once at startup.
///
/// Every field is optional: a missing credential degrades the matching
/// provider to empty results (or a null generation) instead of failing boot.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// TMDB v3 API key.
    pub tmdb_api_key: Option<String>,
    /// RAWG API key.
    pub rawg_api_key: Option<String>,
    /// Spotify client id for the client-credentials grant.
    pub spotify_client_id: Option<String>,
    /// Spotify client secret for the client-credentials grant.
    pub spotify_client_secret: Option<String>,
    /// OpenRouter API key used for quiz generation.
    pub openrouter_api_key: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self {
            tmdb_api_key: non_empty_env("TMDB_API_KEY"),
            rawg_api_key: non_empty_env("RAWG_API_KEY"),
            spotify_client_id: non_empty_env("SPOTIFY_CLIENT_ID"),
            spotify_client_secret: non_empty_env("SPOTIFY_CLIENT_SECRET"),
            openrouter_api_key: non_empty_env("OPENROUTER_API_KEY"),
        }
    }
}

/// Read an environment variable, treating empty values as absent.
fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
