//! Shared application state wiring providers, the generator, and the session.

pub mod session;

use std::sync::Arc;

use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};

use crate::{
    config::{AppConfig, Credentials},
    generation::{QuizGenerator, single_flight::SingleFlight},
    providers::{
        ContentProvider, rawg::RawgClient, spotify::SpotifyClient, tmdb::TmdbClient,
    },
    quiz::payload::RawQuizPayload,
    state::session::GameplaySession,
};

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing provider handles and the active session.
pub struct AppState {
    config: AppConfig,
    providers: Vec<Arc<dyn ContentProvider>>,
    generator: Arc<QuizGenerator>,
    generation_gate: Arc<SingleFlight<Option<RawQuizPayload>>>,
    session: RwLock<Option<GameplaySession>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl AppState {
    /// Construct the shared state from configuration and credentials.
    ///
    /// Provider order here is the order search results are merged in:
    /// TMDB first, then RAWG, then Spotify.
    pub fn new(config: AppConfig, credentials: Credentials) -> SharedState {
        let client = reqwest::Client::new();

        let providers: Vec<Arc<dyn ContentProvider>> = vec![
            Arc::new(TmdbClient::new(client.clone(), credentials.tmdb_api_key)),
            Arc::new(RawgClient::new(client.clone(), credentials.rawg_api_key)),
            Arc::new(SpotifyClient::new(
                client.clone(),
                credentials.spotify_client_id,
                credentials.spotify_client_secret,
            )),
        ];

        Arc::new(Self {
            config,
            providers,
            generator: Arc::new(QuizGenerator::new(client, credentials.openrouter_api_key)),
            generation_gate: Arc::new(SingleFlight::new()),
            session: RwLock::new(None),
            timer: Mutex::new(None),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Content providers in merge order.
    pub fn providers(&self) -> &[Arc<dyn ContentProvider>] {
        &self.providers
    }

    /// The quiz generation adapter.
    pub fn generator(&self) -> &Arc<QuizGenerator> {
        &self.generator
    }

    /// Single-flight gate guarding the generation call.
    pub fn generation_gate(&self) -> &Arc<SingleFlight<Option<RawQuizPayload>>> {
        &self.generation_gate
    }

    /// The currently running gameplay session, if any.
    pub fn session(&self) -> &RwLock<Option<GameplaySession>> {
        &self.session
    }

    /// Replace the pending timer task, aborting the one it supersedes.
    pub async fn replace_timer(&self, handle: Option<JoinHandle<()>>) {
        let mut guard = self.timer.lock().await;
        let previous = match handle {
            Some(handle) => guard.replace(handle),
            None => guard.take(),
        };
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}
