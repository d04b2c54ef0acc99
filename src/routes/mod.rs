//! HTTP route trees, all mounted under `/api` except docs and healthcheck.

use axum::Router;

use crate::state::SharedState;

pub mod content;
pub mod docs;
pub mod health;
pub mod quiz;
pub mod session;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = content::router().merge(quiz::router()).merge(session::router());

    let docs_router = docs::router(state.clone());

    health::router()
        .nest("/api", api_router)
        .merge(docs_router)
        .with_state(state)
}
