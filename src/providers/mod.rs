//! Thin adapters around the third-party content APIs.

pub mod rawg;
pub mod spotify;
pub mod tmdb;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::dto::content::{ContentItem, MediaType, Source};

/// Result alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Maximum number of search results requested from each provider.
pub const RESULT_LIMIT: usize = 6;

/// Error raised by content providers regardless of the underlying API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider has no usable credentials configured.
    #[error("{provider}: missing credentials")]
    MissingCredentials {
        /// Provider name for log context.
        provider: &'static str,
    },
    /// The HTTP call itself failed.
    #[error("{provider}: request failed")]
    Network {
        /// Provider name for log context.
        provider: &'static str,
        /// Transport-level failure.
        #[source]
        source: reqwest::Error,
    },
    /// The provider answered with a non-success status.
    #[error("{provider}: returned status {status}")]
    Status {
        /// Provider name for log context.
        provider: &'static str,
        /// HTTP status of the response.
        status: reqwest::StatusCode,
    },
    /// The response body could not be interpreted.
    #[error("{provider}: malformed response: {detail}")]
    Malformed {
        /// Provider name for log context.
        provider: &'static str,
        /// What was wrong with the body.
        detail: String,
    },
}

/// Abstraction over a single content API (search plus detail lookup).
///
/// Futures are boxed and `'static` so implementations clone whatever handles
/// they need into the future; callers can fan out over `Arc<dyn ContentProvider>`.
pub trait ContentProvider: Send + Sync {
    /// Which source this adapter serves.
    fn source(&self) -> Source;

    /// Whether the adapter holds usable credentials.
    fn is_configured(&self) -> bool;

    /// Search the provider, returning up to [`RESULT_LIMIT`] normalized items.
    fn search(&self, query: &str) -> BoxFuture<'static, ProviderResult<Vec<ContentItem>>>;

    /// Fetch full details for one item, `Ok(None)` when the provider cannot
    /// resolve the id/type combination.
    fn fetch_detail(
        &self,
        id: &str,
        media_type: MediaType,
    ) -> BoxFuture<'static, ProviderResult<Option<ContentItem>>>;
}

/// Map a reqwest response into JSON, normalizing status and decode failures.
pub(crate) async fn response_json(
    provider: &'static str,
    response: reqwest::Response,
) -> ProviderResult<serde_json::Value> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status { provider, status });
    }

    response
        .json()
        .await
        .map_err(|source| ProviderError::Network { provider, source })
}
