//! Search fan-out and detail lookups across the content providers.

use futures::future::join_all;
use tracing::warn;
use validator::Validate;

use crate::{
    dto::content::{ContentItem, DetailsParams, SearchParams},
    error::ServiceError,
    state::SharedState,
};

/// Fan the query out to every provider in parallel and merge the results.
///
/// Merge order is the fixed provider order (TMDB, RAWG, Spotify) regardless
/// of completion order. A failing provider contributes an empty slice; only
/// the failure is logged so one dead upstream never empties the whole page.
pub async fn search(
    state: &SharedState,
    params: SearchParams,
) -> Result<Vec<ContentItem>, ServiceError> {
    params
        .validate()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
    let query = params.query.trim();

    let searches = state
        .providers()
        .iter()
        .map(|provider| provider.search(query));
    let outcomes = join_all(searches).await;

    let mut combined = Vec::new();
    for (provider, outcome) in state.providers().iter().zip(outcomes) {
        match outcome {
            Ok(items) => combined.extend(items),
            Err(err) => {
                warn!(
                    source = %provider.source(),
                    query = %query,
                    error = %err,
                    "provider search failed; contributing no results"
                );
            }
        }
    }

    Ok(combined)
}

/// Fetch full details for one item from the provider that owns it.
pub async fn details(
    state: &SharedState,
    params: DetailsParams,
) -> Result<ContentItem, ServiceError> {
    let provider = state
        .providers()
        .iter()
        .find(|provider| provider.source() == params.source)
        .ok_or_else(|| ServiceError::InvalidInput(format!("unknown source {}", params.source)))?;

    let detail = provider
        .fetch_detail(&params.id, params.media_type)
        .await
        .map_err(|err| {
            warn!(
                source = %params.source,
                id = %params.id,
                error = %err,
                "detail fetch failed"
            );
            ServiceError::from(err)
        })?;

    detail.ok_or_else(|| {
        warn!(source = %params.source, id = %params.id, "no detail data resolved");
        ServiceError::ContentUnresolved
    })
}
