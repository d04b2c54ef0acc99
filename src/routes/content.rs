use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::content::{ContentItem, DetailsParams, SearchParams},
    error::AppError,
    services::content_service,
    state::SharedState,
};

/// Routes handling content discovery across the provider APIs.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/search", get(search))
        .route("/details", get(details))
}

/// Search movies, shows, games, and songs across every provider at once.
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "content",
    params(SearchParams),
    responses(
        (status = 200, description = "Merged results in provider order", body = Vec<ContentItem>),
        (status = 400, description = "Missing or oversized query")
    )
)]
pub async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ContentItem>>, AppError> {
    let items = content_service::search(&state, params).await?;
    Ok(Json(items))
}

/// Fetch full details for one item from the provider that owns it.
#[utoipa::path(
    get,
    path = "/api/details",
    tag = "content",
    params(DetailsParams),
    responses(
        (status = 200, description = "Detailed content item", body = ContentItem),
        (status = 500, description = "Provider failed or returned nothing")
    )
)]
pub async fn details(
    State(state): State<SharedState>,
    Query(params): Query<DetailsParams>,
) -> Result<Json<ContentItem>, AppError> {
    let item = content_service::details(&state, params).await?;
    Ok(Json(item))
}
