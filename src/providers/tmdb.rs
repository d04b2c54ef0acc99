//! TMDB (The Movie Database) adapter for movies and shows.

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use crate::{
    dto::content::{ContentItem, MediaType, Source},
    providers::{ContentProvider, ProviderError, ProviderResult, RESULT_LIMIT, response_json},
};

const PROVIDER: &str = "tmdb";
const BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w342";

/// Client for TMDB API v3.
#[derive(Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl TmdbClient {
    /// Build a client; a `None` key makes every call fail with
    /// [`ProviderError::MissingCredentials`].
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    fn api_key(&self) -> ProviderResult<String> {
        self.api_key
            .clone()
            .ok_or(ProviderError::MissingCredentials { provider: PROVIDER })
    }

    async fn get_json(
        client: reqwest::Client,
        api_key: String,
        path: String,
        params: Vec<(&'static str, String)>,
    ) -> ProviderResult<Value> {
        let url = format!("{BASE_URL}{path}");
        debug!(url = %url, "TMDB request");

        let mut all_params = vec![("api_key", api_key)];
        all_params.extend(params);

        let response = client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|source| ProviderError::Network {
                provider: PROVIDER,
                source,
            })?;

        response_json(PROVIDER, response).await
    }
}

impl ContentProvider for TmdbClient {
    fn source(&self) -> Source {
        Source::Tmdb
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn search(&self, query: &str) -> BoxFuture<'static, ProviderResult<Vec<ContentItem>>> {
        let client = self.client.clone();
        let api_key = self.api_key();
        let query = query.to_owned();

        Box::pin(async move {
            let data = Self::get_json(
                client,
                api_key?,
                "/search/multi".into(),
                vec![("query", query), ("include_adult", "false".into())],
            )
            .await?;

            let results = data
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            Ok(results
                .iter()
                .filter_map(map_search_result)
                .take(RESULT_LIMIT)
                .collect())
        })
    }

    fn fetch_detail(
        &self,
        id: &str,
        media_type: MediaType,
    ) -> BoxFuture<'static, ProviderResult<Option<ContentItem>>> {
        let client = self.client.clone();
        let api_key = self.api_key();
        let id = id.to_owned();

        Box::pin(async move {
            let path = match media_type {
                MediaType::Movie => format!("/movie/{id}"),
                MediaType::Show => format!("/tv/{id}"),
                _ => return Ok(None),
            };

            let data = match Self::get_json(client, api_key?, path, Vec::new()).await {
                Ok(data) => data,
                Err(ProviderError::Status { status, .. })
                    if status == reqwest::StatusCode::NOT_FOUND =>
                {
                    return Ok(None);
                }
                Err(err) => return Err(err),
            };

            Ok(Some(map_detail(&data, media_type)))
        })
    }
}

/// Map one `/search/multi` entry, skipping people and unknown media types.
fn map_search_result(entry: &Value) -> Option<ContentItem> {
    let media_type = match entry.get("media_type").and_then(Value::as_str)? {
        "movie" => MediaType::Movie,
        "tv" => MediaType::Show,
        _ => return None,
    };

    let id = entry.get("id")?.as_i64()?.to_string();
    let title = title_of(entry, media_type)?;

    Some(ContentItem {
        id,
        title,
        media_type,
        poster: poster_of(entry),
        year: year_of(entry, media_type),
        genre: None,
        overview: None,
        source: Source::Tmdb,
        artist: None,
        album: None,
        preview_url: None,
        duration_secs: None,
        followers: None,
    })
}

fn map_detail(data: &Value, media_type: MediaType) -> ContentItem {
    let genre = data.get("genres").and_then(Value::as_array).map(|genres| {
        genres
            .iter()
            .filter_map(|genre| genre.get("name").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    });

    ContentItem {
        id: data
            .get("id")
            .and_then(Value::as_i64)
            .map(|id| id.to_string())
            .unwrap_or_default(),
        title: title_of(data, media_type).unwrap_or_default(),
        media_type,
        poster: poster_of(data),
        year: year_of(data, media_type),
        genre: genre.filter(|genre| !genre.is_empty()),
        overview: data
            .get("overview")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .filter(|overview| !overview.is_empty()),
        source: Source::Tmdb,
        artist: None,
        album: None,
        preview_url: None,
        duration_secs: None,
        followers: None,
    }
}

/// Movies carry `title`/`release_date`; shows carry `name`/`first_air_date`.
fn title_of(entry: &Value, media_type: MediaType) -> Option<String> {
    let key = match media_type {
        MediaType::Show => "name",
        _ => "title",
    };
    entry.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn year_of(entry: &Value, media_type: MediaType) -> Option<String> {
    let key = match media_type {
        MediaType::Show => "first_air_date",
        _ => "release_date",
    };
    entry
        .get(key)
        .and_then(Value::as_str)
        .and_then(|date| date.split('-').next())
        .filter(|year| !year.is_empty())
        .map(str::to_owned)
}

fn poster_of(entry: &Value) -> String {
    entry
        .get("poster_path")
        .and_then(Value::as_str)
        .map(|path| format!("{IMAGE_BASE}{path}"))
        .unwrap_or_default()
}
