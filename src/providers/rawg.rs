//! RAWG adapter for video games.

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use crate::{
    dto::content::{ContentItem, MediaType, Source},
    providers::{ContentProvider, ProviderError, ProviderResult, RESULT_LIMIT, response_json},
};

const PROVIDER: &str = "rawg";
const BASE_URL: &str = "https://api.rawg.io/api";

/// Client for the RAWG games database.
#[derive(Clone)]
pub struct RawgClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl RawgClient {
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
        debug!(url = %url, "RAWG request");

        let mut all_params = vec![("key", api_key)];
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

impl ContentProvider for RawgClient {
    fn source(&self) -> Source {
        Source::Rawg
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
                "/games".into(),
                vec![
                    ("search", query),
                    ("page_size", RESULT_LIMIT.to_string()),
                ],
            )
            .await?;

            let results = data
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            Ok(results.iter().filter_map(map_game).collect())
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
            if media_type != MediaType::Game {
                return Ok(None);
            }

            let data = match Self::get_json(client, api_key?, format!("/games/{id}"), Vec::new())
                .await
            {
                Ok(data) => data,
                Err(ProviderError::Status { status, .. })
                    if status == reqwest::StatusCode::NOT_FOUND =>
                {
                    return Ok(None);
                }
                Err(err) => return Err(err),
            };

            let mut item = map_game(&data).ok_or(ProviderError::Malformed {
                provider: PROVIDER,
                detail: "game detail missing id or name".into(),
            })?;

            item.genre = data.get("genres").and_then(Value::as_array).map(|genres| {
                genres
                    .iter()
                    .filter_map(|genre| genre.get("name").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join(", ")
            });
            item.overview = data
                .get("description_raw")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .filter(|overview| !overview.is_empty());

            Ok(Some(item))
        })
    }
}

fn map_game(entry: &Value) -> Option<ContentItem> {
    let id = entry.get("id")?.as_i64()?.to_string();
    let title = entry.get("name")?.as_str()?.to_owned();

    Some(ContentItem {
        id,
        title,
        media_type: MediaType::Game,
        poster: entry
            .get("background_image")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        year: entry
            .get("released")
            .and_then(Value::as_str)
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
            .map(str::to_owned),
        genre: None,
        overview: None,
        source: Source::Rawg,
        artist: None,
        album: None,
        preview_url: None,
        duration_secs: None,
        followers: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn game_mapping_reads_release_year_and_cover() {
        let entry = json!({
            "id": 3498, "name": "GTA V",
            "background_image": "https://img/x.jpg", "released": "2013-09-17"
        });

        let item = map_game(&entry).unwrap();
        assert_eq!(item.id, "3498");
        assert_eq!(item.media_type, MediaType::Game);
        assert_eq!(item.year.as_deref(), Some("2013"));
        assert_eq!(item.poster, "https://img/x.jpg");
    }

    #[test]
    fn entries_without_name_are_skipped() {
        assert!(map_game(&json!({"id": 1})).is_none());
    }
}
