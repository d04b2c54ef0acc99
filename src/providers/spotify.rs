//! Spotify adapter for tracks and artists, using the client-credentials grant.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    dto::content::{ContentItem, MediaType, Source},
    providers::{ContentProvider, ProviderError, ProviderResult, RESULT_LIMIT, response_json},
};

const PROVIDER: &str = "spotify";
const API_BASE: &str = "https://api.spotify.com/v1";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
/// Renew the token this long before it actually expires.
const EXPIRY_SLACK: Duration = Duration::from_secs(30);

#[derive(Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Client for the Spotify Web API with an in-memory token cache.
#[derive(Clone)]
pub struct SpotifyClient {
    client: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl SpotifyClient {
    /// Build a client; missing credentials make every call fail with
    /// [`ProviderError::MissingCredentials`].
    pub fn new(
        client: reqwest::Client,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            client,
            client_id,
            client_secret,
            token: Arc::new(RwLock::new(None)),
        }
    }

    fn credentials(&self) -> ProviderResult<(String, String)> {
        match (self.client_id.clone(), self.client_secret.clone()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(ProviderError::MissingCredentials { provider: PROVIDER }),
        }
    }

    /// Return a valid access token, refreshing through the client-credentials
    /// grant when the cached one is absent or close to expiry.
    async fn access_token(
        client: reqwest::Client,
        credentials: (String, String),
        cache: Arc<RwLock<Option<CachedToken>>>,
    ) -> ProviderResult<String> {
        {
            let guard = cache.read().await;
            if let Some(token) = guard.as_ref() {
                if token.expires_at > Instant::now() + EXPIRY_SLACK {
                    return Ok(token.value.clone());
                }
            }
        }

        debug!("requesting Spotify access token");
        let (client_id, client_secret) = credentials;
        let response = client
            .post(TOKEN_URL)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|source| ProviderError::Network {
                provider: PROVIDER,
                source,
            })?;

        let data = response_json(PROVIDER, response).await?;
        let value = data
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::Malformed {
                provider: PROVIDER,
                detail: "token response missing access_token".into(),
            })?
            .to_owned();
        let expires_in = data
            .get("expires_in")
            .and_then(Value::as_u64)
            .unwrap_or(3600);

        let token = CachedToken {
            value: value.clone(),
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        };
        *cache.write().await = Some(token);

        Ok(value)
    }

    async fn get_json(
        client: reqwest::Client,
        token: String,
        path: String,
        params: Vec<(&'static str, String)>,
    ) -> ProviderResult<Value> {
        let url = format!("{API_BASE}{path}");
        debug!(url = %url, "Spotify request");

        let response = client
            .get(&url)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await
            .map_err(|source| ProviderError::Network {
                provider: PROVIDER,
                source,
            })?;

        response_json(PROVIDER, response).await
    }
}

impl ContentProvider for SpotifyClient {
    fn source(&self) -> Source {
        Source::Spotify
    }

    fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    fn search(&self, query: &str) -> BoxFuture<'static, ProviderResult<Vec<ContentItem>>> {
        let client = self.client.clone();
        let credentials = self.credentials();
        let cache = Arc::clone(&self.token);
        let query = query.to_owned();

        Box::pin(async move {
            let token = Self::access_token(client.clone(), credentials?, cache).await?;
            let data = Self::get_json(
                client,
                token,
                "/search".into(),
                vec![
                    ("q", query),
                    ("type", "track".into()),
                    ("limit", RESULT_LIMIT.to_string()),
                ],
            )
            .await?;

            let tracks = data
                .pointer("/tracks/items")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            Ok(tracks.iter().filter_map(map_track).collect())
        })
    }

    fn fetch_detail(
        &self,
        id: &str,
        media_type: MediaType,
    ) -> BoxFuture<'static, ProviderResult<Option<ContentItem>>> {
        let client = self.client.clone();
        let credentials = self.credentials();
        let cache = Arc::clone(&self.token);
        let id = id.to_owned();

        Box::pin(async move {
            let path = match media_type {
                MediaType::Song => format!("/tracks/{id}"),
                MediaType::Artist => format!("/artists/{id}"),
                _ => return Ok(None),
            };

            let token = Self::access_token(client.clone(), credentials?, cache).await?;
            let data = match Self::get_json(client, token, path, Vec::new()).await {
                Ok(data) => data,
                Err(ProviderError::Status { status, .. })
                    if status == reqwest::StatusCode::NOT_FOUND =>
                {
                    return Ok(None);
                }
                Err(err) => return Err(err),
            };

            let item = match media_type {
                MediaType::Song => map_track_detail(&data),
                _ => map_artist(&data),
            };

            Ok(item)
        })
    }
}

fn map_track(track: &Value) -> Option<ContentItem> {
    let id = track.get("id")?.as_str()?.to_owned();
    let title = track.get("name")?.as_str()?.to_owned();

    Some(ContentItem {
        id,
        title,
        media_type: MediaType::Song,
        poster: album_image(track),
        year: track
            .pointer("/album/release_date")
            .and_then(Value::as_str)
            .and_then(|date| date.split('-').next())
            .map(str::to_owned),
        genre: None,
        overview: None,
        source: Source::Spotify,
        artist: first_artist(track),
        album: None,
        preview_url: None,
        duration_secs: None,
        followers: None,
    })
}

fn map_track_detail(track: &Value) -> Option<ContentItem> {
    let mut item = map_track(track)?;
    item.album = track
        .pointer("/album/name")
        .and_then(Value::as_str)
        .map(str::to_owned);
    item.preview_url = track
        .get("preview_url")
        .and_then(Value::as_str)
        .map(str::to_owned);
    item.duration_secs = track
        .get("duration_ms")
        .and_then(Value::as_u64)
        .map(|ms| ms / 1000);
    Some(item)
}

fn map_artist(artist: &Value) -> Option<ContentItem> {
    let id = artist.get("id")?.as_str()?.to_owned();
    let title = artist.get("name")?.as_str()?.to_owned();

    Some(ContentItem {
        id,
        title,
        media_type: MediaType::Artist,
        poster: artist
            .pointer("/images/0/url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        year: None,
        genre: artist.get("genres").and_then(Value::as_array).map(|genres| {
            genres
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        }),
        overview: None,
        source: Source::Spotify,
        artist: None,
        album: None,
        preview_url: None,
        duration_secs: None,
        followers: artist.pointer("/followers/total").and_then(Value::as_u64),
    })
}

fn first_artist(track: &Value) -> Option<String> {
    track
        .pointer("/artists/0/name")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn album_image(track: &Value) -> String {
    track
        .pointer("/album/images/0/url")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track_value() -> Value {
        json!({
            "id": "t1", "name": "Time", "duration_ms": 413_000,
            "preview_url": "https://preview/x",
            "artists": [{"name": "Pink Floyd"}],
            "album": {
                "name": "The Dark Side of the Moon",
                "release_date": "1973-03-01",
                "images": [{"url": "https://img/cover.jpg"}]
            }
        })
    }

    #[test]
    fn track_mapping_reads_artist_album_and_year() {
        let item = map_track_detail(&track_value()).unwrap();

        assert_eq!(item.media_type, MediaType::Song);
        assert_eq!(item.artist.as_deref(), Some("Pink Floyd"));
        assert_eq!(item.album.as_deref(), Some("The Dark Side of the Moon"));
        assert_eq!(item.year.as_deref(), Some("1973"));
        assert_eq!(item.duration_secs, Some(413));
        assert_eq!(item.poster, "https://img/cover.jpg");
    }

    #[test]
    fn artist_mapping_joins_genres_and_reads_followers() {
        let artist = json!({
            "id": "a1", "name": "Pink Floyd",
            "genres": ["progressive rock", "psychedelic rock"],
            "followers": {"total": 123},
            "images": [{"url": "https://img/artist.jpg"}]
        });

        let item = map_artist(&artist).unwrap();
        assert_eq!(item.media_type, MediaType::Artist);
        assert_eq!(
            item.genre.as_deref(),
            Some("progressive rock, psychedelic rock")
        );
        assert_eq!(item.followers, Some(123));
    }

    #[test]
    fn missing_credentials_fail_fast() {
        let client = SpotifyClient::new(reqwest::Client::new(), None, None);
        assert!(matches!(
            client.credentials(),
            Err(ProviderError::MissingCredentials { .. })
        ));
    }
}
