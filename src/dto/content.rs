//! Common content shape produced by the provider adapters.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Kind of content an item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film (TMDB).
    Movie,
    /// TV show (TMDB).
    Show,
    /// Video game (RAWG).
    Game,
    /// Music track (Spotify).
    Song,
    /// Music artist (Spotify).
    Artist,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaType::Movie => "movie",
            MediaType::Show => "show",
            MediaType::Game => "game",
            MediaType::Song => "song",
            MediaType::Artist => "artist",
        };
        f.write_str(name)
    }
}

/// Which provider an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The Movie Database.
    Tmdb,
    /// RAWG video games database.
    Rawg,
    /// Spotify.
    Spotify,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Tmdb => "tmdb",
            Source::Rawg => "rawg",
            Source::Spotify => "spotify",
        };
        f.write_str(name)
    }
}

/// Normalized content item shared by search results and detail responses.
///
/// Detail fetches populate the optional tail fields (overview, artist data);
/// search results usually leave them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Provider-scoped identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Kind of content.
    pub media_type: MediaType,
    /// Poster or cover image URL; empty when the provider has none.
    #[serde(default)]
    pub poster: String,
    /// Release year as text, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Comma-joined genre list, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Synopsis or description, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Originating provider.
    pub source: Source,
    /// Main artist name (Spotify tracks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Album name (Spotify tracks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Preview clip URL (Spotify tracks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// Track duration in whole seconds (Spotify tracks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    /// Follower count (Spotify artists).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
}

/// Query parameters for `GET /api/search`.
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct SearchParams {
    /// Free-text query forwarded to every provider.
    #[validate(custom(function = crate::dto::validation::validate_query))]
    pub query: String,
}

/// Query parameters for `GET /api/details`.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct DetailsParams {
    /// Provider-scoped identifier of the item.
    pub id: String,
    /// Provider that owns the item.
    pub source: Source,
    /// Media type hint the provider needs to pick its endpoint.
    #[serde(rename = "type")]
    pub media_type: MediaType,
}
