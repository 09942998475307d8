//! TMDB API response types and request parameters.

use serde::{Deserialize, Deserializer};

/// Default response language for every endpoint.
pub const DEFAULT_LANGUAGE: &str = "en-US";

// --- Movie lists (popular, search) ---

/// Response from the `movie/popular` and `search/movie` endpoints.
///
/// `results` stays `None` when the body carries no result collection,
/// which callers treat differently from an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovieListResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Result collection, in server order.
    #[serde(default)]
    pub results: Option<Vec<TmdbMovie>>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single movie entry in a list response.
///
/// Only the fields the browser reads are kept. A `null` title decodes as
/// an empty string so one bad entry cannot fail the whole page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbMovie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub title: String,
    /// Release date (YYYY-MM-DD, empty or null when unknown).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path relative to the image CDN.
    #[serde(default)]
    pub poster_path: Option<String>,
}

// --- Movie videos ---

/// Response from the `movie/{movie_id}/videos` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideosResponse {
    /// TMDB movie ID the videos belong to.
    #[serde(default)]
    pub id: Option<u64>,
    /// Video entries, in server order.
    #[serde(default)]
    pub results: Option<Vec<TmdbVideo>>,
}

/// A single video attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbVideo {
    /// Hosting-site key (e.g. the `YouTube` video id).
    #[serde(default)]
    pub key: Option<String>,
    /// Hosting site (e.g. "`YouTube`", "Vimeo").
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser", "Clip").
    #[serde(rename = "type", default, deserialize_with = "deserialize_null_as_default")]
    pub video_type: String,
}

/// Deserializes `null` as the type's default value.
fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}

// --- Request Parameters ---

/// Parameters for the `movie/popular` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularMoviesParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (default: 1).
    pub page: u32,
}

impl PopularMoviesParams {
    /// Creates params for the first page in the default language.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

impl Default for PopularMoviesParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters for the `search/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (default: 1).
    pub page: u32,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
