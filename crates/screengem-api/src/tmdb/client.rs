//! `TmdbClient` - TMDB API client implementation.

use reqwest::{Client, StatusCode};
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::error::TmdbError;
use super::types::{
    PopularMoviesParams, SearchMovieParams, TmdbErrorResponse, TmdbMovieListResponse,
    TmdbVideosResponse,
};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// TMDB API client.
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// v3 API key, sent as the `api_key` query parameter.
    api_key: String,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"****")
            .finish_non_exhaustive()
    }
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the v3 API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient, BuildError> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(BuildError::MissingApiKey)?;
        let user_agent = self.user_agent.ok_or(BuildError::MissingUserAgent)?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).map_err(BuildError::BaseUrl)?,
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .map_err(BuildError::Http)?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

/// Error returned by [`TmdbClientBuilder::build`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No API key was configured.
    #[error("api_key is required")]
    MissingApiKey,
    /// No User-Agent was configured.
    #[error("user_agent is required")]
    MissingUserAgent,
    /// The default base URL failed to parse.
    #[error("invalid default base URL")]
    BaseUrl(#[source] url::ParseError),
    /// The HTTP client failed to build.
    #[error("failed to build HTTP client")]
    Http(#[source] reqwest::Error),
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request with the API key and query params.
    ///
    /// A 2xx status other than 200 is answered with `T::default()`,
    /// i.e. a response without a result collection.
    #[instrument(skip_all, fields(path = %path))]
    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, TmdbError>
    where
        T: serde::de::DeserializeOwned + Default + Send,
    {
        let url = self.base_url.join(path).map_err(|source| TmdbError::Url {
            path: String::from(path),
            source,
        })?;

        let request = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .build()
            .map_err(|source| TmdbError::Request {
                path: String::from(path),
                source,
            })?;

        tracing::debug!(path, ?query, "TMDB API request");

        let response =
            self.http_client
                .execute(request)
                .await
                .map_err(|source| TmdbError::Transport {
                    path: String::from(path),
                    source,
                })?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = serde_json::from_str::<TmdbErrorResponse>(&body)
                .map_or(body, |error_response| {
                    format!(
                        "code={}, message={}",
                        error_response.status_code, error_response.status_message
                    )
                });
            return Err(TmdbError::Status { status, message });
        }

        if status != StatusCode::OK {
            tracing::debug!(%status, "TMDB API answered without a body");
            return Ok(T::default());
        }

        let body = response.text().await.map_err(|source| TmdbError::Body {
            path: String::from(path),
            status,
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| TmdbError::Decode {
            path: String::from(path),
            status,
            source,
        })
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn popular_movies(
        &self,
        params: &PopularMoviesParams,
    ) -> Result<TmdbMovieListResponse, TmdbError> {
        let query = [
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
        ];
        self.get_json("movie/popular", &query).await
    }

    #[instrument(skip_all)]
    async fn search_movie(
        &self,
        params: &SearchMovieParams,
    ) -> Result<TmdbMovieListResponse, TmdbError> {
        let query = [
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
        ];
        self.get_json("search/movie", &query).await
    }

    #[instrument(skip_all)]
    async fn movie_videos(
        &self,
        movie_id: u64,
        language: &str,
    ) -> Result<TmdbVideosResponse, TmdbError> {
        let path = format!("movie/{movie_id}/videos");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }
}
