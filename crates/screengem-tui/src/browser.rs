//! Sequential controller that drives [`BrowserState`] against the TMDB API.

use screengem_api::tmdb::{PopularMoviesParams, SearchMovieParams, TmdbApi};
use tracing::instrument;

use crate::links::MediaLinks;
use crate::state::{BrowserState, ListOutcome, ListTarget, Movie, TrailerOutcome};

/// Reads the endpoint named by `target`.
///
/// # Errors
///
/// Returns the client error unchanged; classification happens on settlement.
pub async fn fetch_list<C>(api: &C, target: &ListTarget, language: &str) -> ListOutcome
where
    C: TmdbApi,
{
    match target {
        ListTarget::Popular => {
            let params = PopularMoviesParams::new().language(language);
            api.popular_movies(&params).await
        }
        ListTarget::Search(query) => {
            let params = SearchMovieParams::new(query.as_str()).language(language);
            api.search_movie(&params).await
        }
    }
}

/// Reads the videos attached to a movie.
///
/// # Errors
///
/// Returns the client error unchanged.
pub async fn fetch_trailer<C>(api: &C, movie_id: u64, language: &str) -> TrailerOutcome
where
    C: TmdbApi,
{
    api.movie_videos(movie_id, language).await
}

/// Movie browser without a terminal: each operation issues its request and
/// settles it before returning.
#[derive(Debug)]
pub struct Browser<C> {
    api: C,
    language: String,
    state: BrowserState,
}

impl<C: TmdbApi> Browser<C> {
    /// Creates a browser over `api` with an empty state.
    pub fn new(api: C, links: MediaLinks, language: impl Into<String>) -> Self {
        Self {
            api,
            language: language.into(),
            state: BrowserState::new(links),
        }
    }

    /// Current state.
    pub const fn state(&self) -> &BrowserState {
        &self.state
    }

    /// Loads the popular-movies catalog.
    #[instrument(skip_all)]
    pub async fn load_catalog(&mut self) {
        let request = self.state.begin_catalog();
        let outcome = fetch_list(&self.api, &request.target, &self.language).await;
        self.state.settle_list(request.generation, outcome);
    }

    /// Applies a query change: empty reloads the catalog, anything else searches.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn search(&mut self, query: &str) {
        let request = self.state.on_query_changed(query);
        let outcome = fetch_list(&self.api, &request.target, &self.language).await;
        self.state.settle_list(request.generation, outcome);
    }

    /// Selects a movie and resolves its trailer.
    #[instrument(skip_all, fields(movie_id = movie.id))]
    pub async fn select(&mut self, movie: Movie) {
        let request = self.state.select(movie);
        let outcome = fetch_trailer(&self.api, request.movie_id, &self.language).await;
        self.state.settle_trailer(request.generation, outcome);
    }

    /// Clears the selection.
    pub fn dismiss(&mut self) {
        self.state.dismiss();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Mutex;

    use reqwest::StatusCode;
    use screengem_api::tmdb::{TmdbError, TmdbMovieListResponse, TmdbVideosResponse};

    use super::*;
    use crate::state::{NO_MOVIES_FOUND, Trailer};

    /// Canned API that records every call.
    #[derive(Debug, Default)]
    struct FakeApi {
        popular: Option<TmdbMovieListResponse>,
        search: Option<TmdbMovieListResponse>,
        videos: Option<TmdbVideosResponse>,
        calls: Mutex<Vec<String>>,
    }

    fn server_error() -> TmdbError {
        TmdbError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("boom"),
        }
    }

    impl TmdbApi for FakeApi {
        async fn popular_movies(
            &self,
            params: &PopularMoviesParams,
        ) -> Result<TmdbMovieListResponse, TmdbError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("popular:{}", params.language));
            self.popular.clone().ok_or_else(server_error)
        }

        async fn search_movie(
            &self,
            params: &SearchMovieParams,
        ) -> Result<TmdbMovieListResponse, TmdbError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("search:{}", params.query));
            self.search.clone().ok_or_else(server_error)
        }

        async fn movie_videos(
            &self,
            movie_id: u64,
            _language: &str,
        ) -> Result<TmdbVideosResponse, TmdbError> {
            self.calls.lock().unwrap().push(format!("videos:{movie_id}"));
            self.videos.clone().ok_or_else(server_error)
        }
    }

    fn movies(titles: &[(u64, &str)]) -> TmdbMovieListResponse {
        let results = titles
            .iter()
            .map(|(id, title)| {
                serde_json::from_value(serde_json::json!({ "id": id, "title": title })).unwrap()
            })
            .collect();
        TmdbMovieListResponse {
            page: 1,
            results: Some(results),
            total_pages: 1,
            total_results: 0,
        }
    }

    fn browser(api: FakeApi) -> Browser<FakeApi> {
        Browser::new(api, MediaLinks::default(), "en-US")
    }

    #[tokio::test]
    async fn test_load_catalog() {
        // Arrange
        let mut browser = browser(FakeApi {
            popular: Some(movies(&[(1, "One"), (2, "Two")])),
            ..FakeApi::default()
        });

        // Act
        browser.load_catalog().await;

        // Assert
        let state = browser.state();
        assert_eq!(state.movies().len(), 2);
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        assert_eq!(
            *browser.api.calls.lock().unwrap(),
            vec![String::from("popular:en-US")]
        );
    }

    #[tokio::test]
    async fn test_search_then_clear_reloads_catalog() {
        // Arrange
        let mut browser = browser(FakeApi {
            popular: Some(movies(&[(1, "One")])),
            search: Some(movies(&[(7, "Batman"), (8, "Batman Returns")])),
            ..FakeApi::default()
        });

        // Act
        browser.search("batman").await;
        let after_search: Vec<u64> = browser.state().movies().iter().map(|m| m.id).collect();
        browser.search("").await;

        // Assert
        assert_eq!(after_search, vec![7, 8]);
        assert_eq!(browser.state().movies()[0].id, 1);
        assert_eq!(
            *browser.api.calls.lock().unwrap(),
            vec![String::from("search:batman"), String::from("popular:en-US")]
        );
    }

    #[tokio::test]
    async fn test_search_failure_keeps_list() {
        // Arrange
        let mut browser = browser(FakeApi {
            popular: Some(movies(&[(1, "One")])),
            ..FakeApi::default()
        });
        browser.load_catalog().await;

        // Act
        browser.search("x").await;

        // Assert
        assert_eq!(
            browser.state().error(),
            Some("Server error: Please try again later.")
        );
        assert_eq!(browser.state().movies().len(), 1);
        assert!(!browser.state().is_loading());
    }

    #[tokio::test]
    async fn test_empty_search_reports_no_movies() {
        // Arrange
        let mut browser = browser(FakeApi {
            search: Some(movies(&[])),
            ..FakeApi::default()
        });

        // Act
        browser.search("nothing").await;

        // Assert
        assert_eq!(browser.state().error(), Some(NO_MOVIES_FOUND));
    }

    #[tokio::test]
    async fn test_select_resolves_trailer() {
        // Arrange
        let videos: TmdbVideosResponse = serde_json::from_value(serde_json::json!({
            "id": 42,
            "results": [{ "type": "Trailer", "site": "YouTube", "key": "abc123" }]
        }))
        .unwrap();
        let mut browser = browser(FakeApi {
            popular: Some(movies(&[(42, "The Answer")])),
            videos: Some(videos),
            ..FakeApi::default()
        });
        browser.load_catalog().await;
        let movie = browser.state().movies()[0].clone();

        // Act
        browser.select(movie).await;

        // Assert
        assert_eq!(
            browser.state().selection().unwrap().trailer,
            Some(Trailer::Playable(String::from(
                "https://www.youtube.com/watch?v=abc123"
            )))
        );
    }

    #[tokio::test]
    async fn test_browser_is_debug() {
        // Arrange
        let mut browser = browser(FakeApi {
            popular: Some(movies(&[(1, "One")])),
            ..FakeApi::default()
        });
        browser.load_catalog().await;

        // Act
        let debug = format!("{browser:?}");

        // Assert
        assert!(debug.starts_with("Browser"));
        assert!(debug.contains("en-US"));
        assert!(debug.contains("One"));
    }

    #[tokio::test]
    async fn test_select_failure_then_dismiss() {
        // Arrange
        let mut browser = browser(FakeApi {
            popular: Some(movies(&[(42, "The Answer")])),
            ..FakeApi::default()
        });
        browser.load_catalog().await;
        let movie = browser.state().movies()[0].clone();

        // Act
        browser.select(movie).await;
        let trailer = browser.state().selection().unwrap().trailer.clone();
        browser.dismiss();

        // Assert
        assert!(trailer.is_none());
        assert!(browser.state().error().is_none());
        assert!(browser.state().selection().is_none());
    }
}
