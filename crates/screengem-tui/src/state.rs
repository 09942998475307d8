//! Browser state container.
//!
//! All UI state lives in [`BrowserState`]. Each event has one transition:
//! `begin_*` starts a request and hands back a ticket, `settle_*` applies
//! the outcome of that ticket. Tickets carry a generation so that only the
//! latest list request and the current selection's trailer lookup are
//! applied, whatever order responses arrive in.

use screengem_api::tmdb::{
    TmdbError, TmdbMovie, TmdbMovieListResponse, TmdbVideo, TmdbVideosResponse,
};

use crate::failure::FetchFailure;
use crate::links::MediaLinks;

/// Error shown when a list request succeeds without results.
pub const NO_MOVIES_FOUND: &str = "No movies found.";

/// Video type accepted as a trailer.
const TRAILER_TYPE: &str = "Trailer";

/// Hosting site accepted for trailers.
const TRAILER_SITE: &str = "YouTube";

/// Outcome of a popular or search request.
pub type ListOutcome = Result<TmdbMovieListResponse, TmdbError>;

/// Outcome of a videos request.
pub type TrailerOutcome = Result<TmdbVideosResponse, TmdbError>;

/// Resolved trailer reference of a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trailer {
    /// Playable watch URL.
    Playable(String),
    /// The lookup succeeded but no `YouTube` trailer exists.
    NotFound,
}

/// A movie as displayed by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Poster path relative to the image CDN.
    pub poster_path: Option<String>,
    /// Release date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// `None` until the trailer lookup for this movie has settled.
    pub trailer: Option<Trailer>,
}

impl From<TmdbMovie> for Movie {
    fn from(movie: TmdbMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            release_date: movie.release_date,
            overview: movie.overview,
            trailer: None,
        }
    }
}

/// Endpoint a list request reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListTarget {
    /// The popular-movies catalog.
    Popular,
    /// Free-text movie search.
    Search(String),
}

/// Ticket for an in-flight list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Generation the outcome must match to be applied.
    pub generation: u64,
    /// Endpoint to read.
    pub target: ListTarget,
}

/// Ticket for an in-flight trailer lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerRequest {
    /// Selection generation the outcome must match to be applied.
    pub generation: u64,
    /// Movie whose videos are requested.
    pub movie_id: u64,
}

/// Returns the first `YouTube` trailer with a key, in server order.
#[must_use]
pub fn find_trailer(videos: &[TmdbVideo]) -> Option<&TmdbVideo> {
    videos.iter().find(|v| {
        v.video_type == TRAILER_TYPE
            && v.site == TRAILER_SITE
            && v.key.as_deref().is_some_and(|key| !key.is_empty())
    })
}

/// Resolves a videos response into a trailer reference.
///
/// A response without results resolves to [`Trailer::NotFound`].
#[must_use]
pub fn resolve_trailer(response: &TmdbVideosResponse, links: &MediaLinks) -> Trailer {
    response
        .results
        .as_deref()
        .and_then(find_trailer)
        .and_then(|video| video.key.as_deref())
        .map_or(Trailer::NotFound, |key| {
            Trailer::Playable(links.trailer_url(key))
        })
}

/// Whole UI state of the movie browser.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    links: MediaLinks,
    query: String,
    movies: Vec<Movie>,
    loading: bool,
    error: Option<String>,
    selection: Option<Movie>,
    list_generation: u64,
    selection_generation: u64,
    list_revision: u64,
}

impl BrowserState {
    /// Creates an empty state.
    #[must_use]
    pub const fn new(links: MediaLinks) -> Self {
        Self {
            links,
            query: String::new(),
            movies: Vec::new(),
            loading: false,
            error: None,
            selection: None,
            list_generation: 0,
            selection_generation: 0,
            list_revision: 0,
        }
    }

    /// Current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Displayed movies, in server order.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Whether the latest list request is still pending.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error message, if the last settled list request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Selected movie, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<&Movie> {
        self.selection.as_ref()
    }

    /// Incremented each time the movie list is replaced.
    #[must_use]
    pub const fn list_revision(&self) -> u64 {
        self.list_revision
    }

    /// Links used to build poster and trailer URLs.
    #[must_use]
    pub const fn links(&self) -> &MediaLinks {
        &self.links
    }

    /// Starts the catalog request issued on mount.
    pub fn begin_catalog(&mut self) -> ListRequest {
        self.begin_list(ListTarget::Popular)
    }

    /// Stores the new query and starts the matching list request.
    ///
    /// An empty query reloads the catalog.
    pub fn on_query_changed(&mut self, query: impl Into<String>) -> ListRequest {
        self.query = query.into();
        let target = if self.query.is_empty() {
            ListTarget::Popular
        } else {
            ListTarget::Search(self.query.clone())
        };
        self.begin_list(target)
    }

    fn begin_list(&mut self, target: ListTarget) -> ListRequest {
        self.list_generation = self.list_generation.wrapping_add(1);
        self.loading = true;
        ListRequest {
            generation: self.list_generation,
            target,
        }
    }

    /// Applies a list outcome. Returns `false` if the ticket is stale.
    ///
    /// Non-empty results replace the list and clear the error. Missing or
    /// empty results and failures set the error and keep the list as is.
    pub fn settle_list(&mut self, generation: u64, outcome: ListOutcome) -> bool {
        if generation != self.list_generation {
            tracing::debug!(
                generation,
                latest = self.list_generation,
                "Dropping stale movie list response"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(response) => match response.results {
                Some(results) if !results.is_empty() => {
                    self.movies = results.into_iter().map(Movie::from).collect();
                    self.error = None;
                    self.list_revision = self.list_revision.wrapping_add(1);
                }
                _ => self.error = Some(String::from(NO_MOVIES_FOUND)),
            },
            Err(err) => {
                let failure = FetchFailure::classify(&err);
                tracing::warn!(error = %err, ?failure, "Movie list request failed");
                self.error = Some(failure.to_string());
            }
        }
        true
    }

    /// Selects a movie and starts its trailer lookup.
    ///
    /// The selection is a copy: resolving its trailer never touches the list.
    pub fn select(&mut self, movie: Movie) -> TrailerRequest {
        self.selection_generation = self.selection_generation.wrapping_add(1);
        let movie_id = movie.id;
        self.selection = Some(Movie {
            trailer: None,
            ..movie
        });
        TrailerRequest {
            generation: self.selection_generation,
            movie_id,
        }
    }

    /// Applies a trailer lookup outcome. Returns `false` if the ticket is stale.
    ///
    /// Failures are logged only; the trailer stays unresolved and the list
    /// error message is left alone.
    pub fn settle_trailer(&mut self, generation: u64, outcome: TrailerOutcome) -> bool {
        if generation != self.selection_generation {
            tracing::debug!(
                generation,
                latest = self.selection_generation,
                "Dropping stale trailer response"
            );
            return false;
        }
        let Some(selected) = self.selection.as_mut() else {
            return false;
        };

        match outcome {
            Ok(response) => {
                selected.trailer = Some(resolve_trailer(&response, &self.links));
            }
            Err(err) => {
                tracing::warn!(movie_id = selected.id, error = %err, "Error fetching trailer");
            }
        }
        true
    }

    /// Dismisses the selection, discarding its trailer.
    pub fn dismiss(&mut self) {
        self.selection_generation = self.selection_generation.wrapping_add(1);
        self.selection = None;
    }
}
