//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints
//! and retrieves popular lists, search results, and video listings.

mod api;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{BuildError, DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::TmdbError;
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DEFAULT_LANGUAGE, PopularMoviesParams, SearchMovieParams, TmdbErrorResponse, TmdbMovie,
    TmdbMovieListResponse, TmdbVideo, TmdbVideosResponse,
};
