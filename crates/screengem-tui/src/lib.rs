//! Movie browser core and terminal UI for screengem.
//!
//! [`state::BrowserState`] holds the whole UI state and exposes one pure
//! transition per event. [`browser::Browser`] drives it against a
//! [`screengem_api::tmdb::TmdbApi`] implementation, and [`viewer`] renders
//! it with `ratatui` + `crossterm`.

/// Sequential controller over the state container.
pub mod browser;
/// Three-bucket classification of request failures.
pub mod failure;
/// Image and trailer URL construction.
pub mod links;
/// State container and transitions.
pub mod state;
/// Interactive terminal viewer.
pub mod viewer;

pub use browser::{Browser, fetch_list, fetch_trailer};
pub use failure::FetchFailure;
pub use links::MediaLinks;
pub use state::{BrowserState, ListRequest, ListTarget, Movie, Trailer, TrailerRequest};
