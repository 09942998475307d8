//! `FetchFailure` - user-facing classification of list request failures.

use screengem_api::tmdb::TmdbError;

/// Lowest HTTP status treated as a server-side failure.
const SERVER_ERROR_MIN: u16 = 500;

/// Failure bucket shown to the user when a movie list request fails.
///
/// Every failure maps to exactly one bucket. Malformed JSON, client
/// errors (4xx), and body read failures all fall into `Unexpected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    /// No response object was received.
    #[error("Network error: Please check your connection.")]
    Network,
    /// The server answered with a status of 500 or above.
    #[error("Server error: Please try again later.")]
    Server,
    /// Any other failure.
    #[error("An unexpected error occurred.")]
    Unexpected,
}

impl FetchFailure {
    /// Classifies a client error by whether and how the server responded.
    #[must_use]
    pub fn classify(err: &TmdbError) -> Self {
        match err.status() {
            None => Self::Network,
            Some(status) if status.as_u16() >= SERVER_ERROR_MIN => Self::Server,
            Some(_) => Self::Unexpected,
        }
    }
}

impl From<&TmdbError> for FetchFailure {
    fn from(err: &TmdbError) -> Self {
        Self::classify(err)
    }
}
