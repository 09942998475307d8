//! `TmdbError` - failures returned by the TMDB client.

use reqwest::StatusCode;

/// Error returned by TMDB API operations.
///
/// Variants are split by whether the server produced a response,
/// so callers can tell connectivity problems from server-side ones.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbError {
    /// The request URL could not be built from the base URL.
    #[error("failed to join URL path: {path}")]
    Url {
        /// Endpoint path relative to the base URL.
        path: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The HTTP request could not be built.
    #[error("failed to build request: {path}")]
    Request {
        /// Endpoint path relative to the base URL.
        path: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The request was sent but no response arrived.
    #[error("request failed: {path}")]
    Transport {
        /// Endpoint path relative to the base URL.
        path: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("TMDB API error (HTTP {status}): {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// TMDB `status_message`, or the raw body when it is not a TMDB error.
        message: String,
    },

    /// The response body could not be read.
    #[error("failed to read response body: {path}")]
    Body {
        /// Endpoint path relative to the base URL.
        path: String,
        /// HTTP status code of the response.
        status: StatusCode,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON.
    #[error("failed to decode JSON response: {path}")]
    Decode {
        /// Endpoint path relative to the base URL.
        path: String,
        /// HTTP status code of the response.
        status: StatusCode,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl TmdbError {
    /// Returns the HTTP status when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Body { status, .. } | Self::Decode { status, .. } => {
                Some(*status)
            }
            Self::Url { .. } | Self::Request { .. } | Self::Transport { .. } => None,
        }
    }

    /// Returns `true` if the server produced a response.
    #[must_use]
    pub const fn has_response(&self) -> bool {
        self.status().is_some()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_status_error_exposes_status() {
        // Arrange
        let err = TmdbError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: String::from("down"),
        };

        // Act & Assert
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(err.has_response());
        assert_eq!(err.to_string(), "TMDB API error (HTTP 503 Service Unavailable): down");
    }

    #[test]
    fn test_decode_error_has_response() {
        // Arrange
        let source = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = TmdbError::Decode {
            path: String::from("movie/popular"),
            status: StatusCode::OK,
            source,
        };

        // Act & Assert
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert!(err.has_response());
    }

    #[test]
    fn test_url_error_has_no_response() {
        // Arrange
        let source = url::Url::parse("not a url").unwrap_err();
        let err = TmdbError::Url {
            path: String::from("movie/popular"),
            source,
        };

        // Act & Assert
        assert!(err.status().is_none());
        assert!(!err.has_response());
    }
}
