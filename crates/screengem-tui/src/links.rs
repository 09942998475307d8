//! `MediaLinks` - poster and trailer URL construction.

/// Default image CDN base (w500 poster size).
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Default trailer watch base.
pub const DEFAULT_TRAILER_BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// Base URLs for rendering posters and playing trailers.
///
/// Both URLs are plain concatenation prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLinks {
    image_base_url: String,
    trailer_base_url: String,
}

impl MediaLinks {
    /// Creates links from explicit bases.
    pub fn new(image_base_url: impl Into<String>, trailer_base_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into(),
            trailer_base_url: trailer_base_url.into(),
        }
    }

    /// Builds the poster URL, or `None` when the path is absent or empty.
    #[must_use]
    pub fn poster_url(&self, poster_path: Option<&str>) -> Option<String> {
        poster_path
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{path}", self.image_base_url))
    }

    /// Builds the playable URL for a video key.
    #[must_use]
    pub fn trailer_url(&self, key: &str) -> String {
        format!("{}{key}", self.trailer_base_url)
    }
}

impl Default for MediaLinks {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL, DEFAULT_TRAILER_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url() {
        // Arrange
        let links = MediaLinks::default();

        // Act
        let url = links.poster_url(Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"));

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
        );
        assert!(links.poster_url(None).is_none());
    }

    #[test]
    fn test_empty_poster_path_has_no_url() {
        // Arrange
        let links = MediaLinks::default();

        // Act & Assert
        assert!(links.poster_url(Some("")).is_none());
    }

    #[test]
    fn test_trailer_url() {
        // Arrange
        let links = MediaLinks::new("http://img.test", "http://watch.test/?v=");

        // Act & Assert
        assert_eq!(links.trailer_url("abc123"), "http://watch.test/?v=abc123");
    }
}
