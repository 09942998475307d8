//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use screengem_api::tmdb::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use screengem_tui::MediaLinks;
use screengem_tui::links::{DEFAULT_IMAGE_BASE_URL, DEFAULT_TRAILER_BASE_URL};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB API settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Poster and trailer URL settings.
    #[serde(default)]
    pub media: MediaConfig,
}

/// TMDB API configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API key (v3). `TMDB_API_KEY` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Response language.
    #[serde(default = "default_language")]
    pub language: String,
}

/// Media URL configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaConfig {
    /// Image CDN base prepended to poster paths.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Watch URL base prepended to trailer keys.
    #[serde(default = "default_trailer_base_url")]
    pub trailer_base_url: String,
}

fn default_base_url() -> String {
    String::from(DEFAULT_BASE_URL)
}

fn default_language() -> String {
    String::from(DEFAULT_LANGUAGE)
}

fn default_image_base_url() -> String {
    String::from(DEFAULT_IMAGE_BASE_URL)
}

fn default_trailer_base_url() -> String {
    String::from(DEFAULT_TRAILER_BASE_URL)
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            language: default_language(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            image_base_url: default_image_base_url(),
            trailer_base_url: default_trailer_base_url(),
        }
    }
}

impl MediaConfig {
    /// Builds the link helper used by the browser.
    #[must_use]
    pub fn links(&self) -> MediaLinks {
        MediaLinks::new(self.image_base_url.as_str(), self.trailer_base_url.as_str())
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Picks the API key: a non-empty `env_key` wins over the file.
    #[must_use]
    pub fn resolve_api_key(&self, env_key: Option<String>) -> Option<String> {
        env_key
            .filter(|key| !key.is_empty())
            .or_else(|| self.tmdb.api_key.clone().filter(|key| !key.is_empty()))
    }
}
