//! Application configuration module.
//!
//! Manages the TOML config file holding the TMDB credentials, the API
//! endpoint, and the media URL bases.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{resolve_config_path, resolve_log_path};
