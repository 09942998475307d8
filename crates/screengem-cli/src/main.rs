//! screengem - terminal movie browser backed by TMDB.

/// Application configuration (TOML).
mod config;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path, resolve_log_path};
use screengem_api::tmdb::TmdbClient;
use screengem_tui::viewer::run_viewer;
use screengem_tui::{Browser, Movie, Trailer};

/// Environment variable holding the TMDB API key.
const API_KEY_ENV: &str = "TMDB_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Write logs to this file instead of stdout.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Subcommand to run (default: browse).
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies interactively.
    Browse,
    /// List popular movies.
    Popular,
    /// Search movies by title (an empty query lists popular movies).
    Search(SearchArgs),
    /// Look up the trailer of a movie.
    Trailer(TrailerArgs),
    /// Manage the config file.
    Config(ConfigCommand),
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `trailer` subcommand.
#[derive(clap::Args)]
struct TrailerArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with the given API key.
    Init(ConfigInitArgs),
    /// Show the resolved config.
    Show,
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// TMDB API key (v3).
    #[arg(long, required = true)]
    api_key: String,
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Installs the global subscriber. Logs go to `log_file` when set, stdout otherwise.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, ansi) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stdout), true),
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);

    #[cfg(not(feature = "otel"))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    Ok(())
}

/// Masks all but the first four characters of a secret.
fn mask_secret(secret: &str) -> String {
    const VISIBLE: usize = 4;
    if secret.chars().count() <= VISIBLE {
        return String::from("****");
    }
    let prefix: String = secret.chars().take(VISIBLE).collect();
    format!("{prefix}****")
}

/// Builds a TMDB client from config and environment.
///
/// # Errors
///
/// Returns an error if no API key is configured, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_key = config
        .resolve_api_key(std::env::var(API_KEY_ENV).ok())
        .with_context(|| {
            format!(
                "TMDB API key is required: set {API_KEY_ENV} or run `screengem config init --api-key <KEY>`"
            )
        })?;

    // Url::join drops the last segment unless the base ends with '/'
    let mut base_url = config.tmdb.base_url.clone();
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    let base_url = Url::parse(&base_url)
        .with_context(|| format!("invalid TMDB base URL: {}", config.tmdb.base_url))?;

    TmdbClient::builder()
        .base_url(base_url)
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Builds a terminal-less browser from the config file.
fn build_browser(dir: Option<&Path>) -> Result<Browser<TmdbClient>> {
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let client = build_tmdb_client(&config)?;
    Ok(Browser::new(
        client,
        config.media.links(),
        config.tmdb.language,
    ))
}

/// Logs the movie list, or fails with the user-facing error message.
fn report_list(browser: &Browser<TmdbClient>) -> Result<()> {
    let state = browser.state();
    if let Some(message) = state.error() {
        anyhow::bail!("{message}");
    }

    tracing::info!("Total results: {}", state.movies().len());
    tracing::info!("ID\tTitle\t\t\tReleased");
    for movie in state.movies() {
        tracing::info!(
            "{}\t{}\t{}",
            movie.id,
            movie.title,
            movie.release_date.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the list cannot be loaded.
#[instrument(skip_all)]
async fn run_popular(dir: Option<&Path>) -> Result<()> {
    let mut browser = build_browser(dir)?;
    browser.load_catalog().await;
    report_list(&browser)
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the search yields no list.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&Path>) -> Result<()> {
    let mut browser = build_browser(dir)?;
    browser.search(&args.query).await;
    report_list(&browser)
}

/// Runs the `trailer` subcommand.
///
/// Lookup failures are only logged as warnings.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
async fn run_trailer(args: &TrailerArgs, dir: Option<&Path>) -> Result<()> {
    let mut browser = build_browser(dir)?;
    let movie = Movie {
        id: args.id,
        title: String::new(),
        poster_path: None,
        release_date: None,
        overview: None,
        trailer: None,
    };
    browser.select(movie).await;

    match browser.state().selection().and_then(|m| m.trailer.as_ref()) {
        Some(Trailer::Playable(url)) => tracing::info!("Trailer: {url}"),
        Some(Trailer::NotFound) => tracing::info!("Trailer: none found"),
        None => {}
    }
    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the terminal fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&Path>) -> Result<()> {
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let client = build_tmdb_client(&config)?;
    run_viewer(
        Arc::new(client),
        config.media.links(),
        config.tmdb.language.clone(),
    )
    .await
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists without `--force` or cannot be written.
#[instrument(skip_all)]
fn run_config_init(args: &ConfigInitArgs, dir: Option<&Path>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() && !args.force {
        anyhow::bail!(
            "config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    let mut config = AppConfig::load(&path)?;
    config.tmdb.api_key = Some(args.api_key.clone());
    config.save(&path)?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&Path>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
    let api_key = match (&env_key, &config.tmdb.api_key) {
        (Some(key), _) => format!("{} (from {API_KEY_ENV})", mask_secret(key)),
        (None, Some(key)) if !key.is_empty() => mask_secret(key),
        _ => String::from("(not set)"),
    };

    tracing::info!("Config file: {}", path.display());
    tracing::info!("tmdb.api_key: {api_key}");
    tracing::info!("tmdb.base_url: {}", config.tmdb.base_url);
    tracing::info!("tmdb.language: {}", config.tmdb.language);
    tracing::info!("media.image_base_url: {}", config.media.image_base_url);
    tracing::info!("media.trailer_base_url: {}", config.media.trailer_base_url);
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    let command = cli.command.unwrap_or(Commands::Browse);

    if let Commands::Completions(args) = &command {
        clap_complete::generate(
            args.shell,
            &mut Cli::command(),
            env!("CARGO_BIN_NAME"),
            &mut io::stdout(),
        );
        return Ok(());
    }

    // The browser owns the screen, so it always logs to a file
    let log_file = match (cli.log_file, &command) {
        (Some(path), _) => Some(path),
        (None, Commands::Browse) => Some(resolve_log_path(dir)?),
        (None, _) => None,
    };
    init_tracing(log_file.as_deref())?;

    match command {
        Commands::Browse => run_browse(dir).await,
        Commands::Popular => run_popular(dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Trailer(args) => run_trailer(&args, dir).await,
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Init(args) => run_config_init(&args, dir),
            ConfigSubcommands::Show => run_config_show(dir),
        },
        Commands::Completions(_) => Ok(()),
    }
}
