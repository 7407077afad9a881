//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod classify;
pub mod comments;
pub mod config;
pub mod doctor;
pub mod logout;
pub mod moderate;
pub mod review;
pub mod videos;
pub mod whoami;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tubemod_core::config::Config;
use tubemod_core::session::{FetchOutcome, ModerationSession};
use tubemod_core::{TubemodError, VideoId};
use tubemod_store::{HttpClassifier, HttpStore};

/// tubemod - YouTube comment moderation console
#[derive(Debug, Parser)]
#[command(name = "tubemod")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the signed-in channel owner
    Whoami(whoami::WhoamiArgs),

    /// End the store session and forget the saved cookie
    Logout(logout::LogoutArgs),

    /// List or refresh the channel's videos
    #[command(subcommand)]
    Videos(videos::VideosCommand),

    /// Show one page of a video's comments
    Comments(comments::CommentsArgs),

    /// Run the classifier and show what it flags
    Classify(classify::ClassifyArgs),

    /// Apply a moderation status to comments
    Moderate(moderate::ModerateArgs),

    /// Review a video's comments interactively
    Review(review::ReviewArgs),

    /// Diagnose configuration and connectivity
    Doctor(doctor::DoctorArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.as_deref();

    let command = match cli.command {
        // Config commands work without a runtime or a reachable store
        Commands::Config(cmd) => return config::execute(cmd, config_path),
        command => command,
    };

    let config = load_config(config_path)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        match command {
            Commands::Whoami(args) => whoami::execute(args, &config).await,
            Commands::Logout(args) => logout::execute(args, &config, config_path).await,
            Commands::Videos(cmd) => videos::execute(cmd, &config).await,
            Commands::Comments(args) => comments::execute(args, &config).await,
            Commands::Classify(args) => classify::execute(args, &config).await,
            Commands::Moderate(args) => moderate::execute(args, &config).await,
            Commands::Review(args) => review::execute(args, &config).await,
            Commands::Doctor(args) => doctor::execute(args, &config).await,
            Commands::Config(_) => Ok(()),
        }
    })
}

/// Process exit code for a failed command; 2 means the session must be renewed
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let unauthenticated = err
        .chain()
        .filter_map(|e| e.downcast_ref::<TubemodError>())
        .any(TubemodError::is_unauthenticated);
    if unauthenticated {
        2
    } else {
        1
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::discover(path).context("Failed to load configuration")?;
    tracing::debug!(
        store = %config.store.base_url,
        classifier = %config.classifier.base_url,
        page_size = config.review.page_size,
        "Configuration loaded"
    );
    Ok(config)
}

pub(crate) fn connect_store(config: &Config) -> anyhow::Result<Arc<HttpStore>> {
    Ok(Arc::new(HttpStore::new(&config.store)?))
}

pub(crate) fn connect_classifier(config: &Config) -> anyhow::Result<Arc<HttpClassifier>> {
    Ok(Arc::new(HttpClassifier::new(
        &config.classifier,
        config.store.session_cookie.as_deref(),
        Duration::from_secs(config.store.timeout_secs),
    )?))
}

/// Build a moderation session for `video_id` over the configured collaborators
pub(crate) fn open_session(
    config: &Config,
    video_id: &str,
    page_size: Option<u32>,
) -> anyhow::Result<ModerationSession> {
    let session = ModerationSession::new(
        VideoId::from_string(video_id.trim()),
        connect_store(config)?,
        connect_classifier(config)?,
        page_size.unwrap_or(config.review.page_size),
    )?;
    Ok(session)
}

/// Turn a recorded fetch failure into an error for one-shot commands
pub(crate) fn ensure_fetched(session: &ModerationSession, outcome: FetchOutcome) -> anyhow::Result<()> {
    if outcome == FetchOutcome::Failed {
        let message = session
            .snapshot()
            .last_error
            .map(|e| e.message)
            .unwrap_or_else(|| "failed to fetch comments".to_string());
        anyhow::bail!(message);
    }
    Ok(())
}

pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
