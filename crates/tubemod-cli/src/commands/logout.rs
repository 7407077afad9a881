//! Logout command
//!
//! End the store session and forget the saved cookie.

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use tubemod_core::config::Config;

use super::config::active_path;
use super::connect_store;

/// Arguments for the logout command
#[derive(Debug, Args)]
pub struct LogoutArgs {
    /// Leave store.session_cookie in the config file
    #[arg(long)]
    pub keep_cookie: bool,
}

/// Execute the logout command
pub async fn execute(args: LogoutArgs, config: &Config, explicit: Option<&Path>) -> Result<()> {
    use colored::Colorize;

    if config.store.session_cookie.is_none() {
        println!("{} No session cookie configured, nothing to log out", "⚠".yellow());
        return Ok(());
    }

    let store = connect_store(config)?;
    let response = store.logout().await.context("Logout failed")?;
    println!(
        "{} {}",
        "✓".green(),
        response.message.as_deref().unwrap_or("Logged out")
    );

    if args.keep_cookie {
        return Ok(());
    }
    if let Some(path) = active_path(explicit) {
        if forget_session(&path)? {
            println!("  Removed the session cookie from {}", path.display());
        }
    }
    if std::env::var_os("TUBEMOD_SESSION").is_some() {
        println!("  {}", "TUBEMOD_SESSION is still set in this shell".dimmed());
    }

    Ok(())
}

/// Drop `store.session_cookie` from the file at `path`. Returns true if one was removed.
pub(crate) fn forget_session(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let mut config = Config::load(path)?;
    if config.store.session_cookie.take().is_none() {
        return Ok(false);
    }
    config
        .save(path)
        .with_context(|| format!("Failed to update {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Cleared saved session cookie");
    Ok(true)
}
