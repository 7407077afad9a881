//! Whoami command
//!
//! Show the channel owner the configured session belongs to.

use anyhow::{Context, Result};
use clap::Args;
use tubemod_core::config::Config;

use super::connect_store;

/// Arguments for the whoami command
#[derive(Debug, Args)]
pub struct WhoamiArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the whoami command
pub async fn execute(args: WhoamiArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let store = connect_store(config)?;
    let user = store
        .current_user()
        .await
        .context("Failed to load the signed-in user")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("{} Signed in as {}", "✓".green(), user.name.bold());
    println!("  Email:    {}", user.email);
    if let Some(channel) = &user.channel_id {
        println!("  Channel:  {}", channel);
    }
    if let Some(url) = &user.custom_url {
        println!("  URL:      {}", url.cyan());
    }
    match &user.playlist_id {
        Some(playlist) => println!("  Playlist: {}", playlist),
        None => println!("  Playlist: {}", "none".dimmed()),
    }

    Ok(())
}
