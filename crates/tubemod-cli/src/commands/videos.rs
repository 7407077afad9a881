//! Videos command
//!
//! List the channel's stored videos, or pull the latest uploads.

use anyhow::{Context, Result};
use clap::Subcommand;
use tubemod_core::config::Config;
use tubemod_store::HttpStore;

use super::{connect_store, spinner};

/// Videos subcommands
#[derive(Debug, Subcommand)]
pub enum VideosCommand {
    /// List stored videos
    List {
        /// Uploads playlist (defaults to the signed-in channel's)
        #[arg(long)]
        playlist: Option<String>,

        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Videos per page
        #[arg(long, default_value = "10")]
        page_size: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pull the latest uploads and their comments into the store
    Refresh {
        /// Uploads playlist (defaults to the signed-in channel's)
        #[arg(long)]
        playlist: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the videos command
pub async fn execute(cmd: VideosCommand, config: &Config) -> Result<()> {
    let store = connect_store(config)?;

    match cmd {
        VideosCommand::List {
            playlist,
            page,
            page_size,
            json,
        } => {
            let playlist = resolve_playlist(&store, playlist).await?;
            list_videos(&store, &playlist, page, page_size, json).await
        }
        VideosCommand::Refresh { playlist, json } => {
            let playlist = resolve_playlist(&store, playlist).await?;
            refresh_videos(&store, &playlist, json).await
        }
    }
}

async fn resolve_playlist(store: &HttpStore, explicit: Option<String>) -> Result<String> {
    if let Some(playlist) = explicit {
        return Ok(playlist);
    }
    let user = store
        .current_user()
        .await
        .context("Failed to load the signed-in user")?;
    user.playlist_id
        .filter(|p| !p.trim().is_empty())
        .context("The signed-in channel has no uploads playlist; pass --playlist")
}

async fn list_videos(
    store: &HttpStore,
    playlist: &str,
    page: u32,
    page_size: u32,
    as_json: bool,
) -> Result<()> {
    use colored::Colorize;

    let list = store.list_videos(playlist, page, page_size).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.items.is_empty() {
        println!("No videos found.");
        return Ok(());
    }

    let pagination = list.pagination();
    println!("{}", "Videos:".bold().underline());
    println!();
    for video in &list.items {
        let published = video
            .published_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  {}  {}",
            video.video_id.to_string().green(),
            published.dimmed(),
            video.title
        );
    }
    println!();
    println!(
        "Page {} of {} ({} videos)",
        pagination.page,
        pagination.total_pages().max(1),
        pagination.total
    );

    Ok(())
}

async fn refresh_videos(store: &HttpStore, playlist: &str, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let bar = spinner("Fetching latest videos...");
    let result = store.fetch_latest_videos(playlist).await;
    bar.finish_and_clear();
    let summaries = result?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No new videos.");
        return Ok(());
    }

    for summary in &summaries {
        let title = summary.title.as_deref().unwrap_or("(untitled)");
        match &summary.error {
            None => println!(
                "{} {} {} ({} new comments)",
                "✓".green(),
                summary.video_id.to_string().green(),
                title,
                summary.new_comment_count.unwrap_or(0)
            ),
            Some(error) => println!(
                "{} {} {}: {}",
                "✗".red(),
                summary.video_id,
                title,
                error.red()
            ),
        }
    }

    Ok(())
}
