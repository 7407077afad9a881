//! Comments command
//!
//! Show one page of a video's comments.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tubemod_core::comment::Comment;
use tubemod_core::config::Config;
use tubemod_core::session::SessionState;
use tubemod_core::ModerationStatus;

use super::{ensure_fetched, open_session};

const PREVIEW_WIDTH: usize = 80;

/// Arguments for the comments command
#[derive(Debug, Args)]
pub struct CommentsArgs {
    /// Video ID
    pub video_id: String,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Comments per page (defaults to review.page_size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Only show comments the classifier flagged
    #[arg(long)]
    pub flagged: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the comments command
pub async fn execute(args: CommentsArgs, config: &Config) -> Result<()> {
    let session = open_session(config, &args.video_id, args.page_size)?;
    let outcome = session.set_page(args.page).await?;
    ensure_fetched(&session, outcome)?;

    let mut state = session.snapshot();
    if args.flagged {
        state.comments.retain(Comment::is_flagged);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state.comments)?);
        return Ok(());
    }

    print_header(&state);
    if state.comments.is_empty() {
        println!("No comments on this page.");
    } else {
        print_comments(&state);
    }
    print_footer(&state);

    Ok(())
}

pub(crate) fn print_header(state: &SessionState) {
    match &state.video {
        Some(video) => println!(
            "{} {}",
            video.title.bold().underline(),
            format!("({})", video.video_id).dimmed()
        ),
        None => println!("{}", state.video_id.to_string().bold().underline()),
    }
    println!();
}

/// Numbered listing with selection marks and classifier verdicts
pub(crate) fn print_comments(state: &SessionState) {
    for (index, comment) in state.comments.iter().enumerate() {
        let mark = if state.is_selected(&comment.comment_id) {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        let verdict = if comment.is_flagged() {
            format!("⚠ judi {:.2}", comment.confidence).yellow()
        } else {
            "".normal()
        };
        println!(
            "{:>3}. {} {} {} {} {}",
            index + 1,
            mark,
            comment.comment_id.to_string().dimmed(),
            status_label(comment.moderation_status),
            comment.author_display_name.cyan(),
            verdict
        );
        println!("       {}", comment.preview(PREVIEW_WIDTH));
    }
}

pub(crate) fn print_footer(state: &SessionState) {
    println!();
    println!(
        "Page {} of {} ({} comments){}",
        state.pagination.page,
        state.total_pages().max(1),
        state.pagination.total,
        if state.pagination.has_next { ", more available" } else { "" }
    );
    if state.selected_count() > 0 {
        println!("{} selected", state.selected_count().to_string().green());
    }
}

fn status_label(status: ModerationStatus) -> colored::ColoredString {
    match status {
        ModerationStatus::Published => "published".green(),
        ModerationStatus::HeldForReview => "held".yellow(),
        ModerationStatus::Rejected => "rejected".red(),
    }
}
