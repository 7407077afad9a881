//! Moderate command
//!
//! Apply a moderation status to a batch of comments.

use anyhow::{Context, Result};
use clap::Args;
use tubemod_core::config::Config;
use tubemod_core::{CommentId, ModerationStatus};

use super::{open_session, spinner};

/// Arguments for the moderate command
#[derive(Debug, Args)]
pub struct ModerateArgs {
    /// Video the comments belong to
    pub video_id: String,

    /// Comment IDs to moderate
    #[arg(required = true)]
    pub comment_ids: Vec<String>,

    /// Target status: rejected, heldForReview or published (defaults to review.default_status)
    #[arg(long, short)]
    pub status: Option<ModerationStatus>,

    /// Also ban the comment authors
    #[arg(long)]
    pub ban: bool,

    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,
}

/// Execute the moderate command
pub async fn execute(args: ModerateArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let status = args.status.unwrap_or(config.review.default_status);
    let ids: Vec<CommentId> = args.comment_ids.iter().map(|id| CommentId::from(id.as_str())).collect();

    if needs_confirmation(config, status, args.ban) && !args.yes {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(confirm_prompt(ids.len(), status, args.ban))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Moderation cancelled.");
            return Ok(());
        }
    }

    let session = open_session(config, &args.video_id, None)?;
    let bar = spinner(format!("Marking {} comments as {}...", ids.len(), status));
    let result = session.moderate(ids, status, args.ban).await;
    bar.finish_and_clear();
    let response = result.context("Moderation failed")?;

    println!(
        "{} {} comments marked {}{}",
        "✓".green(),
        response.updated,
        status.to_string().bold(),
        if args.ban { ", authors banned" } else { "" }
    );

    Ok(())
}

/// Reject-type commands ask first unless disabled in config
pub(crate) fn needs_confirmation(config: &Config, status: ModerationStatus, ban_author: bool) -> bool {
    config.review.confirm_reject && (status.is_destructive() || ban_author)
}

/// Confirmation question naming the status actually being applied
pub(crate) fn confirm_prompt(count: usize, status: ModerationStatus, ban_author: bool) -> String {
    let noun = if count == 1 { "comment" } else { "comments" };
    let action = match status {
        ModerationStatus::Rejected => format!("Reject {} {}", count, noun),
        other => format!("Mark {} {} as {}", count, noun, other),
    };
    if ban_author {
        format!("{} and ban their authors?", action)
    } else {
        format!("{}?", action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_confirmation() {
        let mut config = Config::default();
        assert!(needs_confirmation(&config, ModerationStatus::Rejected, false));
        assert!(needs_confirmation(&config, ModerationStatus::Published, true));
        assert!(!needs_confirmation(&config, ModerationStatus::Published, false));

        config.review.confirm_reject = false;
        assert!(!needs_confirmation(&config, ModerationStatus::Rejected, true));
    }

    #[test]
    fn test_confirm_prompt_names_status() {
        assert_eq!(
            confirm_prompt(2, ModerationStatus::Published, true),
            "Mark 2 comments as published and ban their authors?"
        );
        assert_eq!(
            confirm_prompt(3, ModerationStatus::HeldForReview, true),
            "Mark 3 comments as heldForReview and ban their authors?"
        );
        assert_eq!(confirm_prompt(1, ModerationStatus::Rejected, false), "Reject 1 comment?");
        assert_eq!(
            confirm_prompt(4, ModerationStatus::Rejected, true),
            "Reject 4 comments and ban their authors?"
        );
    }
}
