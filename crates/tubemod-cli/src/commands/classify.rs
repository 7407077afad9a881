//! Classify command
//!
//! Run the gambling-promotion classifier over a video's comments.

use anyhow::Result;
use clap::Args;
use tubemod_core::config::Config;
use tubemod_core::session::{FetchOutcome, FetchStatus};

use super::comments::{print_comments, print_footer, print_header};
use super::{ensure_fetched, open_session, spinner};

/// Arguments for the classify command
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Video ID
    pub video_id: String,

    /// Only report predictions at or above this confidence
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Output flagged comment IDs as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the classify command
pub async fn execute(args: ClassifyArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let session = open_session(config, &args.video_id, None)?
        .with_min_confidence(args.min_confidence);

    let bar = spinner("Classifying comments...");
    let result = session.run_classification().await;
    bar.finish_and_clear();
    let flagged = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&flagged)?);
        return Ok(());
    }

    if flagged.is_empty() {
        println!("{} No gambling promotion found.", "✓".green());
        return Ok(());
    }

    println!(
        "{} {} comments flagged:",
        "⚠".yellow(),
        flagged.len().to_string().yellow()
    );
    for id in &flagged {
        println!("  - {}", id);
    }
    println!();

    // run_classification refetched the current page already
    let state = session.snapshot();
    if state.fetch_status == FetchStatus::Error {
        ensure_fetched(&session, FetchOutcome::Failed)?;
    }
    print_header(&state);
    print_comments(&state);
    print_footer(&state);
    println!();
    println!(
        "Use '{}' to act on them",
        format!("tubemod moderate {} <IDS>... --status rejected", args.video_id).cyan()
    );

    Ok(())
}
