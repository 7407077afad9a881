//! Review command
//!
//! Interactive moderation console for one video.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use console::Term;
use tubemod_core::config::Config;
use tubemod_core::session::{FetchOutcome, ModerationSession, SessionState};
use tubemod_core::{CommentId, ModerationStatus, TubemodError};

use super::comments::{print_comments, print_footer, print_header};
use super::moderate::{confirm_prompt, needs_confirmation};
use super::{open_session, spinner};

/// Arguments for the review command
#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Video ID
    pub video_id: String,

    /// Comments per page (defaults to review.page_size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Only select classifier predictions at or above this confidence
    #[arg(long)]
    pub min_confidence: Option<f64>,
}

/// One console instruction
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Next,
    Prev,
    Goto(u32),
    Toggle(Vec<String>),
    SelectAll,
    Clear,
    Classify,
    /// No status means `review.default_status`
    Act {
        status: Option<ModerationStatus>,
        ban_author: bool,
    },
    RejectOne(String),
    Refresh,
    Help,
    Quit,
}

const HELP: &str = "\
  n            next page
  p            previous page
  g <page>     go to page
  t <row|id>.. toggle selection
  a            select every comment on this page
  c            clear selection
  m            run the classifier and select what it flags
  d [status] [ban]
               act on selected (default: review.default_status), ban authors with 'ban'
  x <row|id>   reject one comment
  r            refresh
  q            quit";

fn parse_action(line: &str) -> std::result::Result<Action, String> {
    let mut parts = line.split_whitespace();
    let Some(key) = parts.next() else {
        return Ok(Action::Refresh);
    };
    let rest: Vec<String> = parts.map(str::to_string).collect();

    match key {
        "n" => Ok(Action::Next),
        "p" => Ok(Action::Prev),
        "g" => match rest.first().map(|n| n.parse::<u32>()) {
            Some(Ok(page)) => Ok(Action::Goto(page)),
            _ => Err("usage: g <page>".to_string()),
        },
        "t" if rest.is_empty() => Err("usage: t <row|id>...".to_string()),
        "t" => Ok(Action::Toggle(rest)),
        "a" => Ok(Action::SelectAll),
        "c" => Ok(Action::Clear),
        "m" => Ok(Action::Classify),
        "d" => {
            let mut status = None;
            let mut ban_author = false;
            for token in &rest {
                if token == "ban" {
                    ban_author = true;
                } else {
                    status = Some(token.parse().map_err(|e: TubemodError| e.to_string())?);
                }
            }
            Ok(Action::Act { status, ban_author })
        }
        "x" => match rest.as_slice() {
            [target] => Ok(Action::RejectOne(target.clone())),
            _ => Err("usage: x <row|id>".to_string()),
        },
        "r" => Ok(Action::Refresh),
        "h" | "?" => Ok(Action::Help),
        "q" | "quit" | "exit" => Ok(Action::Quit),
        other => Err(format!("unknown command '{}', press h for help", other)),
    }
}

/// Status for `d`: the one typed, else the configured default
fn act_status(status: Option<ModerationStatus>, config: &Config) -> ModerationStatus {
    status.unwrap_or(config.review.default_status)
}

/// Map row numbers of the displayed page to comment ids; anything else is taken as an id
fn resolve_targets(state: &SessionState, targets: &[String]) -> Vec<CommentId> {
    targets
        .iter()
        .map(|target| {
            target
                .parse::<usize>()
                .ok()
                .and_then(|row| row.checked_sub(1))
                .and_then(|index| state.comments.get(index))
                .map(|c| c.comment_id.clone())
                .unwrap_or_else(|| CommentId::from(target.as_str()))
        })
        .collect()
}

/// Execute the review command
pub async fn execute(args: ReviewArgs, config: &Config) -> Result<()> {
    let session = open_session(config, &args.video_id, args.page_size)?
        .with_min_confidence(args.min_confidence);
    let term = Term::stdout();

    let mut notice = outcome_notice(session.open().await)?;

    loop {
        render(&term, &session.snapshot(), notice.take());

        let line: String = dialoguer::Input::<String>::new()
            .with_prompt("tubemod")
            .allow_empty(true)
            .interact_text()?;

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(message) => {
                notice = Some(message.yellow().to_string());
                continue;
            }
        };

        notice = match action {
            Action::Quit => break,
            Action::Help => Some(HELP.to_string()),
            Action::Next => match session.next_page().await {
                Ok(None) => Some("Already on the last page".dimmed().to_string()),
                Ok(Some(outcome)) => outcome_notice(Ok(outcome))?,
                Err(err) => outcome_notice(Err(err))?,
            },
            Action::Prev => match session.prev_page().await {
                Ok(None) => Some("Already on the first page".dimmed().to_string()),
                Ok(Some(outcome)) => outcome_notice(Ok(outcome))?,
                Err(err) => outcome_notice(Err(err))?,
            },
            Action::Goto(page) => outcome_notice(session.set_page(page).await)?,
            Action::Refresh => outcome_notice(session.refetch().await)?,
            Action::Toggle(targets) => {
                let state = session.snapshot();
                for id in resolve_targets(&state, &targets) {
                    let checked = !state.is_selected(&id);
                    session.toggle(id, checked);
                }
                None
            }
            Action::SelectAll => {
                session.select_all_on_page();
                None
            }
            Action::Clear => {
                session.clear_selection();
                None
            }
            Action::Classify => classify(&session).await?,
            Action::Act { status, ban_author } => {
                let status = act_status(status, config);
                moderate_selected(&session, config, status, ban_author).await?
            }
            Action::RejectOne(target) => {
                let state = session.snapshot();
                let targets = resolve_targets(&state, std::slice::from_ref(&target));
                reject_one(&session, config, targets.into_iter().next()).await?
            }
        };
    }

    Ok(())
}

fn render(term: &Term, state: &SessionState, notice: Option<String>) {
    let _ = term.clear_screen();
    print_header(state);
    if state.comments.is_empty() {
        println!("{}", "No comments on this page.".dimmed());
    } else {
        print_comments(state);
    }
    print_footer(state);

    if state.is_loading() {
        println!("{}", "Loading...".cyan());
    }
    if let Some(error) = &state.last_error {
        println!("{} {}: {}", "✗".red(), error.lane, error.message.red());
    }
    if let Some(notice) = notice {
        println!("{}", notice);
    }
    println!("{}", "h for help".dimmed());
}

/// Operator-facing line for a finished operation.
///
/// Lost sessions end the console; other failures are already recorded in
/// the session state and shown on the next render.
fn outcome_notice(result: tubemod_core::Result<FetchOutcome>) -> Result<Option<String>> {
    match result {
        Ok(_) => Ok(None),
        Err(err) => failure_notice(err),
    }
}

fn failure_notice(err: TubemodError) -> Result<Option<String>> {
    if err.is_unauthenticated() {
        return Err(err.into());
    }
    Ok(Some(format!("{} {}", "✗".red(), err)))
}

async fn classify(session: &ModerationSession) -> Result<Option<String>> {
    let bar = spinner("Classifying comments...");
    let result = session.run_classification().await;
    bar.finish_and_clear();

    match result {
        Ok(flagged) => Ok(Some(format!(
            "{} classifier selected {} comments",
            "✓".green(),
            flagged.len()
        ))),
        Err(err) => failure_notice(err),
    }
}

async fn moderate_selected(
    session: &ModerationSession,
    config: &Config,
    status: ModerationStatus,
    ban_author: bool,
) -> Result<Option<String>> {
    let count = session.snapshot().selected_count();
    if count == 0 {
        return Ok(Some("Nothing selected".yellow().to_string()));
    }

    if needs_confirmation(config, status, ban_author) {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(confirm_prompt(count, status, ban_author))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(Some("Cancelled".dimmed().to_string()));
        }
    }

    let bar = spinner(format!("Marking {} comments as {}...", count, status));
    let result = session.moderate_selected(status, ban_author).await;
    bar.finish_and_clear();

    match result {
        Ok(response) => Ok(Some(format!(
            "{} {} comments marked {}",
            "✓".green(),
            response.updated,
            status
        ))),
        Err(err) => failure_notice(err),
    }
}

async fn reject_one(
    session: &ModerationSession,
    config: &Config,
    target: Option<CommentId>,
) -> Result<Option<String>> {
    let Some(id) = target else {
        return Ok(Some("No such comment".yellow().to_string()));
    };

    if needs_confirmation(config, ModerationStatus::Rejected, false) {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Reject comment {}?", id))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(Some("Cancelled".dimmed().to_string()));
        }
    }

    match session.moderate_one(id.clone(), ModerationStatus::Rejected, false).await {
        Ok(_) => Ok(Some(format!("{} {} rejected", "✓".green(), id))),
        Err(err) => failure_notice(err),
    }
}
