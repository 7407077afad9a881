//! Moderation session for one video.
//!
//! Three lanes share the session state:
//! - fetch: paginated comment retrieval, latest request wins
//! - classify: classifier-assisted selection, one run at a time
//! - command: batch moderation, one command at a time
//!
//! State is published through a `tokio::sync::watch` channel, so every
//! reader sees a consistent snapshot.

mod classifier;
mod command;
mod fetcher;
mod lane;
mod manager;
mod model;

pub use classifier::ClassifierRunner;
pub use command::{ModerationCommand, COMMAND_FAILED_MESSAGE};
pub use fetcher::CommentFetcher;
pub use manager::ModerationSession;
pub use model::{FetchOutcome, FetchStatus, LaneStatus, LastError, SessionState};
