//! Comment data and selection
//!
//! Comments are immutable snapshots owned by the remote store. The console
//! only ever replaces them wholesale after a fetch; moderation changes become
//! visible on the next refetch. [`SelectionSet`] tracks which of them the
//! operator has marked for a batch action.

mod model;
mod selection;

pub use model::{timestamp, Comment, Video};
pub use selection::SelectionSet;
