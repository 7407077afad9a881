//! Session state snapshot

use crate::comment::{Comment, SelectionSet, Video};
use crate::error::TubemodError;
use crate::pagination::{PageCursor, Pagination};
use crate::types::{CommentId, Lane, VideoId};
use serde::Serialize;

/// Progress of the fetch lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is outstanding
    Loading,
    /// Latest fetch succeeded
    Ready,
    /// Latest fetch failed; earlier data is kept
    Error,
}

/// Busy flag of the classify and command lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneStatus {
    #[default]
    Idle,
    Running,
}

/// Most recent failure surfaced to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastError {
    /// Lane that failed
    pub lane: Lane,
    /// Human-readable message
    pub message: String,
    /// Whether the operator has to log in again
    pub unauthenticated: bool,
}

impl LastError {
    pub(crate) fn from_error(lane: Lane, err: &TubemodError) -> Self {
        Self {
            lane,
            message: err.to_string(),
            unauthenticated: err.is_unauthenticated(),
        }
    }
}

/// What happened to a fetch once it settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response replaced the displayed page
    Applied,
    /// A newer fetch was issued meanwhile; the response was dropped
    Superseded,
    /// Request failed; previous data kept and the error recorded
    Failed,
}

/// Canonical state of one video's moderation session.
///
/// Published as a whole on every change so a reader never sees a page
/// from one fetch mixed with metadata from another.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    /// Video under review
    pub video_id: VideoId,
    /// Video detail from the latest applied fetch
    pub video: Option<Video>,
    /// Comments of the latest applied fetch
    pub comments: Vec<Comment>,
    /// Pagination of the latest applied fetch
    pub pagination: Pagination,
    /// Requested page position
    pub cursor: PageCursor,
    /// Comments marked for a batch action
    pub selection: SelectionSet,
    pub fetch_status: FetchStatus,
    pub classify_status: LaneStatus,
    pub command_status: LaneStatus,
    pub last_error: Option<LastError>,
}

impl SessionState {
    pub(crate) fn new(video_id: VideoId, cursor: PageCursor) -> Self {
        Self {
            video_id,
            video: None,
            comments: Vec::new(),
            pagination: Pagination {
                page: cursor.page(),
                page_size: cursor.page_size(),
                ..Pagination::default()
            },
            cursor,
            selection: SelectionSet::new(),
            fetch_status: FetchStatus::Idle,
            classify_status: LaneStatus::Idle,
            command_status: LaneStatus::Idle,
            last_error: None,
        }
    }

    /// True strictly between dispatch and settlement of the latest fetch
    pub fn is_loading(&self) -> bool {
        self.fetch_status == FetchStatus::Loading
    }

    pub fn is_classifying(&self) -> bool {
        self.classify_status == LaneStatus::Running
    }

    pub fn is_commanding(&self) -> bool {
        self.command_status == LaneStatus::Running
    }

    /// `ceil(total / page_size)` of the latest applied fetch
    pub fn total_pages(&self) -> u64 {
        self.pagination.total_pages()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, id: &CommentId) -> bool {
        self.selection.contains(id)
    }

    /// Selected ids in sorted order
    pub fn selected_ids(&self) -> Vec<CommentId> {
        self.selection.ids()
    }

    /// Look up a displayed comment
    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.comment_id == id)
    }

    pub(crate) fn record_error(&mut self, lane: Lane, err: &TubemodError) {
        self.last_error = Some(LastError::from_error(lane, err));
    }

    /// Clear the recorded error if it came from `lane`
    pub(crate) fn clear_error(&mut self, lane: Lane) {
        if self.last_error.as_ref().is_some_and(|e| e.lane == lane) {
            self.last_error = None;
        }
    }

    pub(crate) fn set_lane(&mut self, lane: Lane, status: LaneStatus) {
        match lane {
            Lane::Classify => self.classify_status = status,
            Lane::Command => self.command_status = status,
            Lane::Fetch => {}
        }
    }

    pub(crate) fn lane(&self, lane: Lane) -> LaneStatus {
        match lane {
            Lane::Classify => self.classify_status,
            Lane::Command => self.command_status,
            Lane::Fetch if self.is_loading() => LaneStatus::Running,
            Lane::Fetch => LaneStatus::Idle,
        }
    }
}
