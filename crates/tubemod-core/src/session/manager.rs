//! Moderation session orchestration

use super::classifier::ClassifierRunner;
use super::command::ModerationCommand;
use super::fetcher::CommentFetcher;
use super::model::{FetchOutcome, SessionState};
use crate::error::{Result, TubemodError};
use crate::pagination::PageCursor;
use crate::store::{Classifier, CommentQuery, CommentStore, ModerationResponse};
use crate::types::{CommentId, ModerationStatus, VideoId};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Live moderation state for one video.
///
/// Owns the canonical [`SessionState`] and publishes a fresh snapshot on
/// every change. Fetch, classify and command run as independent lanes and
/// may overlap; only the latest fetch is ever applied, and classify and
/// command each allow one request in flight.
pub struct ModerationSession {
    video_id: VideoId,
    fetcher: CommentFetcher,
    classifier: ClassifierRunner,
    command: ModerationCommand,
    state: watch::Sender<SessionState>,
}

impl ModerationSession {
    /// Create a session for `video_id`. Nothing is fetched until [`open`](Self::open).
    pub fn new(
        video_id: VideoId,
        store: Arc<dyn CommentStore>,
        classifier: Arc<dyn Classifier>,
        page_size: u32,
    ) -> Result<Self> {
        if video_id.is_blank() {
            return Err(TubemodError::Validation(
                "Video id cannot be empty".to_string(),
            ));
        }
        let cursor = PageCursor::new(page_size)?;
        let (state, _) = watch::channel(SessionState::new(video_id.clone(), cursor));

        Ok(Self {
            video_id,
            fetcher: CommentFetcher::new(store.clone()),
            classifier: ClassifierRunner::new(classifier),
            command: ModerationCommand::new(store),
            state,
        })
    }

    /// Only select classifier predictions at or above `threshold`
    pub fn with_min_confidence(mut self, threshold: Option<f64>) -> Self {
        self.classifier = self.classifier.with_min_confidence(threshold);
        self
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Initial fetch of page 1
    pub async fn open(&self) -> Result<FetchOutcome> {
        debug!(video_id = %self.video_id, "Opening moderation session");
        self.refetch().await
    }

    /// Fetch the page under the cursor again
    pub async fn refetch(&self) -> Result<FetchOutcome> {
        let cursor = self.state.borrow().cursor;
        self.fetch_at(cursor).await
    }

    /// Move to page `n` and fetch it
    pub async fn set_page(&self, n: u32) -> Result<FetchOutcome> {
        let mut cursor = self.state.borrow().cursor;
        cursor.set_page(n)?;
        self.state.send_modify(|s| s.cursor = cursor);
        self.fetch_at(cursor).await
    }

    /// Fetch the next page, or do nothing when the last fetch had no next page
    pub async fn next_page(&self) -> Result<Option<FetchOutcome>> {
        let (mut cursor, has_next) = {
            let state = self.state.borrow();
            (state.cursor, state.pagination.has_next)
        };
        if !has_next {
            return Ok(None);
        }
        cursor.advance();
        self.state.send_modify(|s| s.cursor = cursor);
        self.fetch_at(cursor).await.map(Some)
    }

    /// Fetch the previous page, or do nothing on page 1
    pub async fn prev_page(&self) -> Result<Option<FetchOutcome>> {
        let mut cursor = self.state.borrow().cursor;
        if !cursor.retreat() {
            return Ok(None);
        }
        self.state.send_modify(|s| s.cursor = cursor);
        self.fetch_at(cursor).await.map(Some)
    }

    async fn fetch_at(&self, cursor: PageCursor) -> Result<FetchOutcome> {
        let query = CommentQuery {
            video_id: self.video_id.clone(),
            page: cursor.page(),
            page_size: cursor.page_size(),
        };
        self.fetcher.fetch(query, &self.state).await
    }

    /// Mark or unmark a comment. Returns true if the selection changed.
    pub fn toggle(&self, id: CommentId, checked: bool) -> bool {
        self.state.send_if_modified(|s| s.selection.toggle(id, checked))
    }

    /// Select every comment on the displayed page, keeping other selections
    pub fn select_all_on_page(&self) {
        self.state.send_modify(|s| {
            let ids: Vec<CommentId> = s.comments.iter().map(|c| c.comment_id.clone()).collect();
            s.selection.extend(ids);
        });
    }

    /// Empty the selection
    pub fn clear_selection(&self) {
        self.state.send_if_modified(|s| {
            let changed = !s.selection.is_empty();
            s.selection.clear();
            changed
        });
    }

    /// Run the classifier, select what it flags, then refetch the current page.
    ///
    /// Returns the newly selected ids.
    pub async fn run_classification(&self) -> Result<Vec<CommentId>> {
        let flagged = self.classifier.run(&self.video_id, &self.state).await?;
        self.refetch().await?;
        Ok(flagged)
    }

    /// Moderate `comment_ids`, then refetch the current page once
    pub async fn moderate(
        &self,
        comment_ids: Vec<CommentId>,
        status: ModerationStatus,
        ban_author: bool,
    ) -> Result<ModerationResponse> {
        let response = self
            .command
            .moderate(comment_ids, status, ban_author, &self.state)
            .await?;
        self.refetch().await?;
        Ok(response)
    }

    /// Moderate a single comment
    pub async fn moderate_one(
        &self,
        comment_id: CommentId,
        status: ModerationStatus,
        ban_author: bool,
    ) -> Result<ModerationResponse> {
        self.moderate(vec![comment_id], status, ban_author).await
    }

    /// Moderate everything currently selected
    pub async fn moderate_selected(
        &self,
        status: ModerationStatus,
        ban_author: bool,
    ) -> Result<ModerationResponse> {
        let ids = self.state.borrow().selected_ids();
        self.moderate(ids, status, ban_author).await
    }
}
