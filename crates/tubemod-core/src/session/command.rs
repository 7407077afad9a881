//! Batch moderation commands

use super::lane::LaneGuard;
use super::model::{LaneStatus, SessionState};
use crate::error::{Result, TubemodError};
use crate::store::{CommentStore, ModerationRequest, ModerationResponse};
use crate::types::{CommentId, Lane, ModerationStatus};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Message used when the store gives no reason for a failed command
pub const COMMAND_FAILED_MESSAGE: &str = "failed to update comments";

/// Sends batch moderation commands to the comment store.
///
/// A single-comment action is a batch of one. Any confirmation for
/// destructive statuses happens before this is called.
pub struct ModerationCommand {
    store: Arc<dyn CommentStore>,
    busy: AtomicBool,
}

impl ModerationCommand {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self {
            store,
            busy: AtomicBool::new(false),
        }
    }

    /// Apply `status` to `comment_ids`, optionally banning their authors.
    ///
    /// On success the ids leave the selection. On failure nothing changes
    /// locally and the error is returned to the caller.
    pub async fn moderate(
        &self,
        comment_ids: Vec<CommentId>,
        status: ModerationStatus,
        ban_author: bool,
        state: &watch::Sender<SessionState>,
    ) -> Result<ModerationResponse> {
        if comment_ids.is_empty() {
            return Err(TubemodError::Validation(
                "No comments to moderate".to_string(),
            ));
        }
        let _guard = LaneGuard::acquire(&self.busy, Lane::Command, state)?;

        let request = ModerationRequest::new(comment_ids, status, ban_author);
        debug!(
            count = request.comment_ids.len(),
            status = %status,
            ban_author,
            "Dispatching moderation command"
        );

        let result = match self.store.moderate(&request).await {
            Ok(response) if !response.success => {
                Err(TubemodError::Unsuccessful(COMMAND_FAILED_MESSAGE.to_string()))
            }
            other => other,
        };

        match result {
            Ok(response) => {
                info!(
                    count = request.comment_ids.len(),
                    updated = response.updated,
                    status = %status,
                    ban_author,
                    "Moderation command applied"
                );
                state.send_modify(|s| {
                    s.selection.remove_many(&request.comment_ids);
                    s.command_status = LaneStatus::Idle;
                    s.clear_error(Lane::Command);
                });
                Ok(response)
            }
            Err(err) => {
                warn!(count = request.comment_ids.len(), error = %err, "Moderation command failed");
                state.send_modify(|s| {
                    s.command_status = LaneStatus::Idle;
                    s.record_error(Lane::Command, &err);
                });
                Err(err)
            }
        }
    }
}
