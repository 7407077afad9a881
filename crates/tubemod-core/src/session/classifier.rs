//! Classifier-assisted selection

use super::lane::LaneGuard;
use super::model::{LaneStatus, SessionState};
use crate::error::{Result, TubemodError};
use crate::store::{Classifier, Prediction};
use crate::types::{CommentId, Lane, VideoId};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Runs the remote classifier and turns its verdicts into a selection.
///
/// The classifier output is authoritative: a successful run replaces the
/// whole selection. A failed run leaves the selection untouched and never
/// moderates anything by itself.
pub struct ClassifierRunner {
    classifier: Arc<dyn Classifier>,
    busy: AtomicBool,
    min_confidence: Option<f64>,
}

impl ClassifierRunner {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            busy: AtomicBool::new(false),
            min_confidence: None,
        }
    }

    /// Only select predictions at or above `threshold`.
    ///
    /// Unset by default: the classifier applies its own threshold and every
    /// positive prediction it returns is selected.
    pub fn with_min_confidence(mut self, threshold: Option<f64>) -> Self {
        self.min_confidence = threshold;
        self
    }

    /// Classify `video_id` and replace the selection with the flagged ids.
    ///
    /// Returns the ids now selected. Fails fast without a request when the
    /// video id is blank or a run is already in flight.
    pub async fn run(
        &self,
        video_id: &VideoId,
        state: &watch::Sender<SessionState>,
    ) -> Result<Vec<CommentId>> {
        if video_id.is_blank() {
            return Err(TubemodError::Validation(
                "Video id cannot be empty".to_string(),
            ));
        }
        let _guard = LaneGuard::acquire(&self.busy, Lane::Classify, state)?;
        debug!(video_id = %video_id, "Dispatching classification");

        match self.classifier.classify(video_id).await {
            Ok(response) => {
                let flagged = self.flagged(&response.predictions);
                info!(
                    video_id = %video_id,
                    predictions = response.predictions.len(),
                    count = flagged.len(),
                    "Classification selected comments"
                );
                state.send_modify(|s| {
                    s.selection.replace_all(flagged.iter().cloned());
                    s.classify_status = LaneStatus::Idle;
                    s.clear_error(Lane::Classify);
                });
                Ok(flagged)
            }
            Err(err) => {
                warn!(video_id = %video_id, error = %err, "Classification failed");
                state.send_modify(|s| {
                    s.classify_status = LaneStatus::Idle;
                    s.record_error(Lane::Classify, &err);
                });
                Err(err)
            }
        }
    }

    fn flagged(&self, predictions: &[Prediction]) -> Vec<CommentId> {
        predictions
            .iter()
            .filter(|p| p.is_judi)
            .filter(|p| self.min_confidence.map_or(true, |min| p.confidence >= min))
            .map(|p| p.comment_id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageCursor;
    use crate::store::memory::{Failure, MemoryStore};

    fn setup(store: MemoryStore) -> (Arc<MemoryStore>, ClassifierRunner, watch::Sender<SessionState>) {
        let store = Arc::new(store);
        let runner = ClassifierRunner::new(store.clone());
        let (tx, _) = watch::channel(SessionState::new(
            VideoId::from_string("v1"),
            PageCursor::default(),
        ));
        (store, runner, tx)
    }

    fn prediction(id: &str, is_judi: bool, confidence: f64) -> Prediction {
        Prediction {
            comment_id: id.into(),
            is_judi,
            confidence,
        }
    }

    #[tokio::test]
    async fn test_run_replaces_selection() {
        let (_store, runner, tx) = setup(MemoryStore::with_comments("v1", 10).with_flagged(&["c2", "c5", "c9"]));
        tx.send_modify(|s| {
            s.selection.toggle("c1".into(), true);
        });

        let selected = runner.run(&VideoId::from_string("v1"), &tx).await.unwrap();
        assert_eq!(selected.len(), 3);

        let state = tx.borrow();
        assert_eq!(
            state.selected_ids(),
            vec![CommentId::from("c2"), CommentId::from("c5"), CommentId::from("c9")]
        );
        assert!(!state.is_classifying());
    }

    #[tokio::test]
    async fn test_negative_predictions_not_selected() {
        let (store, runner, tx) = setup(MemoryStore::with_comments("v1", 3));
        store.set_predictions(vec![
            prediction("c1", true, 0.55),
            prediction("c2", false, 0.99),
        ]);

        let selected = runner.run(&VideoId::from_string("v1"), &tx).await.unwrap();
        assert_eq!(selected, vec![CommentId::from("c1")]);
    }

    #[tokio::test]
    async fn test_min_confidence_filters() {
        let store = Arc::new(MemoryStore::with_comments("v1", 3));
        store.set_predictions(vec![
            prediction("c1", true, 0.55),
            prediction("c2", true, 0.95),
        ]);
        let runner = ClassifierRunner::new(store.clone()).with_min_confidence(Some(0.9));
        let (tx, _) = watch::channel(SessionState::new(
            VideoId::from_string("v1"),
            PageCursor::default(),
        ));

        let selected = runner.run(&VideoId::from_string("v1"), &tx).await.unwrap();
        assert_eq!(selected, vec![CommentId::from("c2")]);
    }

    #[tokio::test]
    async fn test_failure_keeps_selection() {
        let (store, runner, tx) = setup(MemoryStore::with_comments("v1", 3));
        store.fail_classify(Some(Failure::Http(503, "model not loaded")));
        tx.send_modify(|s| {
            s.selection.toggle("c1".into(), true);
        });

        let err = runner.run(&VideoId::from_string("v1"), &tx).await.unwrap_err();
        assert_eq!(err.to_string(), "model not loaded");

        let state = tx.borrow();
        assert_eq!(state.selected_ids(), vec![CommentId::from("c1")]);
        assert_eq!(state.last_error.as_ref().unwrap().lane, Lane::Classify);
        assert!(!state.is_classifying());
    }

    #[tokio::test]
    async fn test_blank_video_fails_fast() {
        let (store, runner, tx) = setup(MemoryStore::with_comments("v1", 3));

        let err = runner.run(&VideoId::from_string(" "), &tx).await.unwrap_err();
        assert!(matches!(err, TubemodError::Validation(_)));
        assert_eq!(store.classification_count(), 0);
    }
}
