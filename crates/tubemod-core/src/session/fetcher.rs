//! Paginated comment retrieval with stale-response suppression

use super::model::{FetchOutcome, FetchStatus, SessionState};
use crate::error::{Result, TubemodError};
use crate::pagination::validate_page_size;
use crate::store::{CommentQuery, CommentStore};
use crate::types::Lane;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Issues comment queries and applies only the most recently issued one.
///
/// Every fetch takes the next sequence number. When a response settles it is
/// applied only if no later fetch has been issued since; otherwise it is
/// dropped, successful or not. The network call itself is never cancelled,
/// but a caller may drop the fetch future; if that fetch was the latest, the
/// published status falls back to what the last settled fetch left.
pub struct CommentFetcher {
    store: Arc<dyn CommentStore>,
    ledger: Mutex<Ledger>,
}

#[derive(Debug, Default)]
struct Ledger {
    issued: u64,
    /// Status left by the last fetch that settled while current
    settled: FetchStatus,
}

/// Restores the fetch status if the latest fetch is dropped before settling
struct PendingFetch<'a> {
    ledger: &'a Mutex<Ledger>,
    state: &'a watch::Sender<SessionState>,
    seq: u64,
    done: bool,
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let ledger = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
        if ledger.issued != self.seq {
            return;
        }
        debug!(seq = self.seq, "Latest comment fetch dropped before settling");
        let restored = ledger.settled;
        self.state.send_if_modified(|s| {
            if s.fetch_status == FetchStatus::Loading {
                s.fetch_status = restored;
                true
            } else {
                false
            }
        });
    }
}

impl CommentFetcher {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self {
            store,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    /// Sequence number of the latest issued fetch (0 before the first)
    pub fn latest_seq(&self) -> u64 {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner()).issued
    }

    /// Fetch one page and apply it to `state` if still current.
    ///
    /// Ordinary failures are recorded in `state.last_error` and reported as
    /// [`FetchOutcome::Failed`], keeping the previous page on screen. Only
    /// validation and authentication failures are returned as errors.
    pub async fn fetch(
        &self,
        query: CommentQuery,
        state: &watch::Sender<SessionState>,
    ) -> Result<FetchOutcome> {
        validate_query(&query)?;

        let seq = {
            let mut ledger = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
            ledger.issued += 1;
            state.send_modify(|s| s.fetch_status = FetchStatus::Loading);
            ledger.issued
        };
        let mut pending = PendingFetch {
            ledger: &self.ledger,
            state,
            seq,
            done: false,
        };
        debug!(
            video_id = %query.video_id,
            page = query.page,
            page_size = query.page_size,
            seq,
            "Dispatching comment fetch"
        );

        let result = self.store.fetch_comments(&query).await;

        let mut ledger = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
        pending.done = true;
        if ledger.issued != seq {
            debug!(seq, latest = ledger.issued, "Discarding superseded comment fetch");
            return match result {
                Err(err) if err.is_unauthenticated() => Err(err),
                _ => Ok(FetchOutcome::Superseded),
            };
        }

        match result {
            Ok(page) => {
                let pagination = page.pagination();
                if page.has_next.is_some_and(|reported| reported != pagination.has_next) {
                    warn!(
                        total = page.total,
                        page = page.page,
                        "Store reported inconsistent has_next, using derived value"
                    );
                }
                info!(
                    video_id = %query.video_id,
                    page = pagination.page,
                    count = page.items.len(),
                    total = pagination.total,
                    seq,
                    "Applied comment page"
                );
                ledger.settled = FetchStatus::Ready;
                state.send_modify(|s| {
                    if page.video.is_some() {
                        s.video = page.video;
                    }
                    s.comments = page.items;
                    s.pagination = pagination;
                    s.fetch_status = FetchStatus::Ready;
                    s.clear_error(Lane::Fetch);
                });
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                warn!(video_id = %query.video_id, seq, error = %err, "Comment fetch failed");
                ledger.settled = FetchStatus::Error;
                state.send_modify(|s| {
                    s.fetch_status = FetchStatus::Error;
                    s.record_error(Lane::Fetch, &err);
                });
                if err.is_unauthenticated() {
                    Err(err)
                } else {
                    Ok(FetchOutcome::Failed)
                }
            }
        }
    }
}

fn validate_query(query: &CommentQuery) -> Result<()> {
    if query.video_id.is_blank() {
        return Err(TubemodError::Validation(
            "Video id cannot be empty".to_string(),
        ));
    }
    if query.page < 1 {
        return Err(TubemodError::Validation(
            "Page number must be at least 1".to_string(),
        ));
    }
    validate_page_size(query.page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageCursor;
    use crate::store::memory::{Failure, MemoryStore};
    use crate::types::VideoId;

    fn setup(count: usize) -> (Arc<MemoryStore>, CommentFetcher, watch::Sender<SessionState>) {
        let store = Arc::new(MemoryStore::with_comments("v1", count));
        let fetcher = CommentFetcher::new(store.clone());
        let (tx, _) = watch::channel(SessionState::new(
            VideoId::from_string("v1"),
            PageCursor::default(),
        ));
        (store, fetcher, tx)
    }

    fn query(page: u32, page_size: u32) -> CommentQuery {
        CommentQuery {
            video_id: VideoId::from_string("v1"),
            page,
            page_size,
        }
    }

    #[tokio::test]
    async fn test_fetch_pages_of_fifteen() {
        let (_store, fetcher, tx) = setup(15);

        let outcome = fetcher.fetch(query(1, 10), &tx).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Applied);
        {
            let state = tx.borrow();
            assert_eq!(state.pagination.total, 15);
            assert_eq!(state.pagination.page, 1);
            assert!(state.pagination.has_next);
            assert_eq!(state.comments.len(), 10);
            assert_eq!(state.fetch_status, FetchStatus::Ready);
        }

        fetcher.fetch(query(2, 10), &tx).await.unwrap();
        let state = tx.borrow();
        assert_eq!(state.comments.len(), 5);
        assert!(!state.pagination.has_next);
    }

    #[tokio::test]
    async fn test_page_beyond_end_is_empty() {
        let (_store, fetcher, tx) = setup(15);

        fetcher.fetch(query(9, 10), &tx).await.unwrap();
        let state = tx.borrow();
        assert!(state.comments.is_empty());
        assert!(!state.pagination.has_next);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_data() {
        let (store, fetcher, tx) = setup(15);
        fetcher.fetch(query(1, 10), &tx).await.unwrap();

        store.fail_fetch(Some(Failure::Http(500, "HTTP error 500")));
        let outcome = fetcher.fetch(query(2, 10), &tx).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Failed);

        let state = tx.borrow();
        assert_eq!(state.comments.len(), 10);
        assert!(state.video.is_some());
        assert_eq!(state.fetch_status, FetchStatus::Error);
        assert_eq!(state.last_error.as_ref().unwrap().message, "HTTP error 500");
    }

    #[tokio::test]
    async fn test_success_clears_fetch_error() {
        let (store, fetcher, tx) = setup(3);
        store.fail_fetch(Some(Failure::Network));
        fetcher.fetch(query(1, 10), &tx).await.unwrap();
        assert!(tx.borrow().last_error.is_some());

        store.fail_fetch(None);
        fetcher.fetch(query(1, 10), &tx).await.unwrap();
        assert!(tx.borrow().last_error.is_none());
    }

    #[tokio::test]
    async fn test_unauthenticated_is_returned() {
        let (store, fetcher, tx) = setup(3);
        store.fail_fetch(Some(Failure::Unauthenticated));

        let err = fetcher.fetch(query(1, 10), &tx).await.unwrap_err();
        assert!(err.is_unauthenticated());
        assert!(tx.borrow().last_error.as_ref().unwrap().unauthenticated);
    }

    #[tokio::test]
    async fn test_invalid_query_issues_no_request() {
        let (store, fetcher, tx) = setup(3);

        assert!(fetcher.fetch(query(0, 10), &tx).await.is_err());
        assert!(fetcher.fetch(query(1, 0), &tx).await.is_err());
        assert!(fetcher.fetch(query(1, 101), &tx).await.is_err());
        let blank = CommentQuery {
            video_id: VideoId::from_string(""),
            page: 1,
            page_size: 10,
        };
        assert!(fetcher.fetch(blank, &tx).await.is_err());

        assert_eq!(store.fetch_count(), 0);
        assert_eq!(fetcher.latest_seq(), 0);
        assert_eq!(tx.borrow().fetch_status, FetchStatus::Idle);
    }

    /// Store whose responses never arrive
    struct StalledStore;

    #[async_trait::async_trait]
    impl CommentStore for StalledStore {
        async fn fetch_comments(&self, _query: &CommentQuery) -> Result<crate::store::CommentPage> {
            std::future::pending().await
        }

        async fn moderate(
            &self,
            _request: &crate::store::ModerationRequest,
        ) -> Result<crate::store::ModerationResponse> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_cancelled_fetch_before_first_page_returns_to_idle() {
        let fetcher = CommentFetcher::new(Arc::new(StalledStore));
        let (tx, _) = watch::channel(SessionState::new(
            VideoId::from_string("v1"),
            PageCursor::default(),
        ));

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            fetcher.fetch(query(1, 10), &tx),
        )
        .await;
        assert!(timed_out.is_err());
        assert_eq!(fetcher.latest_seq(), 1);
        assert_eq!(tx.borrow().fetch_status, FetchStatus::Idle);
    }
}
