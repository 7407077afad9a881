//! Busy flags for the classify and command lanes

use super::model::{LaneStatus, SessionState};
use crate::error::{Result, TubemodError};
use crate::types::Lane;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Held while a classify or command request is in flight.
///
/// Dropping the guard releases the lane and marks it idle in the published
/// state, including when the owning future is dropped mid-request.
pub(crate) struct LaneGuard<'a> {
    busy: &'a AtomicBool,
    lane: Lane,
    state: &'a watch::Sender<SessionState>,
}

impl<'a> LaneGuard<'a> {
    /// Claim the lane, or fail with `AlreadyRunning` if it is taken
    pub(crate) fn acquire(
        busy: &'a AtomicBool,
        lane: Lane,
        state: &'a watch::Sender<SessionState>,
    ) -> Result<Self> {
        if busy.swap(true, Ordering::AcqRel) {
            return Err(TubemodError::AlreadyRunning(lane));
        }
        state.send_modify(|s| s.set_lane(lane, LaneStatus::Running));
        Ok(Self { busy, lane, state })
    }
}

impl Drop for LaneGuard<'_> {
    fn drop(&mut self) {
        let lane = self.lane;
        self.state.send_if_modified(|s| {
            if s.lane(lane) == LaneStatus::Running {
                s.set_lane(lane, LaneStatus::Idle);
                true
            } else {
                false
            }
        });
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageCursor;
    use crate::types::VideoId;

    #[test]
    fn test_second_acquire_rejected() {
        let busy = AtomicBool::new(false);
        let (tx, _rx) = watch::channel(SessionState::new(
            VideoId::from_string("v1"),
            PageCursor::default(),
        ));

        let guard = LaneGuard::acquire(&busy, Lane::Classify, &tx).unwrap();
        assert!(tx.borrow().is_classifying());

        let second = LaneGuard::acquire(&busy, Lane::Classify, &tx);
        assert!(matches!(second, Err(TubemodError::AlreadyRunning(Lane::Classify))));

        drop(guard);
        assert!(!tx.borrow().is_classifying());
        assert!(LaneGuard::acquire(&busy, Lane::Classify, &tx).is_ok());
    }
}
