//! Frame-scheduling abstraction ("run before the next repaint, until cancelled").
//!
//! A scheduler hands out a [`FrameHandle`] for every requested frame. The
//! host later fires that handle back into the simulation; cancelling a
//! handle guarantees the host never fires it.

use crate::error::SimError;
use std::collections::VecDeque;

/// Opaque token identifying one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host frame primitive, e.g. `requestAnimationFrame`.
pub trait FrameScheduler {
    /// Requests one callback before the next repaint.
    ///
    /// Returns `SimError::SchedulerUnavailable` when the host refuses; no
    /// callback will fire for a failed request.
    fn request_frame(&mut self) -> Result<FrameHandle, SimError>;

    /// Deregisters a pending request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A scheduler driven by hand: requested frames queue up until the driver
/// pops them with [`ManualScheduler::next_due`].
///
/// Backs headless rendering and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the oldest pending frame, if any.
    pub fn next_due(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total frames ever requested.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total pending frames removed by `cancel_frame`.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, SimError> {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push_back(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        self.cancelled += (before - self.pending.len()) as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_fifo() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame().unwrap();
        let b = s.request_frame().unwrap();
        assert_ne!(a, b);
        assert_eq!(s.next_due(), Some(a));
        assert_eq!(s.next_due(), Some(b));
        assert_eq!(s.next_due(), None);
        assert_eq!(s.requested(), 2);
    }

    #[test]
    fn cancel_removes_only_that_handle() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame().unwrap();
        let b = s.request_frame().unwrap();
        s.cancel_frame(a);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.next_due(), Some(b));
        assert_eq!(s.cancelled(), 1);
    }

    #[test]
    fn cancelling_unknown_handle_is_ignored() {
        let mut s = ManualScheduler::new();
        s.cancel_frame(FrameHandle(99));
        assert_eq!(s.cancelled(), 0);
        assert_eq!(s.pending(), 0);
    }
}
