//! Platform abstraction layer
//!
//! The session never owns a timer loop. It asks a [`FrameScheduler`] for one
//! callback before the next repaint and for a fixed-rate interval used only by
//! diagnostics. The browser implementation lives in the wasm entry point;
//! [`ManualScheduler`] drives headless runs and tests.

use std::collections::VecDeque;

/// Handle for a pending "before next repaint" callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Handle for a repeating interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalHandle(pub i32);

/// Animation-frame and interval primitives
pub trait FrameScheduler {
    /// Schedule one frame callback
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancel a pending frame callback (no-op if it already ran)
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Start a repeating interval
    fn start_interval(&mut self, period_ms: u32) -> IntervalHandle;
    fn cancel_interval(&mut self, handle: IntervalHandle);
}

/// Scheduler whose frames are delivered by hand
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: i32,
    pending: VecDeque<FrameHandle>,
    intervals: Vec<(IntervalHandle, u32)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest frame that is still pending
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    /// Active intervals with their periods
    pub fn intervals(&self) -> &[(IntervalHandle, u32)] {
        &self.intervals
    }

    fn allocate(&mut self) -> i32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.allocate());
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }

    fn start_interval(&mut self, period_ms: u32) -> IntervalHandle {
        let handle = IntervalHandle(self.allocate());
        self.intervals.push((handle, period_ms));
        handle
    }

    fn cancel_interval(&mut self, handle: IntervalHandle) {
        self.intervals.retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_frames_and_cancel() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        s.cancel_frame(a);
        assert_eq!(s.take_frame(), Some(b));
        assert_eq!(s.take_frame(), None);
    }

    #[test]
    fn test_manual_intervals() {
        let mut s = ManualScheduler::new();
        let h = s.start_interval(1000);
        assert_eq!(s.intervals(), &[(h, 1000)]);
        s.cancel_interval(h);
        assert!(s.intervals().is_empty());
    }
}
