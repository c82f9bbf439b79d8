// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared frame loop: one outstanding frame request and the last frame time.

/// Frame loop bookkeeping, generic over the host's frame handle.
///
/// The loop holds at most one outstanding request. A frame callback only
/// counts if it answers that request, so a late callback for a cancelled
/// request is dropped.
#[derive(Clone, Debug)]
pub struct FrameLoop<F> {
    pending: Option<F>,
    last_timestamp: Option<f64>,
    running: bool,
}

impl<F> Default for FrameLoop<F> {
    fn default() -> Self {
        Self {
            pending: None,
            last_timestamp: None,
            running: false,
        }
    }
}

impl<F: Copy + Eq> FrameLoop<F> {
    /// Whether the loop is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Outstanding frame request.
    pub fn pending(&self) -> Option<F> {
        self.pending
    }

    /// Start with `frame` as the outstanding request. The next frame gets a zero delta.
    pub fn start(&mut self, frame: F) {
        self.running = true;
        self.pending = Some(frame);
        self.last_timestamp = None;
    }

    /// Stop, returning the request the caller must cancel.
    pub fn stop(&mut self) -> Option<F> {
        self.running = false;
        self.last_timestamp = None;
        self.pending.take()
    }

    /// Accept a frame callback.
    ///
    /// Returns the time step in milliseconds, capped at `max_delta_ms`, or
    /// `None` if the callback is stale or the loop is stopped. Time running
    /// backwards yields zero.
    pub fn begin(&mut self, frame: F, timestamp: f64, max_delta_ms: f64) -> Option<f64> {
        if !self.running || self.pending != Some(frame) {
            return None;
        }
        self.pending = None;
        let delta = self
            .last_timestamp
            .map_or(0.0, |last| (timestamp - last).clamp(0.0, max_delta_ms));
        self.last_timestamp = Some(timestamp);
        Some(delta)
    }

    /// Record the request made for the next frame.
    pub fn scheduled(&mut self, frame: F) {
        self.pending = Some(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_zero_delta_then_capped() {
        let mut l = FrameLoop::default();
        l.start(1_u32);
        assert_eq!(l.begin(1, 1000.0, 50.0), Some(0.0));
        l.scheduled(2);
        assert_eq!(l.begin(2, 1016.0, 50.0), Some(16.0));
        l.scheduled(3);
        assert_eq!(l.begin(3, 5000.0, 50.0), Some(50.0));
    }

    #[test]
    fn stale_and_stopped_frames_are_dropped() {
        let mut l = FrameLoop::default();
        assert_eq!(l.begin(1_u32, 0.0, 50.0), None);
        l.start(1);
        assert_eq!(l.begin(9, 0.0, 50.0), None);
        assert_eq!(l.stop(), Some(1));
        assert!(!l.is_running());
        assert_eq!(l.begin(1, 0.0, 50.0), None);
    }

    #[test]
    fn restart_resets_delta() {
        let mut l = FrameLoop::default();
        l.start(1_u32);
        l.begin(1, 100.0, 50.0);
        l.stop();
        l.start(2);
        assert_eq!(l.begin(2, 9000.0, 50.0), Some(0.0));
    }
}
