// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic clock: frame requests and one-shot timers against manual time.

/// Handle of a pending frame request.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FrameId(u64);

/// Handle of a pending timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimerId(u64);

/// Callbacks that became due during [`Clock::advance`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Wakeups {
    /// Timestamp (milliseconds) after advancing.
    pub now: f64,
    /// Timers that expired, ordered by due time, then by creation order.
    pub timers: Vec<TimerId>,
    /// Frame requests to service at `now`.
    pub frames: Vec<FrameId>,
}

/// Manually advanced time source.
///
/// Time only moves when [`Clock::advance`] is called. Frame requests are
/// serviced once per advance; a frame requested while servicing lands in the
/// next advance, like a browser's per-frame callback queue.
#[derive(Clone, Debug, Default)]
pub struct Clock {
    now: f64,
    next_id: u64,
    frames: Vec<FrameId>,
    timers: Vec<(TimerId, f64)>,
}

impl Clock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in milliseconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Request a frame callback.
    pub fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next());
        self.frames.push(id);
        id
    }

    /// Cancel a frame request. Unknown ids are ignored.
    pub fn cancel_frame(&mut self, id: FrameId) {
        self.frames.retain(|f| *f != id);
    }

    /// Schedule a one-shot timer `delay_ms` from now.
    pub fn set_timer(&mut self, delay_ms: f64) -> TimerId {
        let id = TimerId(self.next());
        self.timers.push((id, self.now + delay_ms.max(0.0)));
        id
    }

    /// Cancel a timer. Unknown ids are ignored.
    pub fn clear_timer(&mut self, id: TimerId) {
        self.timers.retain(|(t, _)| *t != id);
    }

    /// Number of outstanding frame requests.
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of outstanding timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move time forward by `ms` and collect what became due.
    ///
    /// Passing `0.0` services pending frames at the current time.
    pub fn advance(&mut self, ms: f64) -> Wakeups {
        self.now += ms.max(0.0);
        let now = self.now;
        let mut due: Vec<(TimerId, f64)> = Vec::new();
        self.timers.retain(|&(id, at)| {
            if at <= now {
                due.push((id, at));
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.0.cmp(&b.0.0)));
        Wakeups {
            now,
            timers: due.into_iter().map(|(id, _)| id).collect(),
            frames: core::mem::take(&mut self.frames),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_in_due_order() {
        let mut clock = Clock::new();
        let late = clock.set_timer(300.0);
        let early = clock.set_timer(100.0);
        let cancelled = clock.set_timer(50.0);
        clock.clear_timer(cancelled);

        let w = clock.advance(99.0);
        assert!(w.timers.is_empty());
        let w = clock.advance(250.0);
        assert_eq!(w.timers, vec![early, late]);
        assert_eq!(clock.pending_timers(), 0);
    }

    #[test]
    fn frames_are_drained_once() {
        let mut clock = Clock::new();
        let f = clock.request_frame();
        let w = clock.advance(16.0);
        assert_eq!(w.frames, vec![f]);
        assert_eq!(w.now, 16.0);
        assert!(clock.advance(16.0).frames.is_empty());

        let g = clock.request_frame();
        clock.cancel_frame(g);
        assert_eq!(clock.pending_frames(), 0);
    }
}
