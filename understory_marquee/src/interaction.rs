// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pause state: a set of independent reasons, paused while any is active.
//!
//! Each source sets or clears only its own reason, so overlapping signals
//! (hovered *and* focused, say) never resume each other early.

use kurbo::{Point, Vec2};

use crate::config::TickerConfig;

bitflags::bitflags! {
    /// Why a ticker is paused.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PauseReasons: u8 {
        /// Pointer is over the ticker.
        const HOVER     = 1 << 0;
        /// Focus is inside the ticker.
        const FOCUS     = 1 << 1;
        /// A touch is in progress.
        const TOUCH     = 1 << 2;
        /// Paused through the API.
        const API       = 1 << 3;
        /// The ticker is scrolled out of view.
        const OFFSCREEN = 1 << 4;
    }
}

impl Default for PauseReasons {
    fn default() -> Self {
        Self::empty()
    }
}

/// Tracks one touch gesture to tell taps and horizontal drags from vertical scrolls.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchTracker {
    start: Option<Point>,
}

impl TouchTracker {
    /// Begin tracking at `at`.
    pub fn start(&mut self, at: Point) {
        self.start = Some(at);
    }

    /// Returns true when the gesture turned into a vertical scroll. Tracking stops then.
    pub fn is_vertical_scroll(&mut self, at: Point) -> bool {
        let Some(start) = self.start else {
            return false;
        };
        let delta: Vec2 = at - start;
        if delta.y.abs() > delta.x.abs() {
            self.start = None;
            true
        } else {
            false
        }
    }

    /// Stop tracking.
    pub fn end(&mut self) {
        self.start = None;
    }

    /// Whether a gesture is being tracked.
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }
}

/// Per-ticker interaction state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Interaction {
    reasons: PauseReasons,
    touch: TouchTracker,
}

impl Interaction {
    /// Active pause reasons.
    pub fn reasons(&self) -> PauseReasons {
        self.reasons
    }

    /// Whether any reason is active.
    pub fn is_paused(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Set or clear a reason directly.
    pub fn set(&mut self, reason: PauseReasons, active: bool) {
        self.reasons.set(reason, active);
    }

    /// Pointer entered the ticker.
    pub fn pointer_enter(&mut self, config: &TickerConfig) {
        if config.pause_on_hover {
            self.reasons.insert(PauseReasons::HOVER);
        }
    }

    /// Pointer left the ticker.
    pub fn pointer_leave(&mut self) {
        self.reasons.remove(PauseReasons::HOVER);
    }

    /// Focus moved into the ticker.
    pub fn focus_in(&mut self, config: &TickerConfig) {
        if config.pause_on_focus {
            self.reasons.insert(PauseReasons::FOCUS);
        }
    }

    /// Focus left a node inside the ticker. `still_inside` is true when the
    /// next focused node is also inside.
    pub fn focus_out(&mut self, still_inside: bool) {
        if !still_inside {
            self.reasons.remove(PauseReasons::FOCUS);
        }
    }

    /// A touch began on the ticker.
    pub fn touch_start(&mut self, at: Point, config: &TickerConfig) {
        if config.pause_on_hover {
            self.touch.start(at);
            self.reasons.insert(PauseReasons::TOUCH);
        }
    }

    /// A touch moved.
    pub fn touch_move(&mut self, at: Point) {
        if self.touch.is_vertical_scroll(at) {
            self.reasons.remove(PauseReasons::TOUCH);
        }
    }

    /// A touch ended or was cancelled.
    pub fn touch_end(&mut self) {
        self.touch.end();
        self.reasons.remove(PauseReasons::TOUCH);
    }

    /// Drop reasons the new configuration no longer allows.
    pub fn reconcile(&mut self, config: &TickerConfig) {
        if !config.pause_on_hover {
            self.touch.end();
            self.reasons
                .remove(PauseReasons::HOVER | PauseReasons::TOUCH);
        }
        if !config.pause_on_focus {
            self.reasons.remove(PauseReasons::FOCUS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Direction;

    fn config(pause_on_hover: bool, pause_on_focus: bool) -> TickerConfig {
        TickerConfig {
            speed: 50.0,
            gap: 20.0,
            direction: Direction::Forward,
            pause_on_hover,
            pause_on_focus,
        }
    }

    #[test]
    fn reasons_are_independent() {
        let cfg = config(true, true);
        let mut i = Interaction::default();
        i.pointer_enter(&cfg);
        i.focus_in(&cfg);
        i.pointer_leave();
        assert!(i.is_paused(), "focus still holds the pause");
        i.focus_out(false);
        assert!(!i.is_paused());
    }

    #[test]
    fn gated_by_config() {
        let cfg = config(false, false);
        let mut i = Interaction::default();
        i.pointer_enter(&cfg);
        i.focus_in(&cfg);
        i.touch_start(Point::ZERO, &cfg);
        assert!(!i.is_paused());
    }

    #[test]
    fn focus_moving_within_keeps_pause() {
        let cfg = config(true, true);
        let mut i = Interaction::default();
        i.focus_in(&cfg);
        i.focus_out(true);
        assert_eq!(i.reasons(), PauseReasons::FOCUS);
    }

    #[test]
    fn vertical_swipe_cancels_touch_pause() {
        let cfg = config(true, true);
        let mut i = Interaction::default();
        i.touch_start(Point::new(10.0, 10.0), &cfg);
        i.touch_move(Point::new(30.0, 15.0));
        assert!(i.is_paused(), "horizontal drag keeps the pause");
        i.touch_move(Point::new(32.0, 60.0));
        assert!(!i.is_paused());
        i.touch_move(Point::new(80.0, 60.0));
        assert!(!i.is_paused(), "tracking stopped after the scroll");
    }

    #[test]
    fn touch_end_always_resumes() {
        let cfg = config(true, true);
        let mut i = Interaction::default();
        i.touch_start(Point::new(10.0, 10.0), &cfg);
        i.touch_end();
        assert!(!i.is_paused());
    }

    #[test]
    fn reconcile_drops_disallowed_reasons_only() {
        let mut i = Interaction::default();
        i.pointer_enter(&config(true, true));
        i.set(PauseReasons::API, true);
        i.reconcile(&config(false, true));
        assert_eq!(i.reasons(), PauseReasons::API);
    }
}
