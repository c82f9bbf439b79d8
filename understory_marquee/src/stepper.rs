// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame offset strategies.
//!
//! The engine hands every advancing ticker to one [`Stepper`] per frame. The
//! built-in [`FrameStepper`] moves by elapsed time and wraps once. The
//! [`TweenStepper`] models a repeating linear tween driven by an external
//! timeline: it rounds to hundredths of a pixel like a tween library would and
//! has its own play state, so page-level pause and resume map onto it.

use core::fmt::Debug;

use crate::config::TickerConfig;
use crate::motion;

/// Strategy that computes the next offset of a ticker.
pub trait Stepper: Debug {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Next offset after `delta_ms` milliseconds.
    ///
    /// Only called with a positive `width` and a positive configured speed.
    fn advance(&mut self, offset: f64, width: f64, config: &TickerConfig, delta_ms: f64) -> f64;

    /// Suspend the timeline (for example while the page is hidden).
    fn pause(&mut self) {}

    /// Resume a suspended timeline.
    fn resume(&mut self) {}

    /// Tear the timeline down for good.
    fn kill(&mut self) {}
}

/// Incremental frame-time stepper.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStepper;

impl Stepper for FrameStepper {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn advance(&mut self, offset: f64, width: f64, config: &TickerConfig, delta_ms: f64) -> f64 {
        motion::advance(offset, width, config.direction, config.speed, delta_ms)
    }
}

/// Play state of a [`TweenStepper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    /// Not started, or killed.
    Idle,
    /// Advancing.
    Running,
    /// Suspended; offsets are returned unchanged.
    Paused,
}

/// Repeating linear tween stepper.
#[derive(Debug, Clone)]
pub struct TweenStepper {
    state: TweenState,
    elapsed_ms: f64,
}

impl Default for TweenStepper {
    fn default() -> Self {
        Self::new()
    }
}

impl TweenStepper {
    /// Create an idle tween.
    pub fn new() -> Self {
        Self {
            state: TweenState::Idle,
            elapsed_ms: 0.0,
        }
    }

    /// Current play state.
    pub fn state(&self) -> TweenState {
        self.state
    }

    /// Time the tween has spent running, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

impl Stepper for TweenStepper {
    fn name(&self) -> &'static str {
        "tween"
    }

    fn advance(&mut self, offset: f64, width: f64, config: &TickerConfig, delta_ms: f64) -> f64 {
        match self.state {
            TweenState::Paused => return offset,
            TweenState::Idle => self.state = TweenState::Running,
            TweenState::Running => {}
        }
        self.elapsed_ms += delta_ms;
        let next = offset + config.velocity() * delta_ms / 1000.0;
        let rounded = (next * 100.0).round() / 100.0;
        motion::normalize(rounded, width, config.direction)
    }

    fn pause(&mut self) {
        if self.state == TweenState::Running {
            self.state = TweenState::Paused;
        }
    }

    fn resume(&mut self) {
        if self.state == TweenState::Paused {
            self.state = TweenState::Running;
        }
    }

    fn kill(&mut self) {
        self.state = TweenState::Idle;
        self.elapsed_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Direction;

    fn config(speed: f64, direction: Direction) -> TickerConfig {
        TickerConfig {
            speed,
            gap: 20.0,
            direction,
            pause_on_hover: true,
            pause_on_focus: true,
        }
    }

    #[test]
    fn frame_stepper_matches_motion() {
        let mut s = FrameStepper;
        let cfg = config(50.0, Direction::Forward);
        assert_eq!(s.advance(0.0, 340.0, &cfg, 20.0), -1.0);
        assert_eq!(s.advance(-339.5, 340.0, &cfg, 20.0), -0.5);
    }

    #[test]
    fn tween_rounds_to_hundredths_and_wraps() {
        let mut s = TweenStepper::new();
        let cfg = config(33.0, Direction::Forward);
        let o = s.advance(0.0, 340.0, &cfg, 16.0);
        assert!((o + 0.53).abs() < 1e-9, "{o}");
        assert_eq!(s.state(), TweenState::Running);

        let o = s.advance(-339.9, 340.0, &cfg, 16.0);
        assert!((o + 0.43).abs() < 1e-9, "{o}");
    }

    #[test]
    fn tween_pause_resume_kill() {
        let mut s = TweenStepper::new();
        let cfg = config(50.0, Direction::Reverse);
        s.pause();
        assert_eq!(s.state(), TweenState::Idle, "pausing an idle tween is a no-op");

        let o = s.advance(-340.0, 340.0, &cfg, 20.0);
        assert_eq!(o, -339.0);
        s.pause();
        assert_eq!(s.advance(o, 340.0, &cfg, 20.0), o);
        s.resume();
        assert_eq!(s.advance(o, 340.0, &cfg, 20.0), -338.0);
        assert_eq!(s.elapsed_ms(), 40.0);

        s.kill();
        assert_eq!(s.state(), TweenState::Idle);
        assert_eq!(s.elapsed_ms(), 0.0);
    }
}
