// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resize decisions and progress carry-over.
//!
//! Debouncing itself is a host timer owned by the engine; this module decides
//! what a settled size means and how the offset follows a width change.

use kurbo::Size;

use crate::config::Direction;
use crate::motion;

/// Outcome of a settled resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeDecision {
    /// Width moved past the threshold; tickers must be rebuilt.
    Rebuild {
        /// Absolute width change since the last commit.
        width_delta: f64,
    },
    /// Only the height changed. Recorded, nothing to rebuild.
    HeightOnly {
        /// Absolute height change since the last commit.
        height_delta: f64,
    },
    /// The change was too small to matter.
    Ignore,
}

/// Remembers the last committed viewport size and filters changes against it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeCoordinator {
    committed: Size,
    threshold: f64,
}

impl ResizeCoordinator {
    /// Start from `size` with a width threshold in pixels.
    pub fn new(size: Size, threshold: f64) -> Self {
        Self {
            committed: size,
            threshold,
        }
    }

    /// Last committed size.
    pub fn committed(&self) -> Size {
        self.committed
    }

    /// Compare a settled size to the committed one.
    ///
    /// Width changes at or under the threshold are not committed, so several
    /// small steps in the same direction eventually add up to a rebuild.
    /// Heights are always recorded.
    pub fn settle(&mut self, size: Size) -> ResizeDecision {
        let width_delta = (size.width - self.committed.width).abs();
        let height_delta = (size.height - self.committed.height).abs();
        if width_delta > self.threshold {
            self.committed = size;
            return ResizeDecision::Rebuild { width_delta };
        }
        self.committed.height = size.height;
        if width_delta == 0.0 && height_delta > 0.0 {
            ResizeDecision::HeightOnly { height_delta }
        } else {
            ResizeDecision::Ignore
        }
    }

    /// Commit `size` unconditionally and ask for a rebuild.
    pub fn force(&mut self, size: Size) -> ResizeDecision {
        let width_delta = (size.width - self.committed.width).abs();
        self.committed = size;
        ResizeDecision::Rebuild { width_delta }
    }
}

/// Map `offset` from a cycle of `old_width` to the same fraction of `new_width`.
///
/// Falls back to the starting offset when there was no previous cycle.
pub fn carry_progress(offset: f64, old_width: f64, new_width: f64, direction: Direction) -> f64 {
    if old_width <= 0.0 {
        return motion::initial_offset(new_width, direction);
    }
    let fraction = motion::progress_fraction(offset, old_width);
    motion::offset_at_fraction(fraction, new_width, direction)
}
