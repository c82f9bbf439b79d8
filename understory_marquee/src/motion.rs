// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset arithmetic for a looping track.
//!
//! The offset is the track's horizontal translation. With single-set width `W`
//! it stays in `(-W, 0]` going forward and in `[-W, 0)` in reverse. Every
//! position in either range shows the same picture as its counterpart `W`
//! away, which is what makes the wrap invisible.

use crate::config::Direction;

/// Starting offset for a freshly measured track.
pub fn initial_offset(width: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Forward => 0.0,
        Direction::Reverse => -width,
    }
}

/// Wrap at most once if `offset` crossed the bound for `direction`.
pub fn wrap_once(offset: f64, width: f64, direction: Direction) -> f64 {
    if width <= 0.0 {
        return offset;
    }
    match direction {
        Direction::Forward if offset <= -width => offset + width,
        Direction::Reverse if offset >= 0.0 => offset - width,
        _ => offset,
    }
}

/// Bring any offset into the range for `direction`.
pub fn normalize(offset: f64, width: f64, direction: Direction) -> f64 {
    if width <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    let r = offset.rem_euclid(width);
    match direction {
        Direction::Forward if r == 0.0 => 0.0,
        _ => r - width,
    }
}

/// Move by `speed * delta_ms / 1000` pixels and wrap once.
///
/// Whole cycles inside one step are dropped first, so a step longer than the
/// cycle still lands in range.
pub fn advance(offset: f64, width: f64, direction: Direction, speed: f64, delta_ms: f64) -> f64 {
    let mut movement = speed * delta_ms / 1000.0;
    if width > 0.0 {
        movement %= width;
    }
    wrap_once(offset + direction.sign() * movement, width, direction)
}

/// Fraction of the cycle already traversed, in `[0, 1)`.
pub fn progress_fraction(offset: f64, width: f64) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    (-offset).rem_euclid(width) / width
}

/// Offset that sits `fraction` of the way through a cycle of `width`.
pub fn offset_at_fraction(fraction: f64, width: f64, direction: Direction) -> f64 {
    normalize(-fraction * width, width, direction)
}
