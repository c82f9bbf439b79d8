// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-set width: the distance one full pass of the content travels.

use tracing::debug;

use crate::error::{Result, TickerError};
use crate::host::Document;

/// Width of one content cycle from item widths and the gap between them.
///
/// ```
/// use understory_marquee::measure::set_width;
///
/// assert_eq!(set_width(&[100.0, 100.0, 100.0], 20.0), 340.0);
/// assert_eq!(set_width(&[], 20.0), 0.0);
/// ```
pub fn set_width(widths: &[f64], gap: f64) -> f64 {
    if widths.is_empty() {
        return 0.0;
    }
    #[allow(
        clippy::cast_precision_loss,
        reason = "item counts are far below f64 precision limits"
    )]
    let gaps = gap * (widths.len() - 1) as f64;
    widths.iter().sum::<f64>() + gaps
}

/// Measure the first `count` children of `track` after flushing layout.
///
/// Returns [`TickerError::GeometryUnavailable`] when the items themselves
/// have no width yet (for example images still loading), even if the gaps
/// alone would add up to something.
pub fn single_set_width<D: Document + ?Sized>(
    doc: &mut D,
    track: D::Node,
    count: usize,
    gap: f64,
) -> Result<f64> {
    doc.flush_layout();
    let children = doc.children(track);
    let widths: Vec<f64> = children
        .iter()
        .take(count)
        .map(|c| doc.offset_width(*c))
        .collect();
    let content: f64 = widths.iter().sum();
    if !(content.is_finite() && content > 0.0) {
        debug!(count, "ticker content has no width yet");
        return Err(TickerError::GeometryUnavailable);
    }
    let width = set_width(&widths, gap);
    debug!(count, gap, width, "measured single-set width");
    Ok(width)
}
