// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clone sets that keep the track wider than anything the viewport can show.

use tracing::{debug, warn};

use crate::host::Document;
use crate::structure::copy_item;

/// Upper bound on clone sets per refill.
pub const MAX_CLONE_SETS: usize = 256;

/// Track width needed to cover the viewport at every offset: two viewports plus one cycle.
pub fn coverage_target(viewport_width: f64, set_width: f64) -> f64 {
    2.0 * viewport_width + set_width
}

/// Remove every clone in `clones` from the document.
pub fn clear<D: Document + ?Sized>(doc: &mut D, clones: &mut Vec<D::Node>) {
    for clone in clones.drain(..) {
        doc.remove(clone);
    }
}

/// Replace all clones with fresh copies of `originals` until the track covers the target.
///
/// Returns the number of clone sets appended.
pub fn refill<D: Document + ?Sized>(
    doc: &mut D,
    track: D::Node,
    originals: &[D::Node],
    viewport_width: f64,
    set_width: f64,
    clones: &mut Vec<D::Node>,
) -> usize {
    clear(doc, clones);
    if originals.is_empty() || set_width <= 0.0 {
        return 0;
    }
    let target = coverage_target(viewport_width, set_width);
    let mut sets = 0;
    while doc.scroll_width(track) < target {
        if sets == MAX_CLONE_SETS {
            warn!(sets, target, "clone cap reached before the track covered the viewport");
            break;
        }
        for original in originals {
            if let Some(copy) = copy_item(doc, *original, true) {
                doc.append_child(track, copy);
                clones.push(copy);
            }
        }
        sets += 1;
    }
    debug!(sets, target, "clone sets refreshed");
    sets
}
