// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_document --heading-base-level=0

//! Understory Document: a small headless document for driving DOM-shaped code deterministically.
//!
//! The document is a generational node tree with just enough of a browser's surface
//! to host widgets that manipulate markup: classes and attributes, simple selectors,
//! a row layout with gaps, lazily flushed widths, paint transforms, listener
//! bookkeeping, environment flags and a manually advanced clock.
//!
//! - Nodes are addressed by [`NodeId`], a slot index plus generation.
//!   Detached nodes stay live until removed.
//! - Layout is one-dimensional. A [`StyleFlags::ROW`] node is as wide as its
//!   children plus gaps, a [`StyleFlags::FILL_WIDTH`] node is as wide as its parent,
//!   and anything else is as wide as its widest child or its intrinsic width.
//! - Reading [`Document::offset_width`] or [`Document::scroll_width`] flushes pending
//!   layout, like reading geometry from a live page.
//! - [`Clock`] hands out frame requests and timers and reports what became due on
//!   [`Clock::advance`].
//!
//! ## Not a browser
//!
//! There is no style cascade, no vertical layout and no event dispatch. Callers
//! deliver events to whatever they are testing; the document only records which
//! listeners are attached so leaks can be detected.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_document::{Document, Element, StyleFlags};
//! use kurbo::Size;
//!
//! let mut doc = Document::new(Size::new(400.0, 300.0));
//! let row = doc.insert(doc.root(), Element::new("div").with_class("row"));
//! doc.set_style(row, StyleFlags::ROW, 20.0);
//! for _ in 0..3 {
//!     doc.insert(row, Element::new("span").with_class("cell").with_width(100.0));
//! }
//!
//! assert_eq!(doc.query_all(".cell").len(), 3);
//! assert_eq!(doc.offset_width(row), 340.0);
//!
//! let timer = doc.clock_mut().set_timer(250.0);
//! assert!(doc.clock_mut().advance(100.0).timers.is_empty());
//! assert_eq!(doc.clock_mut().advance(150.0).timers, vec![timer]);
//! ```

mod clock;
mod document;
mod selector;
mod types;

pub use clock::{Clock, FrameId, TimerId, Wakeups};
pub use document::Document;
pub use selector::Selector;
pub use types::{Element, EventMask, NodeId, Style, StyleFlags};
