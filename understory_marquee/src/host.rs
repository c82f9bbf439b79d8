// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host seam: the document, scheduling and environment capabilities the engine drives.
//!
//! The engine never owns a document. Every structural edit, geometry read,
//! frame request and timer goes through these traits, so the same engine runs
//! against a live page binding or the headless
//! [`understory_document`](https://docs.rs/understory_document) tree.
//!
//! ## Contract
//!
//! - Detached nodes stay valid until [`Document::remove`] is called on them.
//! - [`Document::offset_width`] and [`Document::scroll_width`] reflect every
//!   structural and style change made before the call.
//! - [`Document::set_translation`] is paint-only and never invalidates layout.
//! - [`Document::clone_node`] copies content deeply but never copies listeners.

use core::fmt::Debug;

use kurbo::Size;

bitflags::bitflags! {
    /// Kinds of host events a node or the window can be subscribed to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Listeners: u16 {
        /// Pointer enter and leave.
        const POINTER      = 1 << 0;
        /// Focus entering or leaving the subtree.
        const FOCUS        = 1 << 1;
        /// Touch start, move, end and cancel.
        const TOUCH        = 1 << 2;
        /// Asset load and content mutation inside the subtree.
        const LOAD         = 1 << 3;
        /// Viewport intersection.
        const INTERSECTION = 1 << 4;
        /// Window resize.
        const RESIZE       = 1 << 5;
        /// Page visibility.
        const VISIBILITY   = 1 << 6;
        /// Media query changes.
        const MEDIA        = 1 << 7;
        /// Device orientation.
        const ORIENTATION  = 1 << 8;
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags::bitflags! {
    /// Layout and paint switches the engine sets on the nodes it manages.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PresentationFlags: u8 {
        /// Clip overflowing content.
        const CLIP       = 1 << 0;
        /// Take the full width of the parent.
        const FILL_WIDTH = 1 << 1;
        /// Lay children out in one row separated by the gap.
        const ROW        = 1 << 2;
        /// Never shrink below the intrinsic width inside a row.
        const NO_SHRINK  = 1 << 3;
        /// Keep text on one line.
        const NO_WRAP    = 1 << 4;
        /// Promote to a compositing layer (`will-change: transform`).
        const COMPOSITED = 1 << 5;
    }
}

impl Default for PresentationFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// The inline presentation of a node: flags plus row gap in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Presentation {
    /// Layout and paint switches.
    pub flags: PresentationFlags,
    /// Gap between children when [`PresentationFlags::ROW`] is set.
    pub gap: f64,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            flags: PresentationFlags::empty(),
            gap: 0.0,
        }
    }
}

impl Presentation {
    /// Presentation with the given flags and no gap.
    pub const fn new(flags: PresentationFlags) -> Self {
        Self { flags, gap: 0.0 }
    }

    /// Copy with the gap replaced.
    #[must_use]
    pub const fn with_gap(self, gap: f64) -> Self {
        Self { gap, ..self }
    }
}

/// Document access: queries, mutation, attributes, presentation, layout reads and listeners.
pub trait Document {
    /// Node handle. Must stay valid while the node is alive, attached or not.
    type Node: Copy + Eq + Debug;

    /// Connected nodes matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    /// Descendants of `scope` (excluding `scope`) matching `selector`, in document order.
    fn query_within(&self, scope: Self::Node, selector: &str) -> Vec<Self::Node>;
    /// Returns true if `node` matches `selector`.
    fn matches(&self, node: Self::Node, selector: &str) -> bool;
    /// Returns true if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool;

    /// Attribute value, if present.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;
    /// Set an attribute.
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);
    /// Remove an attribute.
    fn remove_attribute(&mut self, node: Self::Node, name: &str);

    /// Children in order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;
    /// Create a detached container element carrying `class`.
    fn create_element(&mut self, class: &str) -> Self::Node;
    /// Deep-copy a node into a new detached subtree.
    fn clone_node(&mut self, node: Self::Node) -> Option<Self::Node>;
    /// Append `child` to `parent`, moving it if it is attached elsewhere.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);
    /// Detach a node from its parent without destroying it.
    fn detach(&mut self, node: Self::Node);
    /// Destroy a node and its subtree.
    fn remove(&mut self, node: Self::Node);

    /// Inline presentation of a node.
    fn presentation(&self, node: Self::Node) -> Presentation;
    /// Replace the inline presentation of a node.
    fn set_presentation(&mut self, node: Self::Node, presentation: Presentation);
    /// Apply a horizontal translation (paint only).
    fn set_translation(&mut self, node: Self::Node, x: f64);

    /// Bring layout up to date.
    fn flush_layout(&mut self);
    /// Rendered width of the node's box.
    fn offset_width(&mut self, node: Self::Node) -> f64;
    /// Rendered width of the node's content including overflow.
    fn scroll_width(&mut self, node: Self::Node) -> f64;

    /// Subscribe a node to event kinds.
    fn listen(&mut self, node: Self::Node, kinds: Listeners);
    /// Unsubscribe a node from event kinds.
    fn unlisten(&mut self, node: Self::Node, kinds: Listeners);
    /// Subscribe the window to event kinds.
    fn listen_window(&mut self, kinds: Listeners);
    /// Unsubscribe the window from event kinds.
    fn unlisten_window(&mut self, kinds: Listeners);
}

/// Frame callbacks and one-shot timers.
///
/// Requests are answered later through [`Engine::on_frame`](crate::Engine::on_frame)
/// and [`Engine::on_timer`](crate::Engine::on_timer).
pub trait Scheduler {
    /// Handle of a frame request.
    type Frame: Copy + Eq + Debug;
    /// Handle of a timer.
    type Timer: Copy + Eq + Debug;

    /// Request one frame callback.
    fn request_frame(&mut self) -> Self::Frame;
    /// Cancel a frame request.
    fn cancel_frame(&mut self, frame: Self::Frame);
    /// Start a one-shot timer.
    fn set_timer(&mut self, delay_ms: f64) -> Self::Timer;
    /// Cancel a timer.
    fn clear_timer(&mut self, timer: Self::Timer);
}

/// Ambient environment queries.
pub trait Environment {
    /// Size of the layout viewport.
    fn viewport_size(&self) -> Size;
    /// Whether the page is hidden.
    fn is_hidden(&self) -> bool;
    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;
    /// Whether the primary input is touch without hover.
    fn is_touch_device(&self) -> bool;
}

/// Everything the engine needs from its host.
pub trait Host: Document + Scheduler + Environment {}

impl<T: Document + Scheduler + Environment + ?Sized> Host for T {}
