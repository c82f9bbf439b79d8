// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, style and listener flags, and element data.

use std::collections::BTreeMap;

use kurbo::Affine;

/// Identifier for a node in the document.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On create, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Detaching a node from its parent does not free it. A detached node stays live
/// until it is removed, which is how callers hold on to content they took out of
/// the tree and want to put back later.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still refers to a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Inline style flags understood by the layout pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u8 {
        /// Overflow is clipped to the node's box.
        const CLIP       = 0b0000_0001;
        /// The node takes the full width of its parent (the viewport for the root).
        const FILL_WIDTH = 0b0000_0010;
        /// Children are laid out in a single row separated by [`Style::gap`].
        const ROW        = 0b0000_0100;
        /// The node keeps its intrinsic width inside a row.
        const NO_SHRINK  = 0b0000_1000;
        /// Text content does not wrap.
        const NO_WRAP    = 0b0001_0000;
        /// The node is promoted to its own compositing layer.
        const COMPOSITED = 0b0010_0000;
    }
}

impl Default for StyleFlags {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags::bitflags! {
    /// Kinds of event listeners a node (or the window) can have attached.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventMask: u16 {
        /// Pointer enter/leave.
        const POINTER      = 0b0000_0000_0001;
        /// Focus in/out.
        const FOCUS        = 0b0000_0000_0010;
        /// Touch start/move/end/cancel.
        const TOUCH        = 0b0000_0000_0100;
        /// Asset load and content mutation.
        const LOAD         = 0b0000_0000_1000;
        /// Intersection with the viewport.
        const INTERSECTION = 0b0000_0001_0000;
        /// Window resize.
        const RESIZE       = 0b0000_0010_0000;
        /// Page visibility.
        const VISIBILITY   = 0b0000_0100_0000;
        /// Media query changes (for example reduced motion).
        const MEDIA        = 0b0000_1000_0000;
        /// Device orientation.
        const ORIENTATION  = 0b0001_0000_0000;
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::empty()
    }
}

/// Inline style of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// Layout and paint flags.
    pub flags: StyleFlags,
    /// Gap between children of a [`StyleFlags::ROW`] node, in pixels.
    pub gap: f64,
    /// Paint-time transform. It never affects layout.
    pub transform: Affine,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            flags: StyleFlags::default(),
            gap: 0.0,
            transform: Affine::IDENTITY,
        }
    }
}

/// Element data carried by every node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    /// Tag name, for example `div` or `img`.
    pub tag: String,
    /// Class list in insertion order.
    pub classes: Vec<String>,
    /// Attributes by name.
    pub attributes: BTreeMap<String, String>,
    /// Inline style.
    pub style: Style,
    /// Width of the node's own content when it has no children, in pixels.
    ///
    /// An image that has not loaded yet reports `0.0`.
    pub intrinsic_width: f64,
    /// Optional text content, used only for debugging output.
    pub text: Option<String>,
}

impl Element {
    /// Create an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the intrinsic width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.intrinsic_width = width;
        self
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the style flags.
    pub fn with_style(mut self, flags: StyleFlags) -> Self {
        self.style.flags = flags;
        self
    }

    /// Returns true if the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
