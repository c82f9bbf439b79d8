// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, layout, listeners.

use kurbo::{Affine, Size};

use crate::clock::Clock;
use crate::selector::Selector;
use crate::types::{Element, EventMask, NodeId, Style, StyleFlags};

/// A headless document.
///
/// The root node stands in for `<body>` and always fills the viewport width.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    viewport: Size,
    layout_dirty: bool,
    layout_flushes: u64,
    window_listeners: EventMask,
    hidden: bool,
    reduced_motion: bool,
    touch: bool,
    clock: Clock,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("viewport", &self.viewport)
            .field("hidden", &self.hidden)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
    listeners: EventMask,
    layout: Layout,
}

#[derive(Clone, Copy, Debug, Default)]
struct Layout {
    offset_width: f64,
    scroll_width: f64,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
            listeners: EventMask::empty(),
            layout: Layout::default(),
        }
    }
}

impl Document {
    /// Create a document whose viewport has the given size.
    pub fn new(viewport: Size) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            viewport,
            layout_dirty: true,
            layout_flushes: 0,
            window_listeners: EventMask::empty(),
            hidden: false,
            reduced_motion: false,
            touch: false,
            clock: Clock::new(),
        };
        doc.root = doc.create(Element::new("body").with_style(StyleFlags::FILL_WIDTH));
        doc
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached node.
    pub fn create(&mut self, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let idx = idx as u32;
        NodeId::new(idx, generation)
    }

    /// Create a node and append it to `parent`.
    pub fn insert(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create(element);
        self.append_child(parent, id);
        id
    }

    /// Move `child` to the end of `parent`'s children, detaching it first if needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_alive(parent) || !self.is_alive(child) || parent == child {
            return;
        }
        debug_assert!(
            !self.contains(child, parent),
            "appending a node under its own descendant"
        );
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        self.layout_dirty = true;
    }

    /// Detach a node from its parent. The node and its subtree stay live.
    pub fn detach(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
            self.node_mut(id).parent = None;
            self.layout_dirty = true;
        }
    }

    /// Remove a node (and its subtree), freeing the slots.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        self.detach(id);
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        self.layout_dirty = true;
    }

    /// Deep-copy a node's subtree into a new detached subtree.
    ///
    /// Element data is copied; attached listeners are not.
    pub fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        let element = self.node(id).element.clone();
        let children = self.node(id).children.clone();
        let copy = self.create(element);
        for child in children {
            if let Some(c) = self.clone_subtree(child) {
                self.node_mut(copy).children.push(c);
                self.node_mut(c).parent = Some(copy);
            }
        }
        Some(copy)
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.generation())
            .unwrap_or(false)
    }

    /// Returns true if `id` is attached (directly or transitively) under the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.contains(self.root, id)
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of a node in order. Empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element data of a node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Mutable element data of a node. Marks layout dirty.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.layout_dirty = true;
        self.node_opt_mut(id).map(|n| &mut n.element)
    }

    /// Attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element
                .attributes
                .insert(name.to_owned(), value.to_owned());
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.attributes.remove(name);
        }
    }

    /// Inline style of a node.
    pub fn style(&self, id: NodeId) -> Option<&Style> {
        self.element(id).map(|e| &e.style)
    }

    /// Replace the layout-affecting parts of a node's style (flags and gap).
    pub fn set_style(&mut self, id: NodeId, flags: StyleFlags, gap: f64) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.style.flags = flags;
            n.element.style.gap = gap;
            self.layout_dirty = true;
        }
    }

    /// Set a node's paint transform. Does not dirty layout.
    pub fn set_transform(&mut self, id: NodeId, transform: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.style.transform = transform;
        }
    }

    /// Set a node's intrinsic width, for example when an image finishes loading.
    pub fn set_intrinsic_width(&mut self, id: NodeId, width: f64) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.intrinsic_width = width;
            self.layout_dirty = true;
        }
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.node_opt(id).and_then(|n| n.parent);
        }
        false
    }

    /// Returns true if the node matches the selector string.
    pub fn matches(&self, id: NodeId, selector: &str) -> bool {
        match (Selector::parse(selector), self.element(id)) {
            (Some(sel), Some(el)) => sel.matches(el),
            _ => false,
        }
    }

    /// Descendants of `scope` matching `selector`, in document order.
    ///
    /// `scope` itself is not included. Unsupported selectors match nothing.
    pub fn query_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            if sel.matches(&node.element) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Connected nodes matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.query_within(self.root, selector)
    }

    // --- layout ---

    /// Recompute layout if anything changed since the last flush.
    ///
    /// Returns the number of flushes that actually recomputed layout so far.
    pub fn flush_layout(&mut self) -> u64 {
        if self.layout_dirty {
            let root = self.root;
            let width = self.viewport.width;
            self.layout_recursive(root, width);
            let detached: Vec<NodeId> = self
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(i, n)| match n {
                    Some(n) if n.parent.is_none() =>
                    {
                        #[allow(
                            clippy::cast_possible_truncation,
                            reason = "NodeId uses 32-bit indices by design."
                        )]
                        Some(NodeId::new(i as u32, n.generation))
                    }
                    _ => None,
                })
                .filter(|id| *id != root)
                .collect();
            for id in detached {
                self.layout_recursive(id, 0.0);
            }
            self.layout_dirty = false;
            self.layout_flushes += 1;
        }
        self.layout_flushes
    }

    /// Layout width of the node's box (like `offsetWidth`). Flushes layout first.
    pub fn offset_width(&mut self, id: NodeId) -> f64 {
        self.flush_layout();
        self.node_opt(id).map_or(0.0, |n| n.layout.offset_width)
    }

    /// Width of the node's content including overflow (like `scrollWidth`). Flushes layout first.
    pub fn scroll_width(&mut self, id: NodeId) -> f64 {
        self.flush_layout();
        self.node_opt(id).map_or(0.0, |n| n.layout.scroll_width)
    }

    /// Computes content width bottom-up and box width from `available` (parent box width).
    fn layout_recursive(&mut self, id: NodeId, available: f64) -> f64 {
        let (flags, gap, intrinsic, children) = {
            let n = self.node(id);
            (
                n.element.style.flags,
                n.element.style.gap,
                n.element.intrinsic_width,
                n.children.clone(),
            )
        };
        let fills = flags.contains(StyleFlags::FILL_WIDTH);
        let own_available = if fills { available } else { 0.0 };
        let mut child_widths = Vec::with_capacity(children.len());
        for child in &children {
            child_widths.push(self.layout_recursive(*child, own_available));
        }
        let content = if child_widths.is_empty() {
            intrinsic
        } else if flags.contains(StyleFlags::ROW) {
            #[allow(
                clippy::cast_precision_loss,
                reason = "child counts are far below f64 precision limits"
            )]
            let gaps = gap * (child_widths.len() - 1) as f64;
            child_widths.iter().sum::<f64>() + gaps
        } else {
            child_widths.iter().copied().fold(intrinsic, f64::max)
        };
        let offset = if fills { available } else { content };
        self.node_mut(id).layout = Layout {
            offset_width: offset,
            scroll_width: content.max(offset),
        };
        offset
    }

    // --- listeners ---

    /// Attach listeners of the given kinds to a node.
    pub fn listen(&mut self, id: NodeId, kinds: EventMask) {
        if let Some(n) = self.node_opt_mut(id) {
            n.listeners |= kinds;
        }
    }

    /// Detach listeners of the given kinds from a node.
    pub fn unlisten(&mut self, id: NodeId, kinds: EventMask) {
        if let Some(n) = self.node_opt_mut(id) {
            n.listeners &= !kinds;
        }
    }

    /// Listeners attached to a node.
    pub fn listeners(&self, id: NodeId) -> EventMask {
        self.node_opt(id).map_or(EventMask::empty(), |n| n.listeners)
    }

    /// Attach window-level listeners.
    pub fn listen_window(&mut self, kinds: EventMask) {
        self.window_listeners |= kinds;
    }

    /// Detach window-level listeners.
    pub fn unlisten_window(&mut self, kinds: EventMask) {
        self.window_listeners &= !kinds;
    }

    /// Window-level listeners.
    pub fn window_listeners(&self) -> EventMask {
        self.window_listeners
    }

    /// Total number of listener registrations on live nodes and the window.
    pub fn listener_count(&self) -> usize {
        let nodes: usize = self
            .nodes
            .iter()
            .flatten()
            .map(|n| n.listeners.bits().count_ones() as usize)
            .sum();
        nodes + self.window_listeners.bits().count_ones() as usize
    }

    // --- environment ---

    /// Viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resize the viewport. Marks layout dirty.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.layout_dirty = true;
    }

    /// Whether the page is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Set page visibility.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Whether `prefers-reduced-motion: reduce` matches.
    pub fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Set the reduced-motion preference.
    pub fn set_reduced_motion(&mut self, reduce: bool) {
        self.reduced_motion = reduce;
    }

    /// Whether the device has a touch screen and no hover-capable pointer.
    pub fn is_touch(&self) -> bool {
        self.touch
    }

    /// Set touch capability.
    pub fn set_touch(&mut self, touch: bool) {
        self.touch = touch;
    }

    /// The document's clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The document's clock, mutably.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }
}
