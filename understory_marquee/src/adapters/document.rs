// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host implementation for Understory Document.
//!
//! ## Feature
//!
//! Enable with `document_adapter` (on by default).
//!
//! ## Notes
//!
//! The headless document never calls back on its own. [`advance`] moves its
//! clock and delivers due timers and frames to an [`Engine`], timers first, so
//! a test or demo reads as a sequence of "let this much time pass" steps.
//!
//! ```
//! use kurbo::Size;
//! use understory_document::{Document, Element};
//! use understory_marquee::adapters::document::{pump, run_for};
//! use understory_marquee::{Engine, Options};
//!
//! let mut doc = Document::new(Size::new(1600.0, 200.0));
//! let ticker = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
//! for _ in 0..4 {
//!     doc.insert(ticker, Element::new("span").with_class("ticker-item").with_width(150.0));
//! }
//!
//! let mut engine = Engine::new(Options::default());
//! engine.initialize(&mut doc);
//! pump(&mut engine, &mut doc);
//! run_for(&mut engine, &mut doc, 1000.0, 20.0);
//! assert_eq!(engine.ticker(ticker).unwrap().offset(), -50.0);
//! ```

use kurbo::{Affine, Size};
use understory_document::{Document as Headless, Element, EventMask, FrameId, NodeId, StyleFlags, TimerId};

use crate::engine::Engine;
use crate::host::{Document, Environment, Listeners, Presentation, PresentationFlags, Scheduler};

const STYLE_FLAGS: [(PresentationFlags, StyleFlags); 6] = [
    (PresentationFlags::CLIP, StyleFlags::CLIP),
    (PresentationFlags::FILL_WIDTH, StyleFlags::FILL_WIDTH),
    (PresentationFlags::ROW, StyleFlags::ROW),
    (PresentationFlags::NO_SHRINK, StyleFlags::NO_SHRINK),
    (PresentationFlags::NO_WRAP, StyleFlags::NO_WRAP),
    (PresentationFlags::COMPOSITED, StyleFlags::COMPOSITED),
];

const EVENT_KINDS: [(Listeners, EventMask); 9] = [
    (Listeners::POINTER, EventMask::POINTER),
    (Listeners::FOCUS, EventMask::FOCUS),
    (Listeners::TOUCH, EventMask::TOUCH),
    (Listeners::LOAD, EventMask::LOAD),
    (Listeners::INTERSECTION, EventMask::INTERSECTION),
    (Listeners::RESIZE, EventMask::RESIZE),
    (Listeners::VISIBILITY, EventMask::VISIBILITY),
    (Listeners::MEDIA, EventMask::MEDIA),
    (Listeners::ORIENTATION, EventMask::ORIENTATION),
];

fn style_flags(flags: PresentationFlags) -> StyleFlags {
    STYLE_FLAGS
        .iter()
        .filter(|(p, _)| flags.contains(*p))
        .fold(StyleFlags::empty(), |acc, (_, s)| acc | *s)
}

fn presentation_flags(flags: StyleFlags) -> PresentationFlags {
    STYLE_FLAGS
        .iter()
        .filter(|(_, s)| flags.contains(*s))
        .fold(PresentationFlags::empty(), |acc, (p, _)| acc | *p)
}

fn event_mask(kinds: Listeners) -> EventMask {
    EVENT_KINDS
        .iter()
        .filter(|(l, _)| kinds.contains(*l))
        .fold(EventMask::empty(), |acc, (_, m)| acc | *m)
}

impl Document for Headless {
    type Node = NodeId;

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        Headless::query_all(self, selector)
    }

    fn query_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        Headless::query_within(self, scope, selector)
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        Headless::matches(self, node, selector)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        Headless::contains(self, ancestor, node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        Headless::attribute(self, node, name).map(str::to_owned)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        Headless::set_attribute(self, node, name, value);
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        Headless::remove_attribute(self, node, name);
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        Headless::children(self, node).to_vec()
    }

    fn create_element(&mut self, class: &str) -> NodeId {
        self.create(Element::new("div").with_class(class))
    }

    fn clone_node(&mut self, node: NodeId) -> Option<NodeId> {
        self.clone_subtree(node)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        Headless::append_child(self, parent, child);
    }

    fn detach(&mut self, node: NodeId) {
        Headless::detach(self, node);
    }

    fn remove(&mut self, node: NodeId) {
        Headless::remove(self, node);
    }

    fn presentation(&self, node: NodeId) -> Presentation {
        self.style(node).map_or_else(Presentation::default, |s| Presentation {
            flags: presentation_flags(s.flags),
            gap: s.gap,
        })
    }

    fn set_presentation(&mut self, node: NodeId, presentation: Presentation) {
        self.set_style(node, style_flags(presentation.flags), presentation.gap);
    }

    fn set_translation(&mut self, node: NodeId, x: f64) {
        self.set_transform(node, Affine::translate((x, 0.0)));
    }

    fn flush_layout(&mut self) {
        Headless::flush_layout(self);
    }

    fn offset_width(&mut self, node: NodeId) -> f64 {
        Headless::offset_width(self, node)
    }

    fn scroll_width(&mut self, node: NodeId) -> f64 {
        Headless::scroll_width(self, node)
    }

    fn listen(&mut self, node: NodeId, kinds: Listeners) {
        Headless::listen(self, node, event_mask(kinds));
    }

    fn unlisten(&mut self, node: NodeId, kinds: Listeners) {
        Headless::unlisten(self, node, event_mask(kinds));
    }

    fn listen_window(&mut self, kinds: Listeners) {
        Headless::listen_window(self, event_mask(kinds));
    }

    fn unlisten_window(&mut self, kinds: Listeners) {
        Headless::unlisten_window(self, event_mask(kinds));
    }
}

impl Scheduler for Headless {
    type Frame = FrameId;
    type Timer = TimerId;

    fn request_frame(&mut self) -> FrameId {
        self.clock_mut().request_frame()
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.clock_mut().cancel_frame(frame);
    }

    fn set_timer(&mut self, delay_ms: f64) -> TimerId {
        self.clock_mut().set_timer(delay_ms)
    }

    fn clear_timer(&mut self, timer: TimerId) {
        self.clock_mut().clear_timer(timer);
    }
}

impl Environment for Headless {
    fn viewport_size(&self) -> Size {
        self.viewport()
    }

    fn is_hidden(&self) -> bool {
        Headless::is_hidden(self)
    }

    fn prefers_reduced_motion(&self) -> bool {
        Headless::prefers_reduced_motion(self)
    }

    fn is_touch_device(&self) -> bool {
        self.is_touch()
    }
}

/// Let `ms` milliseconds pass, delivering due timers and then pending frames.
pub fn advance(engine: &mut Engine<Headless>, doc: &mut Headless, ms: f64) {
    let wakeups = doc.clock_mut().advance(ms);
    for timer in wakeups.timers {
        engine.on_timer(doc, timer);
    }
    for frame in wakeups.frames {
        engine.on_frame(doc, frame, wakeups.now);
    }
}

/// Service pending frames without moving time.
pub fn pump(engine: &mut Engine<Headless>, doc: &mut Headless) {
    advance(engine, doc, 0.0);
}

/// Run whole frames of `frame_ms` for `duration_ms`.
pub fn run_for(engine: &mut Engine<Headless>, doc: &mut Headless, duration_ms: f64, frame_ms: f64) {
    if frame_ms.is_nan() || frame_ms <= 0.0 {
        return;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "frame counts are small and clamped to be non-negative"
    )]
    let frames = (duration_ms / frame_ms).floor().max(0.0) as u64;
    for _ in 0..frames {
        advance(engine, doc, frame_ms);
    }
}
