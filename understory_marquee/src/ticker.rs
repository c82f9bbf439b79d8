// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-instance ticker record.

use crate::clones;
use crate::config::{Overrides, TickerConfig};
use crate::host::{Document, Listeners};
use crate::interaction::{Interaction, PauseReasons};
use crate::structure::{self, Structure};

/// Whether a ticker can animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickerState {
    /// Built, but the content has no measurable width yet.
    Inert,
    /// Measured and cloned.
    Ready,
}

/// One marquee instance.
///
/// The engine owns these records; callers get read access through
/// [`Engine::tickers`](crate::Engine::tickers).
#[derive(Clone, Debug)]
pub struct Ticker<N> {
    pub(crate) element: N,
    pub(crate) structure: Structure<N>,
    pub(crate) config: TickerConfig,
    pub(crate) overrides: Overrides,
    pub(crate) single_set_width: f64,
    pub(crate) offset: f64,
    pub(crate) interaction: Interaction,
    pub(crate) clones: Vec<N>,
    pub(crate) state: TickerState,
    pub(crate) listeners: Listeners,
}

impl<N: Copy + Eq> Ticker<N> {
    pub(crate) fn new(element: N, structure: Structure<N>, config: TickerConfig) -> Self {
        Self {
            element,
            structure,
            config,
            overrides: Overrides::default(),
            single_set_width: 0.0,
            offset: 0.0,
            interaction: Interaction::default(),
            clones: Vec::new(),
            state: TickerState::Inert,
            listeners: Listeners::empty(),
        }
    }

    /// The container element.
    pub fn element(&self) -> N {
        self.element
    }

    /// The clipping viewport created inside the element.
    pub fn viewport(&self) -> N {
        self.structure.viewport()
    }

    /// The translated track.
    pub fn track(&self) -> N {
        self.structure.track()
    }

    /// Original items, in document order.
    pub fn original_items(&self) -> &[N] {
        self.structure.originals()
    }

    /// Clone nodes currently in the track.
    pub fn clones(&self) -> &[N] {
        &self.clones
    }

    /// Effective configuration.
    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// Width of one content cycle, or zero while inert.
    pub fn single_set_width(&self) -> f64 {
        self.single_set_width
    }

    /// Current track translation.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Active pause reasons.
    pub fn pause_reasons(&self) -> PauseReasons {
        self.interaction.reasons()
    }

    /// Whether any pause reason is active.
    pub fn is_paused(&self) -> bool {
        self.interaction.is_paused()
    }

    /// Readiness.
    pub fn state(&self) -> TickerState {
        self.state
    }

    /// Event kinds this ticker is subscribed to.
    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    /// Whether the frame pass should move this ticker.
    pub fn can_advance(&self) -> bool {
        self.state == TickerState::Ready
            && !self.is_paused()
            && self.single_set_width > 0.0
            && self.config.speed > 0.0
    }

    pub(crate) fn apply_offset<D: Document<Node = N> + ?Sized>(&mut self, doc: &mut D, offset: f64) {
        self.offset = offset;
        doc.set_translation(self.structure.track(), offset);
    }

    pub(crate) fn listen<D: Document<Node = N> + ?Sized>(&mut self, doc: &mut D, kinds: Listeners) {
        self.listeners |= kinds;
        doc.listen(self.element, kinds);
    }

    /// Unsubscribe, drop clones and restore the element.
    pub(crate) fn teardown<D: Document<Node = N> + ?Sized>(mut self, doc: &mut D) {
        doc.unlisten(self.element, self.listeners);
        clones::clear(doc, &mut self.clones);
        structure::restore(doc, self.element, self.structure);
    }
}
