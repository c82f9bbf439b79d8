// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ticker registry, its frame loop, and the programmatic API.

use core::fmt;

use tracing::{debug, error, warn};

use crate::clones;
use crate::config::{self, Direction, Options, Overrides};
use crate::driver::FrameLoop;
use crate::error::{Result, TickerError};
use crate::event::HostEvent;
use crate::host::{Host, Listeners};
use crate::interaction::PauseReasons;
use crate::measure;
use crate::motion;
use crate::resize::{self, ResizeCoordinator, ResizeDecision};
use crate::retry::{Retry, RetryStep};
use crate::stepper::{FrameStepper, Stepper};
use crate::structure;
use crate::ticker::{Ticker, TickerState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerPurpose {
    ResizeDebounce,
    Orientation,
    Retry,
}

/// Owns every ticker on a host and drives them.
///
/// All methods take the host explicitly; the engine never holds on to it.
/// Callbacks the host owes the engine are [`Engine::on_frame`],
/// [`Engine::on_timer`] and [`Engine::handle_event`]. None of them return
/// errors: failures are logged and leave content static.
pub struct Engine<H: Host> {
    options: Options,
    stepper: Option<Box<dyn Stepper>>,
    tickers: Vec<Ticker<H::Node>>,
    initialized: bool,
    frame_loop: FrameLoop<H::Frame>,
    timers: Vec<(H::Timer, TimerPurpose)>,
    resize: Option<ResizeCoordinator>,
    retry: Option<Retry>,
    window_listeners: Listeners,
    hidden: bool,
    reduced_motion: bool,
}

impl<H: Host> fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("stepper", &self.stepper)
            .field("tickers", &self.tickers)
            .field("running", &self.frame_loop.is_running())
            .field("pending_timers", &self.timers.len())
            .field("hidden", &self.hidden)
            .field("reduced_motion", &self.reduced_motion)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Engine<H> {
    /// Create an engine with the built-in [`FrameStepper`].
    pub fn new(options: Options) -> Self {
        Self::with_stepper(options, Box::new(FrameStepper))
    }

    /// Create an engine with a specific stepper.
    pub fn with_stepper(options: Options, stepper: Box<dyn Stepper>) -> Self {
        Self::from_parts(options, Some(stepper))
    }

    /// Create an engine whose stepper comes from an optional backend.
    ///
    /// If the loader fails the error is logged and the engine is inert:
    /// [`Engine::initialize`] touches nothing and content stays static.
    pub fn with_backend<L>(options: Options, loader: L) -> Self
    where
        L: FnOnce() -> Result<Box<dyn Stepper>>,
    {
        match loader() {
            Ok(stepper) => {
                debug!(backend = stepper.name(), "animation backend loaded");
                Self::from_parts(options, Some(stepper))
            }
            Err(err) => {
                error!(%err, "animation backend unavailable; tickers stay static");
                Self::from_parts(options, None)
            }
        }
    }

    fn from_parts(options: Options, stepper: Option<Box<dyn Stepper>>) -> Self {
        Self {
            options,
            stepper,
            tickers: Vec::new(),
            initialized: false,
            frame_loop: FrameLoop::default(),
            timers: Vec::new(),
            resize: None,
            retry: None,
            window_listeners: Listeners::empty(),
            hidden: false,
            reduced_motion: false,
        }
    }

    /// Global options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Name of the active stepper, or `None` when inert.
    pub fn stepper_name(&self) -> Option<&'static str> {
        self.stepper.as_ref().map(|s| s.name())
    }

    /// Whether the engine lacks a stepper and will never animate.
    pub fn is_inert(&self) -> bool {
        self.stepper.is_none()
    }

    /// Whether the frame loop is running.
    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// All tickers in registry order.
    pub fn tickers(&self) -> &[Ticker<H::Node>] {
        &self.tickers
    }

    /// The ticker built on `element`.
    pub fn ticker(&self, element: H::Node) -> Option<&Ticker<H::Node>> {
        self.tickers.iter().find(|t| t.element == element)
    }

    /// Build tickers on every matching container and start the loop.
    ///
    /// Returns the number of tickers built. Repeat calls are no-ops until
    /// [`Engine::destroy`].
    pub fn initialize(&mut self, host: &mut H) -> usize {
        if self.is_inert() {
            debug!("engine inert; initialization skipped");
            return 0;
        }
        if self.initialized {
            return 0;
        }
        self.initialized = true;
        match self.scan(host) {
            Ok(built) => built,
            Err(err) => {
                debug!(%err, "no tickers initialized");
                0
            }
        }
    }

    /// Like [`Engine::initialize`], but keeps retrying on the
    /// [`RetryPolicy`](crate::RetryPolicy) schedule while no ticker could be built.
    pub fn initialize_with_retry(&mut self, host: &mut H) -> usize {
        if self.is_inert() {
            debug!("engine inert; initialization skipped");
            return 0;
        }
        if self.initialized {
            return 0;
        }
        self.initialized = true;
        let built = self.scan(host).unwrap_or_else(|err| {
            debug!(%err, "ticker content not ready");
            0
        });
        if self.tickers.is_empty() {
            self.retry = Some(Retry::new(self.options.retry));
            self.schedule_retry(host);
        }
        built
    }

    /// Pause matching tickers (all when `filter` is `None`). Returns how many matched.
    pub fn pause(&mut self, host: &H, filter: Option<&str>) -> usize {
        self.set_api_pause(host, filter, true)
    }

    /// Resume tickers paused with [`Engine::pause`]. Other pause reasons still apply.
    pub fn resume(&mut self, host: &H, filter: Option<&str>) -> usize {
        self.set_api_pause(host, filter, false)
    }

    fn set_api_pause(&mut self, host: &H, filter: Option<&str>, paused: bool) -> usize {
        let selected = self.select(host, filter);
        for &i in &selected {
            self.tickers[i].interaction.set(PauseReasons::API, paused);
        }
        selected.len()
    }

    /// Set the speed of matching tickers, in pixels per second.
    ///
    /// Negative or non-finite values are rejected. Reduced motion still wins.
    pub fn set_speed(&mut self, host: &mut H, speed: f64, filter: Option<&str>) -> usize {
        if !(speed.is_finite() && speed >= 0.0) {
            warn!(speed, "ignoring invalid ticker speed");
            return 0;
        }
        self.apply_overrides(host, filter, |o| o.speed = Some(speed))
    }

    /// Set the direction of matching tickers.
    pub fn set_direction(&mut self, host: &mut H, direction: Direction, filter: Option<&str>) -> usize {
        self.apply_overrides(host, filter, |o| o.direction = Some(direction))
    }

    fn apply_overrides(
        &mut self,
        host: &mut H,
        filter: Option<&str>,
        update: impl Fn(&mut Overrides),
    ) -> usize {
        let selected = self.select(host, filter);
        let viewport_width = host.viewport_size().width;
        for &i in &selected {
            let ticker = &mut self.tickers[i];
            update(&mut ticker.overrides);
            reconfigure(&self.options, host, ticker, viewport_width, self.reduced_motion);
        }
        self.sync_loop(host);
        selected.len()
    }

    /// Tear everything down and leave the document as it was before initialization.
    pub fn destroy(&mut self, host: &mut H) {
        if let Some(frame) = self.frame_loop.stop() {
            host.cancel_frame(frame);
        }
        for (timer, _) in self.timers.drain(..) {
            host.clear_timer(timer);
        }
        if let Some(stepper) = self.stepper.as_mut() {
            stepper.kill();
        }
        for ticker in self.tickers.drain(..) {
            ticker.teardown(host);
        }
        if !self.window_listeners.is_empty() {
            host.unlisten_window(self.window_listeners);
            self.window_listeners = Listeners::empty();
        }
        self.resize = None;
        self.retry = None;
        self.initialized = false;
        debug!("ticker engine destroyed");
    }

    /// Frame callback for a request made through [`Scheduler::request_frame`](crate::Scheduler::request_frame).
    pub fn on_frame(&mut self, host: &mut H, frame: H::Frame, timestamp: f64) {
        let Some(delta) = self
            .frame_loop
            .begin(frame, timestamp, self.options.max_frame_ms)
        else {
            return;
        };
        if let Some(stepper) = self.stepper.as_mut() {
            for ticker in &mut self.tickers {
                if ticker.can_advance() {
                    let next =
                        stepper.advance(ticker.offset, ticker.single_set_width, &ticker.config, delta);
                    ticker.apply_offset(host, next);
                }
            }
        }
        let next = host.request_frame();
        self.frame_loop.scheduled(next);
    }

    /// Timer callback for a timer the engine started.
    pub fn on_timer(&mut self, host: &mut H, timer: H::Timer) {
        let Some(pos) = self.timers.iter().position(|(t, _)| *t == timer) else {
            return;
        };
        let (_, purpose) = self.timers.remove(pos);
        match purpose {
            TimerPurpose::ResizeDebounce => {
                let size = host.viewport_size();
                let Some(coordinator) = self.resize.as_mut() else {
                    return;
                };
                match coordinator.settle(size) {
                    ResizeDecision::Rebuild { width_delta } => {
                        debug!(width_delta, "viewport width changed; rebuilding tickers");
                        self.rebuild_all(host);
                    }
                    ResizeDecision::HeightOnly { height_delta } => {
                        debug!(height_delta, "height-only resize ignored");
                    }
                    ResizeDecision::Ignore => {
                        debug!(width = size.width, "resize below threshold ignored");
                    }
                }
            }
            TimerPurpose::Orientation => {
                let size = host.viewport_size();
                if let Some(coordinator) = self.resize.as_mut() {
                    coordinator.force(size);
                }
                debug!(width = size.width, "orientation changed; rebuilding tickers");
                self.rebuild_all(host);
            }
            TimerPurpose::Retry => self.retry_scan(host),
        }
    }

    /// Deliver a host event.
    pub fn handle_event(&mut self, host: &mut H, event: HostEvent<H::Node>) {
        let kind = event.kind();
        match event.target() {
            Some(target) => {
                if let Some(idx) = self.route(host, target, kind) {
                    self.handle_ticker_event(host, idx, event);
                }
            }
            None if self.window_listeners.contains(kind) => self.handle_window_event(host, event),
            None => {}
        }
    }

    // --- internals ---

    /// Innermost subscribed ticker containing `target`.
    fn route(&self, host: &H, target: H::Node, kind: Listeners) -> Option<usize> {
        self.tickers
            .iter()
            .rposition(|t| t.listeners.contains(kind) && host.contains(t.element, target))
    }

    fn select(&self, host: &H, filter: Option<&str>) -> Vec<usize> {
        self.tickers
            .iter()
            .enumerate()
            .filter(|(_, t)| filter.is_none_or(|sel| host.matches(t.element, sel)))
            .map(|(i, _)| i)
            .collect()
    }

    fn handle_ticker_event(&mut self, host: &mut H, idx: usize, event: HostEvent<H::Node>) {
        let reduced = self.reduced_motion;
        let ticker = &mut self.tickers[idx];
        match event {
            HostEvent::PointerEnter { .. } => ticker.interaction.pointer_enter(&ticker.config),
            HostEvent::PointerLeave { .. } => ticker.interaction.pointer_leave(),
            HostEvent::FocusIn { .. } => ticker.interaction.focus_in(&ticker.config),
            HostEvent::FocusOut { related, .. } => {
                let still_inside = related.is_some_and(|r| host.contains(ticker.element, r));
                ticker.interaction.focus_out(still_inside);
            }
            HostEvent::TouchStart { at, .. } => ticker.interaction.touch_start(at, &ticker.config),
            HostEvent::TouchMove { at, .. } => ticker.interaction.touch_move(at),
            HostEvent::TouchEnd { .. } | HostEvent::TouchCancel { .. } => {
                ticker.interaction.touch_end();
            }
            HostEvent::AssetLoaded { .. } | HostEvent::ContentChanged { .. } => {
                refresh_geometry(host, ticker, true, reduced);
                self.sync_loop(host);
            }
            HostEvent::Intersection { visible, .. } => {
                ticker.interaction.set(PauseReasons::OFFSCREEN, !visible);
            }
            HostEvent::VisibilityChanged { .. }
            | HostEvent::ReducedMotionChanged { .. }
            | HostEvent::Resize(_)
            | HostEvent::OrientationChange => {}
        }
    }

    fn handle_window_event(&mut self, host: &mut H, event: HostEvent<H::Node>) {
        match event {
            HostEvent::VisibilityChanged { hidden } => {
                self.hidden = hidden;
                if let Some(stepper) = self.stepper.as_mut() {
                    if hidden {
                        stepper.pause();
                    } else {
                        stepper.resume();
                    }
                }
                self.sync_loop(host);
            }
            HostEvent::ReducedMotionChanged { reduce } => {
                self.reduced_motion = reduce;
                let viewport_width = host.viewport_size().width;
                for ticker in &mut self.tickers {
                    reconfigure(&self.options, host, ticker, viewport_width, reduce);
                }
                debug!(reduce, "reduced-motion preference changed");
            }
            HostEvent::Resize(size) => {
                self.restart_timer(host, TimerPurpose::ResizeDebounce, self.options.resize_debounce_ms);
                debug!(width = size.width, height = size.height, "resize debounced");
            }
            HostEvent::OrientationChange => {
                self.restart_timer(host, TimerPurpose::Orientation, self.options.orientation_delay_ms);
            }
            _ => {}
        }
    }

    fn restart_timer(&mut self, host: &mut H, purpose: TimerPurpose, delay_ms: f64) {
        self.timers.retain(|&(timer, p)| {
            if p == purpose {
                host.clear_timer(timer);
                false
            } else {
                true
            }
        });
        let timer = host.set_timer(delay_ms);
        self.timers.push((timer, purpose));
    }

    fn scan(&mut self, host: &mut H) -> Result<usize> {
        let containers = host.query_all(&self.options.selector);
        if containers.is_empty() {
            return Err(TickerError::ConfigurationAbsent {
                selector: self.options.selector.clone(),
            });
        }
        self.hidden = host.is_hidden();
        self.reduced_motion = host.prefers_reduced_motion();
        let touch = host.is_touch_device();
        let viewport_width = host.viewport_size().width;

        let mut built = 0;
        for element in containers {
            if self.tickers.iter().any(|t| t.element == element) {
                continue;
            }
            match self.build_ticker(host, element, viewport_width, touch) {
                Ok(ticker) => {
                    self.tickers.push(ticker);
                    built += 1;
                }
                Err(err) => warn!(?element, %err, "ticker not activated"),
            }
        }
        if built > 0 {
            self.attach_window(host, touch);
            if self.resize.is_none() {
                self.resize = Some(ResizeCoordinator::new(
                    host.viewport_size(),
                    self.options.resize_threshold,
                ));
            }
            self.sync_loop(host);
        }
        debug!(built, total = self.tickers.len(), "ticker scan complete");
        Ok(built)
    }

    fn build_ticker(
        &self,
        host: &mut H,
        element: H::Node,
        viewport_width: f64,
        touch: bool,
    ) -> Result<Ticker<H::Node>> {
        let config = config::resolve(
            &self.options,
            |name| host.attribute(element, name),
            viewport_width,
            &Overrides::default(),
            self.reduced_motion,
        );
        let structure = structure::build(host, element, &self.options.item_selector, config.gap)?;
        let mut ticker = Ticker::new(element, structure, config);
        let device = if touch {
            Listeners::TOUCH
        } else {
            Listeners::POINTER
        };
        ticker.listen(
            host,
            device | Listeners::FOCUS | Listeners::LOAD | Listeners::INTERSECTION,
        );
        refresh_geometry(host, &mut ticker, false, self.reduced_motion);
        Ok(ticker)
    }

    fn attach_window(&mut self, host: &mut H, touch: bool) {
        let mut kinds = Listeners::RESIZE | Listeners::VISIBILITY | Listeners::MEDIA;
        if touch {
            kinds |= Listeners::ORIENTATION;
        }
        let missing = kinds - self.window_listeners;
        if !missing.is_empty() {
            host.listen_window(missing);
            self.window_listeners |= missing;
        }
    }

    fn schedule_retry(&mut self, host: &mut H) {
        let Some(retry) = self.retry.as_mut() else {
            return;
        };
        match retry.fail() {
            RetryStep::RetryAfter(delay_ms) => {
                let timer = host.set_timer(delay_ms);
                self.timers.push((timer, TimerPurpose::Retry));
                debug!(delay_ms, state = ?retry.state(), "waiting for ticker content");
            }
            RetryStep::GiveUp => {
                error!(
                    attempts = self.options.retry.max_attempts,
                    selector = %self.options.selector,
                    "ticker content never arrived; giving up"
                );
            }
        }
    }

    fn retry_scan(&mut self, host: &mut H) {
        if let Err(err) = self.scan(host) {
            debug!(%err, "ticker content still not ready");
        }
        if self.tickers.is_empty() {
            self.schedule_retry(host);
        } else if let Some(retry) = self.retry.as_mut() {
            retry.succeed();
        }
    }

    fn rebuild_all(&mut self, host: &mut H) {
        let viewport_width = host.viewport_size().width;
        let reduced = self.reduced_motion;
        for ticker in &mut self.tickers {
            let element = ticker.element;
            let config = config::resolve(
                &self.options,
                |name| host.attribute(element, name),
                viewport_width,
                &ticker.overrides,
                reduced,
            );
            ticker.config = config;
            ticker.interaction.reconcile(&config);
            refresh_geometry(host, ticker, true, reduced);
        }
        self.sync_loop(host);
    }

    /// Run the loop while the page is visible and some ticker is (or was) ready.
    fn sync_loop(&mut self, host: &mut H) {
        let running = self.frame_loop.is_running();
        let should_run = !self.hidden
            && self.stepper.is_some()
            && !self.tickers.is_empty()
            && (running || self.tickers.iter().any(|t| t.state == TickerState::Ready));
        if should_run && !running {
            let frame = host.request_frame();
            self.frame_loop.start(frame);
            debug!(tickers = self.tickers.len(), "frame loop started");
        } else if !should_run && running {
            if let Some(frame) = self.frame_loop.stop() {
                host.cancel_frame(frame);
            }
            debug!("frame loop stopped");
        }
    }
}

/// Re-resolve a ticker's configuration in place, refreshing geometry only if the gap moved.
fn reconfigure<H: Host>(
    options: &Options,
    host: &mut H,
    ticker: &mut Ticker<H::Node>,
    viewport_width: f64,
    reduced: bool,
) {
    let element = ticker.element;
    let config = config::resolve(
        options,
        |name| host.attribute(element, name),
        viewport_width,
        &ticker.overrides,
        reduced,
    );
    let previous = ticker.config;
    ticker.config = config;
    ticker.interaction.reconcile(&config);
    if config.gap != previous.gap {
        refresh_geometry(host, ticker, true, reduced);
    } else if reduced {
        let parked = motion::initial_offset(ticker.single_set_width, config.direction);
        ticker.apply_offset(host, parked);
    } else if config.direction != previous.direction && ticker.single_set_width > 0.0 {
        let offset = motion::normalize(ticker.offset, ticker.single_set_width, config.direction);
        ticker.apply_offset(host, offset);
    }
}

/// Re-measure, re-clone and place the track.
///
/// With `preserve` the offset keeps its fraction of the cycle; `parked` pins it at the cycle start.
fn refresh_geometry<H: Host>(host: &mut H, ticker: &mut Ticker<H::Node>, preserve: bool, parked: bool) {
    let track = ticker.track();
    let gap = ticker.config.gap;
    host.set_presentation(track, structure::track_presentation(gap));
    let count = ticker.original_items().len();
    match measure::single_set_width(host, track, count, gap) {
        Ok(width) => {
            let direction = ticker.config.direction;
            let offset = if parked {
                motion::initial_offset(width, direction)
            } else if preserve {
                resize::carry_progress(ticker.offset, ticker.single_set_width, width, direction)
            } else {
                motion::initial_offset(width, direction)
            };
            ticker.single_set_width = width;
            ticker.state = TickerState::Ready;
            let viewport_width = visible_width(host, ticker.viewport());
            clones::refill(
                host,
                track,
                ticker.structure.originals(),
                viewport_width,
                width,
                &mut ticker.clones,
            );
            ticker.apply_offset(host, offset);
        }
        Err(err) => {
            debug!(%err, "ticker inert until its content has width");
            clones::clear(host, &mut ticker.clones);
            ticker.single_set_width = 0.0;
            ticker.state = TickerState::Inert;
            ticker.apply_offset(host, 0.0);
        }
    }
}

fn visible_width<H: Host>(host: &mut H, viewport: H::Node) -> f64 {
    let width = host.offset_width(viewport);
    if width > 0.0 {
        width
    } else {
        host.viewport_size().width
    }
}

#[cfg(all(test, feature = "document_adapter"))]
mod tests {
    use kurbo::{Point, Size};
    use understory_document::{Document, Element, EventMask, NodeId};

    use super::*;
    use crate::adapters::document::{advance, pump, run_for};
    use crate::stepper::TweenStepper;

    fn options() -> Options {
        Options {
            breakpoints: Vec::new(),
            ..Options::default()
        }
    }

    fn item(width: f64) -> Element {
        Element::new("span").with_class("ticker-item").with_width(width)
    }

    /// A 400px-wide page with one ticker holding three 100px items.
    fn page() -> (Document, NodeId) {
        let mut doc = Document::new(Size::new(400.0, 300.0));
        let ticker = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
        for _ in 0..3 {
            doc.insert(ticker, item(100.0));
        }
        (doc, ticker)
    }

    fn offset(engine: &Engine<Document>, element: NodeId) -> f64 {
        engine.ticker(element).unwrap().offset()
    }

    #[test]
    fn three_items_scroll_half_a_cycle_in_three_point_four_seconds() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        assert_eq!(engine.initialize(&mut doc), 1);

        let t = engine.ticker(el).unwrap();
        assert_eq!(t.single_set_width(), 340.0);
        assert_eq!(t.state(), TickerState::Ready);
        assert_eq!(t.clones().len(), 9);
        assert!(engine.is_running());

        pump(&mut engine, &mut doc);
        run_for(&mut engine, &mut doc, 3400.0, 20.0);
        assert_eq!(offset(&engine, el), -170.0);
        let track = engine.ticker(el).unwrap().track();
        assert_eq!(
            doc.style(track).unwrap().transform.translation().x,
            -170.0
        );
    }

    #[test]
    fn track_covers_two_viewports_plus_a_cycle() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        let track = engine.ticker(el).unwrap().track();
        assert!(doc.scroll_width(track) >= 2.0 * 400.0 + 340.0);
    }

    #[test]
    fn repeat_initialize_is_a_no_op() {
        let (mut doc, _) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        let listeners = doc.listener_count();
        assert_eq!(engine.initialize(&mut doc), 0);
        assert_eq!(engine.tickers().len(), 1);
        assert_eq!(doc.listener_count(), listeners);
    }

    #[test]
    fn long_frames_are_capped() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        pump(&mut engine, &mut doc);
        advance(&mut engine, &mut doc, 1000.0);
        // 50 ms cap at 50 px/s
        assert_eq!(offset(&engine, el), -2.5);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        pump(&mut engine, &mut doc);
        run_for(&mut engine, &mut doc, 200.0, 20.0);
        let before = offset(&engine, el);

        assert_eq!(engine.pause(&doc, None), 1);
        run_for(&mut engine, &mut doc, 1000.0, 20.0);
        assert_eq!(offset(&engine, el), before);
        assert!(engine.is_running(), "pausing every ticker keeps the loop alive");

        engine.resume(&doc, Some(".ticker"));
        run_for(&mut engine, &mut doc, 20.0, 20.0);
        assert_eq!(offset(&engine, el), before - 1.0);
    }

    #[test]
    fn filter_selects_tickers() {
        let (mut doc, a) = page();
        let b = doc.insert(
            doc.root(),
            Element::new("div").with_class("ticker").with_class("slow"),
        );
        doc.insert(b, item(100.0));
        let mut engine = Engine::new(options());
        assert_eq!(engine.initialize(&mut doc), 2);

        assert_eq!(engine.set_speed(&mut doc, 10.0, Some(".slow")), 1);
        assert_eq!(engine.ticker(a).unwrap().config().speed, 50.0);
        assert_eq!(engine.ticker(b).unwrap().config().speed, 10.0);
        assert_eq!(engine.set_speed(&mut doc, -1.0, None), 0);
        assert_eq!(engine.pause(&doc, Some(".missing")), 0);
    }

    #[test]
    fn hover_and_focus_pause() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        let inner = engine.ticker(el).unwrap().clones()[0];

        engine.handle_event(&mut doc, HostEvent::PointerEnter { target: inner });
        assert!(engine.ticker(el).unwrap().is_paused());
        engine.handle_event(&mut doc, HostEvent::PointerLeave { target: el });
        assert!(!engine.ticker(el).unwrap().is_paused());

        engine.handle_event(&mut doc, HostEvent::FocusIn { target: inner });
        engine.handle_event(
            &mut doc,
            HostEvent::FocusOut {
                target: inner,
                related: Some(el),
            },
        );
        assert_eq!(
            engine.ticker(el).unwrap().pause_reasons(),
            PauseReasons::FOCUS
        );
        engine.handle_event(
            &mut doc,
            HostEvent::FocusOut {
                target: el,
                related: None,
            },
        );
        assert!(!engine.ticker(el).unwrap().is_paused());
    }

    #[test]
    fn hover_attribute_disables_hover_pause() {
        let (mut doc, el) = page();
        doc.set_attribute(el, "ticker-pause-on-hover", "false");
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        engine.handle_event(&mut doc, HostEvent::PointerEnter { target: el });
        assert!(!engine.ticker(el).unwrap().is_paused());
    }

    #[test]
    fn touch_devices_use_touch_not_pointer() {
        let (mut doc, el) = page();
        doc.set_touch(true);
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        assert!(doc.listeners(el).contains(EventMask::TOUCH));
        assert!(!doc.listeners(el).contains(EventMask::POINTER));
        assert!(doc.window_listeners().contains(EventMask::ORIENTATION));

        engine.handle_event(&mut doc, HostEvent::PointerEnter { target: el });
        assert!(!engine.ticker(el).unwrap().is_paused());

        engine.handle_event(
            &mut doc,
            HostEvent::TouchStart {
                target: el,
                at: Point::new(100.0, 100.0),
            },
        );
        assert!(engine.ticker(el).unwrap().is_paused());
        engine.handle_event(
            &mut doc,
            HostEvent::TouchMove {
                target: el,
                at: Point::new(105.0, 160.0),
            },
        );
        assert!(!engine.ticker(el).unwrap().is_paused(), "vertical scroll resumes");
    }

    #[test]
    fn offscreen_pauses() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        engine.handle_event(
            &mut doc,
            HostEvent::Intersection {
                target: el,
                visible: false,
            },
        );
        assert_eq!(
            engine.ticker(el).unwrap().pause_reasons(),
            PauseReasons::OFFSCREEN
        );
    }

    #[test]
    fn hidden_page_stops_the_loop() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        pump(&mut engine, &mut doc);

        doc.set_hidden(true);
        engine.handle_event(&mut doc, HostEvent::VisibilityChanged { hidden: true });
        assert!(!engine.is_running());
        assert_eq!(doc.clock().pending_frames(), 0);
        let parked = offset(&engine, el);

        doc.set_hidden(false);
        engine.handle_event(&mut doc, HostEvent::VisibilityChanged { hidden: false });
        assert!(engine.is_running());
        // First frame after resuming has a zero step even after a long absence.
        advance(&mut engine, &mut doc, 5000.0);
        assert_eq!(offset(&engine, el), parked);
        run_for(&mut engine, &mut doc, 20.0, 20.0);
        assert_eq!(offset(&engine, el), parked - 1.0);
    }

    #[test]
    fn resize_preserves_progress_fraction() {
        // Default breakpoints: 400px is mobile (gap 10, 40 px/s), 1200px has none (gap 20).
        let (mut doc, el) = page();
        let mut engine = Engine::new(Options::default());
        engine.initialize(&mut doc);
        assert_eq!(engine.ticker(el).unwrap().single_set_width(), 320.0);

        pump(&mut engine, &mut doc);
        run_for(&mut engine, &mut doc, 2400.0, 20.0);
        assert!((offset(&engine, el) + 96.0).abs() < 1e-9);

        engine.pause(&doc, None);
        doc.set_viewport(Size::new(1200.0, 300.0));
        engine.handle_event(&mut doc, HostEvent::Resize(Size::new(1200.0, 300.0)));
        advance(&mut engine, &mut doc, 100.0);
        assert_eq!(engine.ticker(el).unwrap().single_set_width(), 320.0, "still debouncing");
        advance(&mut engine, &mut doc, 150.0);

        let t = engine.ticker(el).unwrap();
        assert_eq!(t.single_set_width(), 340.0);
        assert_eq!(t.config().speed, 50.0);
        assert!((t.offset() + 102.0).abs() < 1e-9, "{}", t.offset());
        let track = t.track();
        assert!(doc.scroll_width(track) >= 2.0 * 1200.0 + 340.0);
    }

    #[test]
    fn small_and_height_only_resizes_do_not_rebuild() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        let clones = engine.ticker(el).unwrap().clones().to_vec();

        for size in [Size::new(400.0, 900.0), Size::new(460.0, 900.0)] {
            doc.set_viewport(size);
            engine.handle_event(&mut doc, HostEvent::Resize(size));
            advance(&mut engine, &mut doc, 250.0);
        }

        assert_eq!(engine.ticker(el).unwrap().clones(), clones.as_slice());
    }

    #[test]
    fn resize_notifications_are_debounced() {
        let (mut doc, _) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        for w in [500.0, 600.0, 700.0] {
            let size = Size::new(w, 300.0);
            doc.set_viewport(size);
            engine.handle_event(&mut doc, HostEvent::Resize(size));
            advance(&mut engine, &mut doc, 100.0);
        }
        assert_eq!(doc.clock().pending_timers(), 1);
    }

    #[test]
    fn orientation_change_forces_rebuild_on_touch() {
        let (mut doc, el) = page();
        doc.set_touch(true);
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        let clones = engine.ticker(el).unwrap().clones().to_vec();

        doc.set_viewport(Size::new(420.0, 300.0));
        engine.handle_event(&mut doc, HostEvent::OrientationChange);
        advance(&mut engine, &mut doc, 300.0);
        let t = engine.ticker(el).unwrap();
        assert_eq!(t.clones().len(), clones.len());
        assert!(clones.iter().all(|c| !doc.is_alive(*c)), "clones regenerated");
    }

    #[test]
    fn reduced_motion_parks_at_the_cycle_start() {
        let (mut doc, el) = page();
        doc.set_reduced_motion(true);
        doc.set_attribute(el, "ticker-direction", "reverse");
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        assert_eq!(engine.ticker(el).unwrap().config().speed, 0.0);
        assert_eq!(offset(&engine, el), -340.0, "reverse range is [-W, 0)");

        pump(&mut engine, &mut doc);
        run_for(&mut engine, &mut doc, 1000.0, 20.0);
        assert_eq!(offset(&engine, el), -340.0);

        doc.set_reduced_motion(false);
        engine.handle_event(&mut doc, HostEvent::ReducedMotionChanged { reduce: false });
        assert_eq!(engine.ticker(el).unwrap().config().speed, 50.0);
        run_for(&mut engine, &mut doc, 20.0, 20.0);
        assert_eq!(offset(&engine, el), -339.0);
    }

    #[test]
    fn live_reduced_motion_change_parks_running_tickers() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        pump(&mut engine, &mut doc);
        run_for(&mut engine, &mut doc, 400.0, 20.0);
        engine.handle_event(&mut doc, HostEvent::ReducedMotionChanged { reduce: true });
        assert_eq!(offset(&engine, el), 0.0);
        assert_eq!(engine.set_speed(&mut doc, 90.0, None), 1);
        assert_eq!(engine.ticker(el).unwrap().config().speed, 0.0, "reduced motion wins");
    }

    #[test]
    fn live_reduced_motion_parks_reverse_tickers_in_range() {
        let (mut doc, el) = page();
        doc.set_attribute(el, "ticker-direction", "reverse");
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        pump(&mut engine, &mut doc);
        run_for(&mut engine, &mut doc, 400.0, 20.0);
        engine.handle_event(&mut doc, HostEvent::ReducedMotionChanged { reduce: true });
        assert_eq!(offset(&engine, el), -340.0);
    }

    #[test]
    fn very_fast_tickers_stay_within_one_cycle() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        assert_eq!(engine.set_speed(&mut doc, 20_000.0, None), 1);
        pump(&mut engine, &mut doc);

        let track = engine.ticker(el).unwrap().track();
        let track_width = doc.scroll_width(track);
        for _ in 0..10 {
            // Every frame hits the 50 ms cap and moves 1000 px.
            advance(&mut engine, &mut doc, 50.0);
            let o = offset(&engine, el);
            assert!(o > -340.0 && o <= 0.0, "offset {o} left the cycle");
            assert!(track_width + o >= 400.0, "track must still cover the viewport");
        }
    }

    #[test]
    fn set_direction_renormalizes() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        engine.set_direction(&mut doc, Direction::Reverse, None);
        assert_eq!(offset(&engine, el), -340.0);
        pump(&mut engine, &mut doc);
        run_for(&mut engine, &mut doc, 20.0, 20.0);
        assert_eq!(offset(&engine, el), -339.0);
    }

    #[test]
    fn content_absent_leaves_element_untouched() {
        let mut doc = Document::new(Size::new(400.0, 300.0));
        let el = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
        let p = doc.insert(el, Element::new("p").with_width(120.0));
        let mut engine = Engine::new(options());
        assert_eq!(engine.initialize(&mut doc), 0);
        assert!(engine.tickers().is_empty());
        assert_eq!(doc.children(el), &[p]);
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.clock().pending_frames(), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn no_containers_is_silent() {
        let mut doc = Document::new(Size::new(400.0, 300.0));
        let mut engine = Engine::new(options());
        assert_eq!(engine.initialize(&mut doc), 0);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn zero_width_content_waits_for_assets() {
        let mut doc = Document::new(Size::new(400.0, 300.0));
        let el = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
        for _ in 0..3 {
            doc.insert(el, Element::new("img").with_class("ticker-item"));
        }
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        let t = engine.ticker(el).unwrap();
        assert_eq!(t.state(), TickerState::Inert);
        assert!(t.clones().is_empty());
        assert!(!engine.is_running());

        let track = t.track();
        let mut images = t.original_items().to_vec();
        images.extend_from_slice(doc.children(track));
        for img in &images {
            doc.set_intrinsic_width(*img, 100.0);
        }
        engine.handle_event(&mut doc, HostEvent::AssetLoaded { target: images[3] });

        let t = engine.ticker(el).unwrap();
        assert_eq!(t.state(), TickerState::Ready);
        assert_eq!(t.single_set_width(), 340.0);
        assert_eq!(t.clones().len(), 9);
        assert!(engine.is_running());
    }

    #[test]
    fn retry_builds_once_content_arrives() {
        let mut doc = Document::new(Size::new(400.0, 300.0));
        let el = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
        let mut engine = Engine::new(options());
        assert_eq!(engine.initialize_with_retry(&mut doc), 0);
        assert_eq!(doc.clock().pending_timers(), 1);

        advance(&mut engine, &mut doc, 500.0);
        assert!(engine.tickers().is_empty());

        doc.insert(el, item(100.0));
        advance(&mut engine, &mut doc, 500.0);
        assert_eq!(engine.tickers().len(), 1);
        assert_eq!(doc.clock().pending_timers(), 0);
        assert!(engine.is_running());
    }

    #[test]
    fn retry_gives_up_after_the_policy_runs_out() {
        let mut doc = Document::new(Size::new(400.0, 300.0));
        let mut engine = Engine::new(options());
        engine.initialize_with_retry(&mut doc);
        for _ in 0..10 {
            advance(&mut engine, &mut doc, 500.0);
        }
        assert_eq!(doc.clock().pending_timers(), 0);
        assert!(engine.tickers().is_empty());
    }

    #[test]
    fn destroy_restores_the_document() {
        let (mut doc, el) = page();
        let original_children = doc.children(el).to_vec();
        let before = doc.element(el).unwrap().clone();

        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        pump(&mut engine, &mut doc);
        run_for(&mut engine, &mut doc, 500.0, 20.0);
        engine.handle_event(&mut doc, HostEvent::Resize(Size::new(900.0, 300.0)));
        engine.destroy(&mut doc);

        assert_eq!(doc.children(el), original_children.as_slice());
        assert_eq!(doc.element(el).unwrap(), &before);
        assert_eq!(doc.query_all(".ticker-item").len(), 3);
        assert!(doc.query_all(".ticker-track").is_empty());
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.clock().pending_frames(), 0);
        assert_eq!(doc.clock().pending_timers(), 0);
        assert!(engine.tickers().is_empty());
        assert!(!engine.is_running());

        engine.handle_event(&mut doc, HostEvent::PointerEnter { target: el });
        advance(&mut engine, &mut doc, 1000.0);
        assert_eq!(doc.children(el), original_children.as_slice());
    }

    #[test]
    fn destroyed_engine_can_initialize_again() {
        let (mut doc, el) = page();
        let mut engine = Engine::new(options());
        engine.initialize(&mut doc);
        engine.destroy(&mut doc);
        assert_eq!(engine.initialize(&mut doc), 1);
        assert_eq!(engine.ticker(el).unwrap().single_set_width(), 340.0);
    }

    #[test]
    fn failed_backend_leaves_content_static() {
        let (mut doc, el) = page();
        let children = doc.children(el).to_vec();
        let mut engine: Engine<Document> = Engine::with_backend(options(), || {
            Err(TickerError::ExternalDependencyUnavailable {
                backend: "tween".into(),
                reason: "not loaded".into(),
            })
        });
        assert!(engine.is_inert());
        assert_eq!(engine.initialize(&mut doc), 0);
        assert_eq!(doc.children(el), children.as_slice());
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.clock().pending_frames(), 0);
    }

    #[test]
    fn tween_backend_drives_tickers() {
        let (mut doc, el) = page();
        let mut engine: Engine<Document> =
            Engine::with_backend(options(), || Ok(Box::new(TweenStepper::new())));
        assert_eq!(engine.stepper_name(), Some("tween"));
        engine.initialize(&mut doc);
        pump(&mut engine, &mut doc);
        run_for(&mut engine, &mut doc, 1000.0, 20.0);
        assert!((offset(&engine, el) + 50.0).abs() < 1e-9);
    }
}
