// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_marquee --heading-base-level=0

//! Understory Marquee: a headless engine for infinitely scrolling tickers.
//!
//! A ticker keeps a row of variable-width content moving at a constant speed
//! forever, with no visible jump where the content repeats. The engine does
//! this without any "loop forever" primitive from the host:
//!
//! - It measures the rendered width of one pass over the content (the
//!   single-set width) from live layout.
//! - It appends hidden copies of the content until the track is wider than two
//!   viewports plus one pass, so every offset shows a full row.
//! - It advances an offset by elapsed time each frame and wraps it by exactly
//!   one single-set width, which lands on an identical picture.
//! - On resize it keeps the *fraction* of the pass already travelled, not the
//!   raw pixel offset.
//!
//! ## Host seam
//!
//! The engine never owns a document. It drives whatever implements
//! [`Document`], [`Scheduler`] and [`Environment`] (together [`Host`]), and the
//! host calls back into [`Engine::on_frame`], [`Engine::on_timer`] and
//! [`Engine::handle_event`]. With the default `document_adapter` feature the
//! traits are implemented for the headless `understory_document::Document`,
//! which is how the tests, demos and benches run.
//!
//! ## Configuration
//!
//! [`Options`] carries global defaults and responsive [`Breakpoint`]s and can be
//! read from JSON. Each container may override `speed`, `gap`, `direction`,
//! `pause-on-hover` and `pause-on-focus` through attributes (prefix `ticker-`).
//! See [`config`] for the precedence rules.
//!
//! ## Pausing
//!
//! Every ticker keeps a set of [`PauseReasons`] (hover, focus, touch, API,
//! offscreen) and stands still while any is active. A hidden page stops the
//! shared frame loop, and a reduced-motion preference forces speed zero.
//!
//! ## Failure model
//!
//! Nothing the host calls returns an error. Missing containers, containers
//! without items and content without width are logged through `tracing` and
//! leave the document static; see [`TickerError`].
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::Size;
//! use understory_document::{Document, Element};
//! use understory_marquee::adapters::document::{pump, run_for};
//! use understory_marquee::{Engine, Options};
//!
//! let mut doc = Document::new(Size::new(400.0, 120.0));
//! let ticker = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
//! for _ in 0..3 {
//!     doc.insert(ticker, Element::new("span").with_class("ticker-item").with_width(100.0));
//! }
//!
//! let options = Options { breakpoints: Vec::new(), ..Options::default() };
//! let mut engine = Engine::new(options);
//! assert_eq!(engine.initialize(&mut doc), 1);
//! assert_eq!(engine.ticker(ticker).unwrap().single_set_width(), 340.0);
//!
//! pump(&mut engine, &mut doc);
//! run_for(&mut engine, &mut doc, 3400.0, 20.0);
//! assert_eq!(engine.ticker(ticker).unwrap().offset(), -170.0);
//!
//! engine.destroy(&mut doc);
//! assert_eq!(doc.children(ticker).len(), 3);
//! ```

pub mod adapters;
pub mod clones;
pub mod config;
pub mod measure;
pub mod motion;
pub mod resize;
pub mod structure;

mod driver;
mod engine;
mod error;
mod event;
mod host;
mod interaction;
mod retry;
mod stepper;
mod ticker;

pub use config::{Breakpoint, Direction, Options, Overrides, TickerConfig};
pub use driver::FrameLoop;
pub use engine::Engine;
pub use error::{ConfigError, Result, TickerError};
pub use event::HostEvent;
pub use host::{Document, Environment, Host, Listeners, Presentation, PresentationFlags, Scheduler};
pub use interaction::{Interaction, PauseReasons, TouchTracker};
pub use resize::{ResizeCoordinator, ResizeDecision};
pub use retry::{Retry, RetryPolicy, RetryState, RetryStep};
pub use stepper::{FrameStepper, Stepper, TweenState, TweenStepper};
pub use ticker::{Ticker, TickerState};
