// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resizing keeps the scroll position as a fraction of the cycle.
//!
//! The page starts wide, scrolls for a while and is then narrowed past the
//! first breakpoint. The gap shrinks, the cycle gets shorter and the offset is
//! rescaled so the same part of the content stays in view.
//!
//! Run:
//! - `cargo run -p understory_demos --example marquee_resize`

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_document::{Document, Element};
use understory_marquee::adapters::document::{advance, pump, run_for};
use understory_marquee::{Engine, HostEvent, Options};

fn report(label: &str, engine: &Engine<Document>, ticker: understory_document::NodeId) {
    if let Some(t) = engine.ticker(ticker) {
        let fraction = understory_marquee::motion::progress_fraction(t.offset(), t.single_set_width());
        println!(
            "== {label} ==\n  gap = {}  width = {}  offset = {:.2}  fraction = {:.3}  clones = {}",
            t.config().gap,
            t.single_set_width(),
            t.offset(),
            fraction,
            t.clones().len()
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new(Size::new(1400.0, 600.0));
    let ticker = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
    for _ in 0..5 {
        doc.insert(ticker, Element::new("span").with_class("ticker-item").with_width(160.0));
    }

    let mut engine = Engine::new(Options::default());
    engine.initialize(&mut doc);
    pump(&mut engine, &mut doc);
    run_for(&mut engine, &mut doc, 4000.0, 20.0);
    report("Wide", &engine, ticker);

    let narrow = Size::new(700.0, 600.0);
    doc.set_viewport(narrow);
    engine.handle_event(&mut doc, HostEvent::Resize(narrow));
    // The rebuild waits for the debounce window to close.
    let debounce = engine.options().resize_debounce_ms;
    advance(&mut engine, &mut doc, debounce);
    report("Narrow", &engine, ticker);
}
