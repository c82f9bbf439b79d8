// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One ticker, built, animated and torn down.
//!
//! This example builds a small headless page with a single ticker, lets two
//! seconds pass in 16 ms frames and prints the track translation as it moves.
//!
//! Run:
//! - `cargo run -p understory_demos --example marquee_basics`
//! - `RUST_LOG=understory_marquee=debug cargo run -p understory_demos --example marquee_basics`

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_document::{Document, Element};
use understory_marquee::adapters::document::{advance, pump};
use understory_marquee::{Engine, Options};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new(Size::new(1280.0, 720.0));
    let ticker = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
    for (label, width) in [("Breaking", 120.0), ("Markets up", 180.0), ("Weather: sunny", 240.0)] {
        doc.insert(
            ticker,
            Element::new("span")
                .with_class("ticker-item")
                .with_text(label)
                .with_width(width),
        );
    }

    let mut engine = Engine::new(Options::default());
    let built = engine.initialize(&mut doc);
    let t = engine.ticker(ticker).expect("ticker was built");
    println!("== Built ==");
    println!("  tickers: {built}");
    println!("  single set width: {}", t.single_set_width());
    println!("  clones: {}", t.clones().len());
    println!("  config: {:?}", t.config());

    pump(&mut engine, &mut doc);
    println!("== Running ==");
    for step in 1..=125 {
        advance(&mut engine, &mut doc, 16.0);
        if step % 25 == 0 {
            let offset = engine.ticker(ticker).map_or(0.0, |t| t.offset());
            println!("  t = {:>5} ms  offset = {offset:>8.2}", step * 16);
        }
    }

    engine.destroy(&mut doc);
    println!("== Destroyed ==");
    println!("  children restored: {}", doc.children(ticker).len());
    assert_eq!(doc.children(ticker).len(), 3);
}
