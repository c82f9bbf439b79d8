// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_document::{Document, Element, NodeId};
use understory_marquee::adapters::document::{advance, pump};
use understory_marquee::{Engine, HostEvent, Options};

fn page(tickers: usize, items: usize, viewport: f64) -> (Document, Vec<NodeId>) {
    let mut doc = Document::new(Size::new(viewport, 800.0));
    let mut out = Vec::with_capacity(tickers);
    for t in 0..tickers {
        let ticker = doc.insert(doc.root(), Element::new("div").with_class("ticker"));
        for i in 0..items {
            let width = 80.0 + ((t * 31 + i * 17) % 120) as f64;
            doc.insert(ticker, Element::new("span").with_class("ticker-item").with_width(width));
        }
        out.push(ticker);
    }
    (doc, out)
}

fn running(tickers: usize, items: usize, viewport: f64) -> (Engine<Document>, Document) {
    let (mut doc, _) = page(tickers, items, viewport);
    let mut engine = Engine::new(Options::default());
    engine.initialize(&mut doc);
    pump(&mut engine, &mut doc);
    (engine, doc)
}

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("marquee_frames");
    for &(tickers, items) in &[(1_usize, 8_usize), (16, 8), (64, 24)] {
        let (mut engine, mut doc) = running(tickers, items, 1440.0);
        group.bench_function(format!("frame/{tickers}x{items}"), |b| {
            b.iter(|| {
                advance(&mut engine, &mut doc, black_box(16.0));
            });
        });
    }
    group.finish();
}

fn bench_initialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("marquee_initialize");
    for &viewport in &[480.0_f64, 1440.0, 3840.0] {
        group.bench_function(format!("initialize/16x12@{viewport}"), |b| {
            b.iter_batched(
                || page(16, 12, viewport).0,
                |mut doc| {
                    let mut engine = Engine::new(Options::default());
                    black_box(engine.initialize(&mut doc));
                    engine
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    c.bench_function("marquee_resize/16x12", |b| {
        b.iter_batched(
            || running(16, 12, 1440.0),
            |(mut engine, mut doc)| {
                let size = Size::new(700.0, 800.0);
                doc.set_viewport(size);
                engine.handle_event(&mut doc, HostEvent::Resize(size));
                let debounce = engine.options().resize_debounce_ms;
                advance(&mut engine, &mut doc, debounce);
                (engine, doc)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_frames, bench_initialize, bench_resize);
criterion_main!(benches);
