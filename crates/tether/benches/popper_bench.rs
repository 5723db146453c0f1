//! Benchmarks for popper positioning and overlay bookkeeping.
//!
//! Run with: `cargo bench --package tether --bench popper_bench`
//!
//! # Performance Baselines
//!
//! These benchmarks establish baselines for:
//! - A full update cycle with the default modifier list
//! - Update cycles that flip, for each side
//! - Open/close churn on the overlay stack

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tether::prelude::*;
use tether_core::Overflow;
use tether_core::memory_dom::MemoryDom;
use web_time::Instant;

// ============================================================================
// Fixtures
// ============================================================================

fn fixture(reference: Rect, options: PopperOptions) -> (MemoryDom, Popper) {
    let mut dom = MemoryDom::new(Size::new(1280.0, 800.0));
    let body = dom.body();
    let reference = dom.element(body, "button", reference);
    let popper = dom.element(body, "div", Rect::new(0.0, 0.0, 180.0, 96.0));
    let engine =
        Popper::new(&mut dom, Some(reference), popper, options).expect("fixture popper");
    (dom, engine)
}

/// A reference nested in `depth` scrolling containers.
fn nested_fixture(depth: usize) -> (MemoryDom, Popper) {
    let mut dom = MemoryDom::new(Size::new(1280.0, 800.0));
    let body = dom.body();
    let mut parent = body;
    for _ in 0..depth {
        parent = dom.element(parent, "div", Rect::new(0.0, 0.0, 1280.0, 800.0));
        dom.set_overflow(parent, Overflow::Auto);
    }
    let reference = dom.element(parent, "button", Rect::new(600.0, 380.0, 80.0, 32.0));
    let popper = dom.element(body, "div", Rect::new(0.0, 0.0, 180.0, 96.0));
    let engine = Popper::new(&mut dom, Some(reference), popper, PopperOptions::default())
        .expect("fixture popper");
    (dom, engine)
}

// ============================================================================
// Update Cycle
// ============================================================================

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("popper/update");

    let (mut dom, mut engine) = fixture(
        Rect::new(600.0, 380.0, 80.0, 32.0),
        PopperOptions::default(),
    );
    group.bench_function("centered", |b| {
        b.iter(|| black_box(engine.update(&mut dom).map(|data| data.placement)));
    });

    for depth in [1usize, 8, 32] {
        let (mut dom, mut engine) = nested_fixture(depth);
        group.bench_with_input(BenchmarkId::new("nested", depth), &depth, |b, _| {
            b.iter(|| black_box(engine.update(&mut dom).map(|data| data.placement)));
        });
    }

    group.finish();
}

fn bench_flip(c: &mut Criterion) {
    let mut group = c.benchmark_group("popper/flip");

    // References pinned to each viewport edge so the preferred side overflows.
    let cases = [
        (Side::Top, Rect::new(600.0, 4.0, 80.0, 32.0)),
        (Side::Bottom, Rect::new(600.0, 764.0, 80.0, 32.0)),
        (Side::Left, Rect::new(4.0, 380.0, 80.0, 32.0)),
        (Side::Right, Rect::new(1196.0, 380.0, 80.0, 32.0)),
    ];
    for (side, rect) in cases {
        let options = PopperOptions::default().placement(side.into());
        let (mut dom, mut engine) = fixture(rect, options);
        group.bench_function(side.as_str(), |b| {
            b.iter(|| black_box(engine.update(&mut dom).map(|data| data.flipped)));
        });
    }

    group.finish();
}

// ============================================================================
// Overlay Stack
// ============================================================================

fn bench_overlay_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay/churn");
    let ids: Vec<String> = (0..16).map(|i| format!("dialog-{i}")).collect();

    for depth in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::new("open_close", depth), &depth, |b, &depth| {
            let mut dom = MemoryDom::new(Size::new(1280.0, 800.0));
            let overlays = OverlayCoordinator::default();
            let now = Instant::now();
            b.iter(|| {
                for id in &ids[..depth] {
                    let z = overlays.next_z_index();
                    overlays.open(&mut dom, id, OpenRequest::new(z), now);
                }
                for id in ids[..depth].iter().rev() {
                    overlays.close(&mut dom, id, now);
                }
                black_box(overlays.depth())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update, bench_flip, bench_overlay_churn);
criterion_main!(benches);
