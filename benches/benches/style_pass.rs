// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_style` resolution passes.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Once;
use std::vec::Vec;

use understory_motion::ManualClock;
use understory_property::ErasedValue;
use understory_style::{
    Declaration, Diagnostics, NoReferences, NodeId, Specificity, StyleEngine, StyleProperties,
    cascade, sort_by_precedence,
};

fn declarations(i: u32) -> Vec<Declaration> {
    let mut decls = vec![
        Declaration::new("color", "#336699").with_specificity(Specificity(0, 1, 0)),
        Declaration::new("color", "red").with_order(i),
        Declaration::new("font-size", "1.2em"),
        Declaration::new("letter-spacing", "0.05em"),
        Declaration::new("border-top-color", "currentColor"),
        Declaration::new("background-image", "a.png, b.png"),
        Declaration::new("background-position", "left, 1em 2em"),
        Declaration::new("transition-property", "opacity, translate"),
        Declaration::new("transition-duration", "200ms"),
    ];
    if i % 3 == 0 {
        decls.push(Declaration::new("opacity", 0.5));
    }
    decls
}

/// A balanced tree of `fanout.pow(depth)` leaves.
fn build(fanout: u32, depth: u32) -> (StyleEngine, Vec<NodeId>) {
    let mut engine = StyleEngine::builder().build();
    let mut nodes = Vec::new();
    let mut level = vec![engine.insert(None, declarations(0)).unwrap()];
    nodes.extend(&level);
    for _ in 0..depth {
        let mut next = Vec::new();
        for parent in &level {
            for i in 0..fanout {
                let node = engine.insert(Some(*parent), declarations(i)).unwrap();
                next.push(node);
            }
        }
        nodes.extend(&next);
        level = next;
    }
    (engine, nodes)
}

fn bench_style_pass(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: ErasedValue={} Declaration={} properties={}",
            core::mem::size_of::<ErasedValue>(),
            core::mem::size_of::<Declaration>(),
            StyleProperties::global().registry().len(),
        );
    });

    let mut group = c.benchmark_group("style/cascade");
    let props = StyleProperties::global();
    let mut decls = declarations(3);
    sort_by_precedence(&mut decls);
    group.bench_function("single_element", |b| {
        b.iter(|| {
            let mut diagnostics = Diagnostics::new(true);
            black_box(cascade(
                props.registry(),
                &decls,
                None,
                None,
                &mut diagnostics,
            ))
        });
    });
    group.finish();

    let mut group = c.benchmark_group("style/resolve");
    for (fanout, depth) in [(4_u32, 3_u32), (8, 3)] {
        let (mut engine, nodes) = build(fanout, depth);
        let clock = ManualClock::new();
        engine.resolve(&clock, &NoReferences);

        group.bench_function(BenchmarkId::new("steady", nodes.len()), |b| {
            b.iter(|| {
                engine.resolve(&clock, &NoReferences);
                black_box(engine.passes())
            });
        });

        group.bench_function(BenchmarkId::new("transitioning", nodes.len()), |b| {
            b.iter_batched(
                || {
                    let (mut engine, nodes) = build(fanout, depth);
                    let clock = ManualClock::new();
                    engine.resolve(&clock, &NoReferences);
                    for (i, node) in nodes.iter().enumerate() {
                        let mut decls = declarations(u32::try_from(i).unwrap());
                        decls.push(Declaration::new("opacity", 0.0).important());
                        engine.set_declarations(*node, decls);
                    }
                    engine.resolve(&clock, &NoReferences);
                    clock.set(0.1);
                    (engine, clock)
                },
                |(mut engine, clock)| {
                    engine.resolve(&clock, &NoReferences);
                    black_box(engine.is_active())
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_style_pass);
criterion_main!(benches);
