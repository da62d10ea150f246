// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_intercept::chain::{ChainBuilder, ChainContext, InterceptionChain};
use understory_intercept::consumer::{EventConsumer, NoOp};
use understory_intercept::dispatch::{DispatcherConfig, GestureDispatcher};
use understory_intercept::gate::{LatchedGate, NoGate};
use understory_intercept::policy::{Axis, DisplacementConfig, DisplacementPolicy, Never};
use understory_intercept::trace::EventLog;
use understory_intercept::types::{Action, Sample};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A down, `moves` jittery moves that stay within `spread`, then an up.
fn gen_gesture(moves: usize, spread: f64, seed: u64) -> Vec<Sample> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(moves + 2);
    out.push(Sample::new(Action::Down, Point::new(500.0, 500.0), 0));
    for t in 1..=moves {
        let p = Point::new(
            500.0 + (rng.next_f64() - 0.5) * spread,
            500.0 + (rng.next_f64() - 0.5) * spread,
        );
        out.push(Sample::new(Action::Move, p, t as u64 * 8));
    }
    out.push(Sample::new(Action::Up, Point::new(500.0, 500.0), (moves + 1) as u64 * 8));
    out
}

/// A horizontal drag of `moves` steps of `step` each.
fn gen_swipe(moves: usize, step: f64) -> Vec<Sample> {
    let mut out = Vec::with_capacity(moves + 2);
    out.push(Sample::new(Action::Down, Point::new(0.0, 300.0), 0));
    for t in 1..=moves {
        out.push(Sample::new(
            Action::Move,
            Point::new(t as f64 * step, 300.0),
            t as u64 * 8,
        ));
    }
    out.push(Sample::new(
        Action::Up,
        Point::new(moves as f64 * step, 300.0),
        (moves + 1) as u64 * 8,
    ));
    out
}

fn swipe_policy(name: &'static str, slop: f64) -> DisplacementPolicy {
    DisplacementPolicy::new(
        name,
        DisplacementConfig {
            slop,
            axis: Axis::X,
            ..Default::default()
        },
    )
}

fn pass_through_chain(cx: ChainContext<'_>, depth: usize) -> InterceptionChain<'_> {
    let mut b = ChainBuilder::new(cx);
    for _ in 0..depth {
        b = b.intercept(Never::new("layer"));
    }
    b.build(NoOp)
}

fn bench_forwarding(c: &mut Criterion) {
    let mut group = c.benchmark_group("forwarding");
    let gesture = gen_gesture(256, 8.0, 0xCAFE_F00D_DEAD_BEEF);
    group.throughput(Throughput::Elements(gesture.len() as u64));
    for &depth in &[1usize, 4, 16] {
        group.bench_function(format!("never_depth{}", depth), |b| {
            b.iter_batched(
                || pass_through_chain(ChainContext::untraced(&NoGate), depth),
                |mut chain| {
                    for s in &gesture {
                        chain.on_event(black_box(s));
                    }
                    black_box(chain.is_finished());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("displacement_depth{}", depth), |b| {
            b.iter_batched(
                || {
                    let mut builder = ChainBuilder::new(ChainContext::untraced(&NoGate));
                    for _ in 0..depth {
                        // Never crossed by the jitter.
                        builder = builder.intercept(swipe_policy("swipe", 1.0e3));
                    }
                    builder.build(NoOp)
                },
                |mut chain| {
                    for s in &gesture {
                        chain.on_event(black_box(s));
                    }
                    black_box(chain.is_finished());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_seize(c: &mut Criterion) {
    let mut group = c.benchmark_group("seize");
    let swipe = gen_swipe(128, 4.0);
    group.throughput(Throughput::Elements(swipe.len() as u64));
    for &depth in &[2usize, 8] {
        group.bench_function(format!("outer_seize_depth{}", depth), |b| {
            let log = EventLog::default();
            b.iter_batched(
                || {
                    log.clear();
                    let mut builder = ChainBuilder::new(ChainContext::new(&NoGate, &log))
                        .intercept(swipe_policy("outer", 40.0));
                    for _ in 1..depth {
                        builder = builder.intercept(Never::new("inner"));
                    }
                    builder.build(NoOp)
                },
                |mut chain| {
                    for s in &swipe {
                        chain.on_event(black_box(s));
                    }
                    black_box(chain.active_consumer_in_hierarchy().name().len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_dispatcher_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatcher");
    let sessions = 32usize;
    let mut stream = Vec::new();
    for i in 0..sessions {
        if i % 2 == 0 {
            stream.extend(gen_swipe(32, 4.0));
        } else {
            stream.extend(gen_gesture(32, 8.0, 0xBADC_F00D_1234_5678 ^ i as u64));
        }
    }
    group.throughput(Throughput::Elements(stream.len() as u64));
    group.bench_function("mixed_sessions", |b| {
        let gate = LatchedGate::new(NoGate);
        let log = EventLog::with_capacity(256);
        let config = DispatcherConfig {
            touch_region: Some(Rect::new(0.0, 0.0, 2000.0, 2000.0)),
        };
        b.iter(|| {
            let mut dispatcher =
                GestureDispatcher::new(ChainContext::new(&gate, &log), config, |_, cx| {
                    ChainBuilder::new(cx)
                        .intercept(swipe_policy("system", 40.0))
                        .intercept(Never::new("app"))
                        .build(NoOp)
                });
            for s in &stream {
                dispatcher.on_event(black_box(s));
            }
            black_box(dispatcher.in_session());
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_forwarding,
    bench_seize,
    bench_dispatcher_sessions
);
criterion_main!(benches);
