// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A three node chain where the outer node takes over a horizontal swipe.
//!
//! The app layer and its views see the down, then a single cancel once the
//! system layer crosses its threshold. The move that crossed it is not
//! delivered to anyone below.
//!
//! Run:
//! - `cargo run -p understory_intercept_demos --example intercept_basics`

use std::cell::RefCell;

use kurbo::Point;
use understory_intercept::chain::{ChainBuilder, ChainContext};
use understory_intercept::consumer::{EventConsumer, FnConsumer};
use understory_intercept::gate::NoGate;
use understory_intercept::policy::{Axis, DisplacementConfig, DisplacementPolicy, Never};
use understory_intercept::trace::EventLog;
use understory_intercept::types::{Action, ConsumerKind, InterceptionState, Sample};

fn main() {
    let log = EventLog::default();
    let views: RefCell<Vec<Action>> = RefCell::new(Vec::new());

    let system = DisplacementPolicy::new(
        "system",
        DisplacementConfig {
            slop: 40.0,
            axis: Axis::X,
            ..Default::default()
        },
    )
    .with_kind(ConsumerKind::SYSTEM_GESTURE);

    let mut chain = ChainBuilder::new(ChainContext::new(&NoGate, &log))
        .intercept(system)
        .intercept(Never::new("app").with_kind(ConsumerKind::APP_GESTURE))
        .build(FnConsumer::new("views", |s: &Sample| {
            views.borrow_mut().push(s.action);
        }));

    let gesture = [
        Sample::new(Action::Down, Point::new(100.0, 100.0), 0),
        Sample::new(Action::Move, Point::new(120.0, 102.0), 8),
        Sample::new(Action::Move, Point::new(150.0, 104.0), 16),
        Sample::new(Action::Move, Point::new(190.0, 104.0), 24),
        Sample::new(Action::Up, Point::new(200.0, 104.0), 32),
    ];
    for s in &gesture {
        chain.on_event(s);
        println!("{:>6} -> {}", s.action.to_string(), chain.snapshot());
    }

    println!("== Views saw ==\n  {:?}", views.borrow());
    let mut dump = String::new();
    log.dump("  ", &mut dump).unwrap();
    println!("== Trace ==\n{dump}");

    assert_eq!(
        *views.borrow(),
        vec![Action::Down, Action::Move, Action::Cancel]
    );
    assert_eq!(chain.state(), Some(InterceptionState::Active));
    assert_eq!(chain.active_consumer_in_hierarchy().name(), "system");
}
