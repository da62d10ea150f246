// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Several gesture sessions through a dispatcher.
//!
//! Each down builds a fresh chain. Downs outside the touch region start a
//! session nobody consumes, and the latched gate allows a single pilfer per
//! session. The dispatcher dump is printed after every session.
//!
//! Run:
//! - `cargo run -p understory_intercept_demos --example intercept_session`

use kurbo::{Point, Rect};
use understory_intercept::chain::{ChainBuilder, ChainContext};
use understory_intercept::consumer::NoOp;
use understory_intercept::dispatch::{DispatcherConfig, GestureDispatcher};
use understory_intercept::gate::{LatchedGate, NoGate};
use understory_intercept::policy::{Axis, DisplacementConfig, DisplacementPolicy};
use understory_intercept::trace::{EVENT_PILFER_POINTERS, EventLog, SEQUENCE_PILFER};
use understory_intercept::types::{Action, ConsumerKind, Sample};

fn swipe(x0: f64, dx: f64) -> Vec<Sample> {
    vec![
        Sample::new(Action::Down, Point::new(x0, 50.0), 0),
        Sample::new(Action::Move, Point::new(x0 + dx * 0.5, 50.0), 8),
        Sample::new(Action::Move, Point::new(x0 + dx, 50.0), 16),
        Sample::new(Action::Up, Point::new(x0 + dx, 50.0), 24),
    ]
}

fn main() {
    let gate = LatchedGate::new(NoGate);
    let log = EventLog::with_capacity(128);
    let config = DispatcherConfig {
        touch_region: Some(Rect::new(0.0, 0.0, 400.0, 100.0)),
    };

    let mut dispatcher = GestureDispatcher::new(ChainContext::new(&gate, &log), config, |_, cx| {
        ChainBuilder::new(cx)
            .intercept(
                DisplacementPolicy::new(
                    "edge-back",
                    DisplacementConfig {
                        slop: 30.0,
                        axis: Axis::X,
                        ..Default::default()
                    },
                )
                .with_kind(ConsumerKind::SYSTEM_GESTURE),
            )
            .build(NoOp)
    });

    let sessions = [
        // Long enough to pilfer.
        swipe(10.0, 80.0),
        // Too short.
        swipe(10.0, 10.0),
        // Starts outside the region.
        swipe(600.0, 80.0),
        // Pilfers again after the latch is re-armed.
        swipe(20.0, -60.0),
    ];

    for (i, session) in sessions.iter().enumerate() {
        for s in session {
            dispatcher.on_event(s);
        }
        let mut dump = String::new();
        dispatcher.dump(&mut dump).unwrap();
        println!("== Session {i} ==\n{dump}");
    }

    // A sample between sessions is dropped.
    dispatcher.on_event(&Sample::new(Action::Move, Point::new(5.0, 5.0), 99));

    let mut trace = String::new();
    log.dump("  ", &mut trace).unwrap();
    println!("== Trace ==\n{trace}");

    assert_eq!(log.count(SEQUENCE_PILFER, EVENT_PILFER_POINTERS), 2);
}
