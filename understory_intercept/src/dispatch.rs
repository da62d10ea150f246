// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture session dispatcher: one chain per session.
//!
//! ## Usage
//!
//! 1) Construct a [`GestureDispatcher`] with a [`ChainContext`], a [`DispatcherConfig`], and a
//!    factory closure that builds the chain for a gesture from its first sample.
//! 2) Feed every raw sample to [`GestureDispatcher::on_event`].
//! 3) Query [`GestureDispatcher::active_consumer_name`] or [`GestureDispatcher::snapshot`]
//!    to see who owns the gesture.
//!
//! On every [`Down`](Action::Down) the previous chain is told it is about to be switched and is
//! dropped, the gate is re-armed with [`PilferGate::on_session_start`](crate::gate::PilferGate::on_session_start),
//! and a fresh chain is built. State never leaks from one gesture to the next.
//!
//! Samples that arrive outside a live session (before the first down, after the session ended,
//! or for a down outside the touch region) are dropped.
//!
//! ```
//! use kurbo::Point;
//! use understory_intercept::chain::{ChainBuilder, ChainContext};
//! use understory_intercept::consumer::NoOp;
//! use understory_intercept::dispatch::{DispatcherConfig, GestureDispatcher};
//! use understory_intercept::gate::NoGate;
//! use understory_intercept::policy::{DisplacementConfig, DisplacementPolicy};
//! use understory_intercept::types::{Action, Sample};
//!
//! let mut dispatcher = GestureDispatcher::new(
//!     ChainContext::untraced(&NoGate),
//!     DispatcherConfig::default(),
//!     |_down: &Sample, cx| {
//!         ChainBuilder::new(cx)
//!             .intercept(DisplacementPolicy::new("swipe", DisplacementConfig::default()))
//!             .build(NoOp)
//!     },
//! );
//! dispatcher.on_event(&Sample::new(Action::Down, Point::ZERO, 0));
//! assert_eq!(dispatcher.active_consumer_name(), Some("NoOp"));
//! dispatcher.on_event(&Sample::new(Action::Move, Point::new(0.0, 30.0), 1));
//! assert_eq!(dispatcher.active_consumer_name(), Some("swipe"));
//! ```

use alloc::string::String;
use core::fmt;

use kurbo::Rect;

use crate::chain::{ChainContext, InterceptionChain};
use crate::consumer::EventConsumer;
use crate::snapshot::InterceptionSnapshot;
use crate::trace::SEQUENCE_DISPATCH;
use crate::types::{Action, ConsumerKind, Sample};

/// Configuration for [`GestureDispatcher`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DispatcherConfig {
    /// Region in which a down starts an intercepted session.
    ///
    /// Downs outside it start a session that nobody consumes. `None` accepts
    /// every down.
    pub touch_region: Option<Rect>,
}

/// Routes samples to the chain of the current gesture session.
pub struct GestureDispatcher<'g, F> {
    cx: ChainContext<'g>,
    config: DispatcherConfig,
    factory: F,
    current: Option<InterceptionChain<'g>>,
}

impl<'g, F> GestureDispatcher<'g, F>
where
    F: FnMut(&Sample, ChainContext<'g>) -> InterceptionChain<'g>,
{
    /// Create a dispatcher with no session in progress.
    pub fn new(cx: ChainContext<'g>, config: DispatcherConfig, factory: F) -> Self {
        Self {
            cx,
            config,
            factory,
            current: None,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Deliver one sample from the platform.
    pub fn on_event(&mut self, sample: &Sample) {
        if sample.action != Action::Move {
            self.cx.trace.record_fmt(
                SEQUENCE_DISPATCH,
                format_args!("onMotionEvent: {}", sample.action),
            );
        }
        if sample.action == Action::Down {
            self.begin_session(sample);
        }
        match &mut self.current {
            Some(chain) if !chain.is_finished() => chain.on_event(sample),
            _ => tracing::debug!(
                action = %sample.action,
                "dropping sample outside a gesture session"
            ),
        }
    }

    fn begin_session(&mut self, down: &Sample) {
        if let Some(mut previous) = self.current.take() {
            previous.on_consumer_about_to_be_switched();
        }
        self.cx.gate.on_session_start();

        let inside = self
            .config
            .touch_region
            .is_none_or(|r| r.contains(down.position));
        if !inside {
            tracing::debug!(position = ?down.position, "down outside the touch region");
            return;
        }

        let chain = (self.factory)(down, self.cx);
        let kind = kind_label(chain.kind());
        tracing::debug!(
            consumer = chain.name(),
            kind = kind.as_str(),
            "installed interception chain"
        );
        self.cx
            .trace
            .record_fmt(SEQUENCE_DISPATCH, format_args!("setInputConsumer: {kind}"));
        self.current = Some(chain);
    }
}

impl<'g, F> GestureDispatcher<'g, F> {
    /// The chain of the current (or most recent) session.
    pub fn current(&self) -> Option<&InterceptionChain<'g>> {
        self.current.as_ref()
    }

    /// Whether a session is live and still accepting samples.
    pub fn in_session(&self) -> bool {
        self.current.as_ref().is_some_and(|c| !c.is_finished())
    }

    /// Name of the consumer that owns the current gesture.
    pub fn active_consumer_name(&self) -> Option<&str> {
        self.current
            .as_ref()
            .map(|c| c.active_consumer_in_hierarchy().name())
    }

    /// Snapshot of the current chain.
    pub fn snapshot(&self) -> Option<InterceptionSnapshot> {
        self.current.as_ref().map(InterceptionChain::snapshot)
    }

    /// Write a human-readable description of the dispatcher state.
    pub fn dump(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "TouchState:")?;
        match self.config.touch_region {
            Some(r) => writeln!(
                out,
                "  touch_region=({}, {}, {}, {})",
                r.x0, r.y0, r.x1, r.y1
            )?,
            None => writeln!(out, "  touch_region=any")?,
        }
        writeln!(out, "  in_session={}", self.in_session())?;
        match &self.current {
            Some(chain) => {
                writeln!(out, "  consumer={}", chain.active_consumer_in_hierarchy().name())?;
                writeln!(out, "  kind={}", kind_label(chain.kind()))?;
                writeln!(out, "  chain={}", chain.snapshot())?;
            }
            None => writeln!(out, "  consumer=none")?,
        }
        Ok(())
    }
}

impl<F> fmt::Debug for GestureDispatcher<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureDispatcher")
            .field("config", &self.config)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

fn kind_label(kind: ConsumerKind) -> String {
    let mut s = String::new();
    if bitflags::parser::to_writer(&kind, &mut s).is_err() || s.is_empty() {
        s.clear();
        s.push_str("none");
    }
    s
}
