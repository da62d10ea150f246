// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_intercept --heading-base-level=0

//! Understory Intercept: a `no_std` chain of input consumers that can steal a gesture.
//!
//! ## Overview
//!
//! Pointer samples are delivered to the outermost node of a chain. Each node either
//! forwards the sample to the node it wraps, or decides that it owns the rest of the
//! gesture. When a node takes over, its descendants receive exactly one synthesized
//! cancel and nothing more, and the host is asked to pilfer the pointers away from
//! other windows.
//!
//! At most one node per chain is ever active, and a node never leaves the active state
//! while the gesture lasts. Inner nodes may refuse interception by their ancestors;
//! a refusing child is honored even when the parent's own policy says to intercept.
//!
//! ## Pieces
//!
//! - [`EventConsumer`](crate::consumer::EventConsumer) is the uniform interface of
//!   every node and of the chain itself.
//! - [`DelegatingConsumer`](crate::delegate::DelegatingConsumer) wraps a child and
//!   drives the interception state machine from an
//!   [`InterceptPolicy`](crate::delegate::InterceptPolicy).
//! - [`PilferGate`](crate::gate::PilferGate) is the host hook that transfers pointer
//!   ownership; [`LatchedGate`](crate::gate::LatchedGate) allows one seize per session.
//! - [`TraceSink`](crate::trace::TraceSink) receives the `Pilfer` / `pilferPointers`
//!   marker and dispatcher notes; [`EventLog`](crate::trace::EventLog) keeps a bounded
//!   history for dumps.
//! - [`InterceptionSnapshot`](crate::snapshot::InterceptionSnapshot) describes every
//!   node of a chain for diagnostics.
//!
//! ## Workflow
//!
//! 1) On each down, build a chain root→leaf with
//!    [`ChainBuilder`](crate::chain::ChainBuilder). Layers can be stock policies from
//!    [`policy`](crate::policy) or your own recognizers.
//! 2) Feed every sample of the session to the chain head. The chain panics if a
//!    sample arrives after the session ended; build a new chain instead.
//! 3) Or let [`GestureDispatcher`](crate::dispatch::GestureDispatcher) do both: it
//!    creates one chain per down, notifies the old chain before switching, and drops
//!    stray samples outside a session.
//!
//! ```
//! use understory_intercept::chain::{ChainBuilder, ChainContext};
//! use understory_intercept::consumer::{EventConsumer, NoOp};
//! use understory_intercept::gate::NoGate;
//! use understory_intercept::policy::{Axis, DisplacementConfig, DisplacementPolicy, Never};
//! use understory_intercept::trace::{EventLog, SEQUENCE_PILFER};
//! use understory_intercept::types::{Action, InterceptionState, Sample};
//! use kurbo::Point;
//!
//! let log = EventLog::default();
//! let swipe = DisplacementPolicy::new(
//!     "swipe",
//!     DisplacementConfig { slop: 40.0, axis: Axis::X, ..Default::default() },
//! );
//! let mut chain = ChainBuilder::new(ChainContext::new(&NoGate, &log))
//!     .intercept(swipe)
//!     .intercept(Never::new("app"))
//!     .build(NoOp);
//!
//! chain.on_event(&Sample::new(Action::Down, Point::new(0.0, 0.0), 0));
//! chain.on_event(&Sample::new(Action::Move, Point::new(50.0, 0.0), 16));
//!
//! assert_eq!(chain.state(), Some(InterceptionState::Active));
//! assert_eq!(chain.active_consumer_in_hierarchy().name(), "swipe");
//! assert_eq!(log.count(SEQUENCE_PILFER, "pilferPointers"), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod chain;
pub mod consumer;
pub mod delegate;
pub mod dispatch;
pub mod gate;
pub mod policy;
pub mod snapshot;
pub mod trace;
pub mod types;

#[cfg(test)]
mod test_support;
