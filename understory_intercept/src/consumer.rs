// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The consumer capability and the terminal consumers that end a chain.
//!
//! ## Overview
//!
//! Every node in an interception chain implements [`EventConsumer`].
//! Delegating nodes ([`DelegatingConsumer`](crate::delegate::DelegatingConsumer)) wrap one
//! child each; terminal nodes ([`NoOp`], [`FnConsumer`], or your own type) end the chain and
//! answer hierarchy queries for themselves.
//!
//! ## Terminal conventions
//!
//! - [`EventConsumer::active_consumer_in_hierarchy`] returns `self`.
//! - [`EventConsumer::state`] returns `None`; terminals have no interception state.
//! - [`EventConsumer::describe`] pushes one record and stops.

use core::fmt;

use crate::snapshot::SnapshotBuilder;
use crate::types::{ConsumerKind, InterceptionState, Sample};

/// A node that can receive pointer samples.
///
/// This trait is object safe; chains store nodes as `Box<dyn EventConsumer + 'g>`.
/// All methods are driven from a single dispatch context, one sample at a time.
pub trait EventConsumer {
    /// Identity of this node in snapshots and logs.
    fn name(&self) -> &str;

    /// Kind of this node, including everything below it.
    fn kind(&self) -> ConsumerKind;

    /// Interception state, or `None` for consumers that never intercept.
    fn state(&self) -> Option<InterceptionState> {
        None
    }

    /// Accept one sample.
    fn on_event(&mut self, sample: &Sample);

    /// The single consumer currently responsible for this gesture in this subtree.
    fn active_consumer_in_hierarchy(&self) -> &dyn EventConsumer;

    /// Whether a consumer above this one may seize the gesture right now.
    fn allow_intercept_by_parent(&self) -> bool {
        true
    }

    /// Called before the host replaces the active chain. Must not panic.
    fn on_consumer_about_to_be_switched(&mut self) {}

    /// Append this node (and anything below it) to a diagnostic snapshot.
    fn describe(&self, out: &mut SnapshotBuilder);
}

/// A terminal consumer that ignores every sample.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoOp;

impl EventConsumer for NoOp {
    fn name(&self) -> &str {
        "NoOp"
    }

    fn kind(&self) -> ConsumerKind {
        ConsumerKind::NO_OP
    }

    fn on_event(&mut self, _sample: &Sample) {}

    fn active_consumer_in_hierarchy(&self) -> &dyn EventConsumer {
        self
    }

    fn describe(&self, out: &mut SnapshotBuilder) {
        out.push(self.name(), self.kind(), None);
    }
}

/// A named terminal consumer that hands every sample to a closure.
///
/// ```
/// use kurbo::Point;
/// use understory_intercept::consumer::{EventConsumer, FnConsumer};
/// use understory_intercept::types::{Action, Sample};
///
/// let mut seen = 0;
/// let mut leaf = FnConsumer::new("views", |_s: &Sample| seen += 1);
/// leaf.on_event(&Sample::new(Action::Down, Point::ZERO, 0));
/// assert!(leaf.allow_intercept_by_parent());
/// drop(leaf);
/// assert_eq!(seen, 1);
/// ```
pub struct FnConsumer<F> {
    name: &'static str,
    kind: ConsumerKind,
    allow_intercept: bool,
    handler: F,
}

impl<F: FnMut(&Sample)> FnConsumer<F> {
    /// Create a terminal consumer that allows interception by its parents.
    pub fn new(name: &'static str, handler: F) -> Self {
        Self {
            name,
            kind: ConsumerKind::empty(),
            allow_intercept: true,
            handler,
        }
    }

    /// Set the kind reported by this consumer.
    pub fn with_kind(mut self, kind: ConsumerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set whether parents may seize the gesture from this consumer.
    pub fn with_allow_intercept(mut self, allow: bool) -> Self {
        self.allow_intercept = allow;
        self
    }
}

impl<F> fmt::Debug for FnConsumer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConsumer")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("allow_intercept", &self.allow_intercept)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut(&Sample)> EventConsumer for FnConsumer<F> {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> ConsumerKind {
        self.kind
    }

    fn on_event(&mut self, sample: &Sample) {
        (self.handler)(sample);
    }

    fn active_consumer_in_hierarchy(&self) -> &dyn EventConsumer {
        self
    }

    fn allow_intercept_by_parent(&self) -> bool {
        self.allow_intercept
    }

    fn describe(&self, out: &mut SnapshotBuilder) {
        out.push(self.name, self.kind, None);
    }
}
