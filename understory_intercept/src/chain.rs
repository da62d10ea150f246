// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chain composition.
//!
//! ## Overview
//!
//! A chain is built once per gesture session from a root→leaf list of layers.
//! Each layer is a factory that receives the already built child and the shared
//! [`ChainContext`], and returns the node wrapping it. Construction therefore runs
//! innermost first, while samples travel outermost first.
//!
//! The host only ever sees the head through [`EventConsumer`]; individual nodes are
//! reachable only through diagnostics ([`InterceptionChain::snapshot`]).
//!
//! ## Session end
//!
//! A chain observes the end of its gesture session ([`Action::Up`](crate::types::Action::Up)
//! or [`Action::Cancel`](crate::types::Action::Cancel)). Delivering another sample after that is
//! a caller bug and panics; build a fresh chain for the next session.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::consumer::EventConsumer;
use crate::delegate::{DelegatingConsumer, InterceptPolicy};
use crate::gate::PilferGate;
use crate::snapshot::{InterceptionSnapshot, SnapshotBuilder};
use crate::trace::{NoTrace, TraceSink};
use crate::types::{ConsumerKind, InterceptionState, Sample};

/// An owned, type-erased chain node.
pub type BoxedConsumer<'g> = Box<dyn EventConsumer + 'g>;

type Layer<'g> = Box<dyn FnOnce(BoxedConsumer<'g>, ChainContext<'g>) -> BoxedConsumer<'g> + 'g>;

/// Services shared by every node of a chain.
///
/// Both are borrowed: the gate and the trace sink outlive the chain.
#[derive(Copy, Clone)]
pub struct ChainContext<'g> {
    /// Pointer ownership transfer.
    pub gate: &'g dyn PilferGate,
    /// Marker sink.
    pub trace: &'g dyn TraceSink,
}

impl<'g> ChainContext<'g> {
    /// Context with an explicit trace sink.
    pub fn new(gate: &'g dyn PilferGate, trace: &'g dyn TraceSink) -> Self {
        Self { gate, trace }
    }

    /// Context that discards markers.
    pub fn untraced(gate: &'g dyn PilferGate) -> Self {
        Self { gate, trace: &NoTrace }
    }
}

impl fmt::Debug for ChainContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainContext").finish_non_exhaustive()
    }
}

/// Collects layers root→leaf and assembles them around a terminal consumer.
///
/// ```
/// use understory_intercept::chain::{ChainBuilder, ChainContext};
/// use understory_intercept::consumer::NoOp;
/// use understory_intercept::gate::NoGate;
/// use understory_intercept::policy::Never;
///
/// let chain = ChainBuilder::new(ChainContext::untraced(&NoGate))
///     .intercept(Never::new("outer"))
///     .intercept(Never::new("inner"))
///     .build(NoOp);
/// assert_eq!(chain.depth(), 3);
/// assert_eq!(chain.snapshot().to_string(), "outer[Inactive] > inner[Inactive] > NoOp");
/// ```
pub struct ChainBuilder<'g> {
    cx: ChainContext<'g>,
    layers: Vec<Layer<'g>>,
}

impl<'g> ChainBuilder<'g> {
    /// Start an empty chain description.
    pub fn new(cx: ChainContext<'g>) -> Self {
        Self {
            cx,
            layers: Vec::new(),
        }
    }

    /// Append a layer below the ones added so far.
    pub fn layer<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(BoxedConsumer<'g>, ChainContext<'g>) -> BoxedConsumer<'g> + 'g,
    {
        self.layers.push(Box::new(factory));
        self
    }

    /// Append a [`DelegatingConsumer`] driven by `policy`.
    pub fn intercept<P: InterceptPolicy + 'g>(self, policy: P) -> Self {
        self.layer(move |child, cx| Box::new(DelegatingConsumer::new(policy, child, cx)))
    }

    /// Build the chain around `leaf`, innermost layer first.
    pub fn build(self, leaf: impl EventConsumer + 'g) -> InterceptionChain<'g> {
        let Self { cx, layers } = self;
        let depth = layers.len() + 1;
        let mut head: BoxedConsumer<'g> = Box::new(leaf);
        for layer in layers.into_iter().rev() {
            head = layer(head, cx);
        }
        InterceptionChain {
            head,
            depth,
            finished: false,
        }
    }
}

impl fmt::Debug for ChainBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("layers", &self.layers.len())
            .finish_non_exhaustive()
    }
}

/// The composition root for one gesture session.
pub struct InterceptionChain<'g> {
    head: BoxedConsumer<'g>,
    depth: usize,
    finished: bool,
}

impl<'g> InterceptionChain<'g> {
    /// Number of layers plus the terminal consumer.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the session has seen its final sample.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Describe every node, outermost first.
    pub fn snapshot(&self) -> InterceptionSnapshot {
        InterceptionSnapshot::capture(&*self.head)
    }
}

impl fmt::Debug for InterceptionChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionChain")
            .field("head", &self.head.name())
            .field("depth", &self.depth)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl EventConsumer for InterceptionChain<'_> {
    fn name(&self) -> &str {
        self.head.name()
    }

    fn kind(&self) -> ConsumerKind {
        self.head.kind()
    }

    fn state(&self) -> Option<InterceptionState> {
        self.head.state()
    }

    fn on_event(&mut self, sample: &Sample) {
        assert!(
            !self.finished,
            "protocol violation: {} sample delivered to a chain whose gesture session ended",
            sample.action
        );
        self.head.on_event(sample);
        if sample.action.ends_session() {
            self.finished = true;
        }
    }

    fn active_consumer_in_hierarchy(&self) -> &dyn EventConsumer {
        self.head.active_consumer_in_hierarchy()
    }

    fn allow_intercept_by_parent(&self) -> bool {
        self.head.allow_intercept_by_parent()
    }

    fn on_consumer_about_to_be_switched(&mut self) {
        self.head.on_consumer_about_to_be_switched();
    }

    fn describe(&self, out: &mut SnapshotBuilder) {
        self.head.describe(out);
    }
}
