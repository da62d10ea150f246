// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegating consumer: forward, or seize once and cancel downstream.
//!
//! ## Overview
//!
//! A [`DelegatingConsumer`] owns exactly one child and an [`InterceptPolicy`].
//! For each sample it either forwards it unchanged to the child, or (when the
//! policy asks for it and the child allows it) takes the gesture:
//!
//! 1. its state becomes [`Active`](InterceptionState::Active) for the rest of the session,
//! 2. the [`SEQUENCE_PILFER`] / [`EVENT_PILFER_POINTERS`] marker is recorded,
//! 3. [`PilferGate::pilfer_pointers`](crate::gate::PilferGate::pilfer_pointers) is called,
//! 4. a single synthesized [`Cancel`](Action::Cancel) is sent to the child,
//! 5. the triggering sample is dropped.
//!
//! If the gate refuses, the node is still active but sends no cancel of its own; the
//! platform's cancel for the session reaches the child instead.
//!
//! ## While active
//!
//! The policy [`handles`](InterceptPolicy::handle) every further sample and nothing is
//! forwarded, except a platform [`Cancel`](Action::Cancel), which still reaches the child
//! so that every level observes termination.
//!
//! ## Ownership across levels
//!
//! A node never seizes while its child refuses interception, so at most one node of a chain
//! is active. A node whose child refuses interception reports
//! [`DelegateActive`](InterceptionState::DelegateActive).
//!
//! ## Malformed samples
//!
//! Samples with an [`Unknown`](Action::Unknown) action are forwarded untouched by inactive
//! nodes and dropped by an active one. The policy never sees them.

use core::fmt;

use crate::chain::{BoxedConsumer, ChainContext};
use crate::consumer::EventConsumer;
use crate::snapshot::SnapshotBuilder;
use crate::trace::{EVENT_PILFER_POINTERS, SEQUENCE_PILFER};
use crate::types::{Action, ConsumerKind, InterceptionState, Sample};

/// Verdict of an [`InterceptPolicy`] on one sample.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Let the sample through to the child.
    Forward,
    /// Take the gesture now.
    Intercept,
}

/// The trigger and handler of a [`DelegatingConsumer`].
///
/// Gesture recognition lives here; the consumer only enforces the ownership protocol.
pub trait InterceptPolicy {
    /// Identity of the node in snapshots and logs.
    fn name(&self) -> &str;

    /// Kind of the node, without its child.
    fn kind(&self) -> ConsumerKind {
        ConsumerKind::empty()
    }

    /// Look at a sample while the node does not own the gesture.
    ///
    /// Called for every well-formed sample, cancels included. A cancel can
    /// never trigger a seize; returning [`Decision::Intercept`] for it has no effect.
    fn inspect(&mut self, sample: &Sample) -> Decision;

    /// Handle a sample after the node took the gesture.
    fn handle(&mut self, sample: &Sample) {
        let _ = sample;
    }

    /// Whether this node is willing to be preempted by a parent right now.
    fn allow_intercept_by_parent(&self) -> bool {
        true
    }

    /// The host is about to replace the chain this node is part of.
    fn on_consumer_about_to_be_switched(&mut self) {}
}

/// A chain node wrapping exactly one child consumer.
pub struct DelegatingConsumer<'g, P> {
    policy: P,
    delegate: BoxedConsumer<'g>,
    cx: ChainContext<'g>,
    state: InterceptionState,
}

impl<'g, P: InterceptPolicy> DelegatingConsumer<'g, P> {
    /// Wrap `delegate`, starting [`Inactive`](InterceptionState::Inactive).
    pub fn new(policy: P, delegate: BoxedConsumer<'g>, cx: ChainContext<'g>) -> Self {
        Self {
            policy,
            delegate,
            cx,
            state: InterceptionState::Inactive,
        }
    }

    /// The policy driving this node.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// The current interception state.
    pub fn interception_state(&self) -> InterceptionState {
        self.state
    }

    /// Take the gesture. Does nothing if the node already owns it.
    fn set_active(&mut self, sample: &Sample) {
        if self.state == InterceptionState::Active {
            return;
        }
        self.state = InterceptionState::Active;
        self.cx.trace.record(SEQUENCE_PILFER, EVENT_PILFER_POINTERS);
        match self.cx.gate.pilfer_pointers() {
            Ok(()) => {
                tracing::debug!(consumer = self.policy.name(), "pilfered pointers");
                let cancel = sample.with_action(Action::Cancel);
                self.delegate.on_event(&cancel);
            }
            // The transition stands; the router's own cancel unwinds the child.
            Err(err) => tracing::warn!(
                consumer = self.policy.name(),
                %err,
                "seize refused, continuing as active"
            ),
        }
    }

    fn note_delegate_veto(&mut self) {
        if self.state == InterceptionState::Inactive && !self.delegate.allow_intercept_by_parent()
        {
            self.state = InterceptionState::DelegateActive;
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for DelegatingConsumer<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatingConsumer")
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("delegate", &self.delegate.name())
            .finish_non_exhaustive()
    }
}

impl<P: InterceptPolicy> EventConsumer for DelegatingConsumer<'_, P> {
    fn name(&self) -> &str {
        self.policy.name()
    }

    fn kind(&self) -> ConsumerKind {
        self.policy.kind() | self.delegate.kind()
    }

    fn state(&self) -> Option<InterceptionState> {
        Some(self.state)
    }

    fn on_event(&mut self, sample: &Sample) {
        if self.state == InterceptionState::Active {
            match sample.action {
                Action::Cancel => {
                    self.policy.handle(sample);
                    self.delegate.on_event(sample);
                }
                // Neither interpreted nor forwarded past the owner.
                Action::Unknown(_) => {}
                _ => self.policy.handle(sample),
            }
            return;
        }

        if sample.action.is_malformed() {
            self.delegate.on_event(sample);
            return;
        }

        self.note_delegate_veto();
        let delegate_allows = self.delegate.allow_intercept_by_parent();
        let decision = self.policy.inspect(sample);
        if decision == Decision::Intercept && delegate_allows && sample.action != Action::Cancel {
            self.set_active(sample);
            return;
        }

        self.delegate.on_event(sample);
        self.note_delegate_veto();
    }

    fn active_consumer_in_hierarchy(&self) -> &dyn EventConsumer {
        if self.state == InterceptionState::Active {
            self
        } else {
            self.delegate.active_consumer_in_hierarchy()
        }
    }

    fn allow_intercept_by_parent(&self) -> bool {
        self.state != InterceptionState::Active
            && self.policy.allow_intercept_by_parent()
            && self.delegate.allow_intercept_by_parent()
    }

    fn on_consumer_about_to_be_switched(&mut self) {
        self.policy.on_consumer_about_to_be_switched();
        self.delegate.on_consumer_about_to_be_switched();
    }

    fn describe(&self, out: &mut SnapshotBuilder) {
        out.push(self.policy.name(), self.kind(), Some(self.state));
        self.delegate.describe(out);
    }
}
