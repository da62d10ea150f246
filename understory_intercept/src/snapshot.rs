// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point-in-time diagnostic snapshots of a chain.
//!
//! A snapshot is an ordered list of `(identity, kind, state)` records,
//! outermost node first. It is built by walking
//! [`EventConsumer::describe`](crate::consumer::EventConsumer::describe) and never mutates the chain.
//!
//! ```
//! use understory_intercept::snapshot::SnapshotBuilder;
//! use understory_intercept::types::{ConsumerKind, InterceptionState};
//!
//! let mut b = SnapshotBuilder::new();
//! b.push("Assistant", ConsumerKind::ASSISTANT, Some(InterceptionState::Active));
//! b.push("Views", ConsumerKind::empty(), None);
//! let snap = b.finish();
//! assert_eq!(snap.active(), Some(0));
//! assert_eq!(snap.to_string(), "Assistant[Active] > Views");
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::consumer::EventConsumer;
use crate::types::{ConsumerKind, InterceptionState};

/// One node in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeRecord {
    /// Node identity.
    pub name: String,
    /// Kind reported by the node (including its subtree).
    pub kind: ConsumerKind,
    /// Interception state; `None` for terminal consumers.
    pub state: Option<InterceptionState>,
}

/// Accumulates records while a chain describes itself.
#[derive(Clone, Debug, Default)]
pub struct SnapshotBuilder {
    records: Vec<NodeRecord>,
}

impl SnapshotBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Call order defines snapshot order.
    pub fn push(&mut self, name: &str, kind: ConsumerKind, state: Option<InterceptionState>) {
        self.records.push(NodeRecord {
            name: String::from(name),
            kind,
            state,
        });
    }

    /// Freeze the accumulated records.
    pub fn finish(self) -> InterceptionSnapshot {
        let active = self
            .records
            .iter()
            .position(|r| r.state == Some(InterceptionState::Active));
        InterceptionSnapshot {
            records: self.records,
            active,
        }
    }
}

/// Immutable diagnostic record of a chain, outermost to innermost.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InterceptionSnapshot {
    records: Vec<NodeRecord>,
    active: Option<usize>,
}

impl InterceptionSnapshot {
    /// Describe `consumer` and everything below it.
    pub fn capture(consumer: &dyn EventConsumer) -> Self {
        let mut b = SnapshotBuilder::new();
        consumer.describe(&mut b);
        b.finish()
    }

    /// Records, outermost first.
    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    /// Number of nodes, terminal included.
    pub fn depth(&self) -> usize {
        self.records.len()
    }

    /// Index of the node in the `Active` state, if any.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Look up a record by node identity.
    pub fn get(&self, name: &str) -> Option<&NodeRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// The node that answers `active_consumer_in_hierarchy`: the active node,
    /// or the innermost one when none is active.
    pub fn consumer_in_hierarchy(&self) -> Option<&NodeRecord> {
        match self.active {
            Some(i) => self.records.get(i),
            None => self.records.last(),
        }
    }
}

impl fmt::Display for InterceptionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.records.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            f.write_str(&r.name)?;
            if let Some(state) = r.state {
                write!(f, "[{state}]")?;
            }
        }
        Ok(())
    }
}
