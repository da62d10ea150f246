// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named marker traces for test and record-and-replay tooling.
//!
//! ## Overview
//!
//! Consumers record `(sequence, event)` markers at key transitions, for example
//! [`SEQUENCE_PILFER`] / [`EVENT_PILFER_POINTERS`] when a node seizes a gesture.
//! Test harnesses match these markers against expected sequences.
//!
//! Markers are separate from `tracing` output: they are a stable, assertable
//! protocol, while `tracing` events are for humans.
//!
//! ```
//! use understory_intercept::trace::{EventLog, TraceSink, SEQUENCE_PILFER, EVENT_PILFER_POINTERS};
//!
//! let log = EventLog::with_capacity(8);
//! log.record(SEQUENCE_PILFER, EVENT_PILFER_POINTERS);
//! assert!(log.contains(SEQUENCE_PILFER, EVENT_PILFER_POINTERS));
//!
//! let mut out = String::new();
//! log.dump("  ", &mut out).unwrap();
//! assert_eq!(out, "  Pilfer / pilferPointers\n");
//! ```

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Sequence for pointer seize markers.
pub const SEQUENCE_PILFER: &str = "Pilfer";
/// Event recorded when a node seizes the gesture.
pub const EVENT_PILFER_POINTERS: &str = "pilferPointers";
/// Sequence for dispatcher markers (samples received, chains installed).
pub const SEQUENCE_DISPATCH: &str = "Dispatch";

/// Receiver of named markers.
pub trait TraceSink {
    /// Record one marker.
    fn record(&self, sequence: &str, event: &str);

    /// Record a marker whose event text is formatted on demand.
    ///
    /// Sinks that drop markers should override this so nothing is formatted.
    fn record_fmt(&self, sequence: &str, event: fmt::Arguments<'_>) {
        match event.as_str() {
            Some(text) => self.record(sequence, text),
            None => self.record(sequence, &alloc::fmt::format(event)),
        }
    }
}

/// A sink that discards every marker.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn record(&self, _sequence: &str, _event: &str) {}

    fn record_fmt(&self, _sequence: &str, _event: fmt::Arguments<'_>) {}
}

/// One recorded marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    /// Marker sequence.
    pub sequence: String,
    /// Marker event.
    pub event: String,
}

/// A bounded in-memory marker log.
///
/// When full, the oldest entry is dropped. Single-threaded; the chain and its
/// dispatcher run on one dispatch context.
#[derive(Debug)]
pub struct EventLog {
    capacity: usize,
    entries: RefCell<VecDeque<TraceEntry>>,
}

impl EventLog {
    /// Create a log holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RefCell::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Copy of the retained entries, oldest first.
    pub fn entries(&self) -> Vec<TraceEntry> {
        self.entries.borrow().iter().cloned().collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Number of retained entries matching `(sequence, event)`.
    pub fn count(&self, sequence: &str, event: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.sequence == sequence && e.event == event)
            .count()
    }

    /// Returns `true` if a matching entry is retained.
    pub fn contains(&self, sequence: &str, event: &str) -> bool {
        self.count(sequence, event) > 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Write one `sequence / event` line per entry, oldest first.
    pub fn dump(&self, prefix: &str, out: &mut impl fmt::Write) -> fmt::Result {
        for e in self.entries.borrow().iter() {
            writeln!(out, "{prefix}{} / {}", e.sequence, e.event)?;
        }
        Ok(())
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl EventLog {
    fn push(&self, sequence: &str, event: impl FnOnce() -> String) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.borrow_mut();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(TraceEntry {
            sequence: String::from(sequence),
            event: event(),
        });
    }
}

impl TraceSink for EventLog {
    fn record(&self, sequence: &str, event: &str) {
        self.push(sequence, || String::from(event));
    }

    fn record_fmt(&self, sequence: &str, event: fmt::Arguments<'_>) {
        self.push(sequence, || alloc::fmt::format(event));
    }
}
