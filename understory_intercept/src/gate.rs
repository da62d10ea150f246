// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pilfer gate: transfer of pointer ownership away from the normal view hierarchy.
//!
//! ## Overview
//!
//! The gate belongs to the host's input router. A chain only borrows it and only
//! ever calls [`PilferGate::pilfer_pointers`]. Seizing is one-way for the rest of
//! the gesture session; a refusal is not fatal (see [`SeizeError`]).
//!
//! [`LatchedGate`] adapts a router that is not idempotent on its own so that at
//! most one successful seize per session reaches it.

use core::sync::atomic::{AtomicBool, Ordering};

/// Why the input router did not transfer pointer ownership.
///
/// Callers treat their own transition as committed and rely on the router's
/// own cancellation for cleanup.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SeizeError {
    /// The gesture session was already over when the seize arrived.
    #[error("gesture session already ended")]
    SessionEnded,
    /// The router declined to hand over the pointers.
    #[error("input router refused to transfer pointer ownership")]
    Refused,
}

/// Capability to take exclusive ownership of the in-flight pointers.
///
/// Implementations synchronize internally; the chain calls through `&self`.
pub trait PilferGate {
    /// Stop delivering this session's pointers to the normal view hierarchy.
    ///
    /// Must be idempotent within a session.
    fn pilfer_pointers(&self) -> Result<(), SeizeError>;

    /// Called by the dispatcher when a new gesture session begins.
    fn on_session_start(&self) {}
}

impl<G: PilferGate + ?Sized> PilferGate for &G {
    fn pilfer_pointers(&self) -> Result<(), SeizeError> {
        (**self).pilfer_pointers()
    }

    fn on_session_start(&self) {
        (**self).on_session_start();
    }
}

/// A gate that accepts every seize and does nothing.
///
/// Useful for hosts without a separate input router, and for tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoGate;

impl PilferGate for NoGate {
    fn pilfer_pointers(&self) -> Result<(), SeizeError> {
        Ok(())
    }
}

/// Forwards at most one successful seize per session to the wrapped gate.
///
/// The latch closes on the first successful [`pilfer_pointers`](PilferGate::pilfer_pointers)
/// and reopens on [`on_session_start`](PilferGate::on_session_start). A refused seize leaves
/// the latch open.
///
/// ```
/// use core::cell::Cell;
/// use understory_intercept::gate::{LatchedGate, PilferGate, SeizeError};
///
/// struct Router(Cell<u32>);
/// impl PilferGate for Router {
///     fn pilfer_pointers(&self) -> Result<(), SeizeError> {
///         self.0.set(self.0.get() + 1);
///         Ok(())
///     }
/// }
///
/// let gate = LatchedGate::new(Router(Cell::new(0)));
/// gate.pilfer_pointers().unwrap();
/// gate.pilfer_pointers().unwrap();
/// assert_eq!(gate.inner().0.get(), 1);
/// gate.on_session_start();
/// gate.pilfer_pointers().unwrap();
/// assert_eq!(gate.inner().0.get(), 2);
/// ```
#[derive(Debug, Default)]
pub struct LatchedGate<G> {
    inner: G,
    seized: AtomicBool,
}

impl<G: PilferGate> LatchedGate<G> {
    /// Wrap a gate. The latch starts open.
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            seized: AtomicBool::new(false),
        }
    }

    /// The wrapped gate.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Whether a seize has already gone through in the current session.
    pub fn is_seized(&self) -> bool {
        self.seized.load(Ordering::Acquire)
    }
}

impl<G: PilferGate> PilferGate for LatchedGate<G> {
    fn pilfer_pointers(&self) -> Result<(), SeizeError> {
        if self
            .seized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }
        let result = self.inner.pilfer_pointers();
        if result.is_err() {
            self.seized.store(false, Ordering::Release);
        }
        result
    }

    fn on_session_start(&self) {
        self.seized.store(false, Ordering::Release);
        self.inner.on_session_start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Counts calls and answers with a scripted result.
    struct Scripted {
        calls: Cell<u32>,
        refuse: Cell<bool>,
    }

    impl Scripted {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                refuse: Cell::new(false),
            }
        }
    }

    impl PilferGate for Scripted {
        fn pilfer_pointers(&self) -> Result<(), SeizeError> {
            self.calls.set(self.calls.get() + 1);
            if self.refuse.get() {
                Err(SeizeError::Refused)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn latch_forwards_once_per_session() {
        let g = LatchedGate::new(Scripted::new());
        assert!(!g.is_seized());
        assert_eq!(g.pilfer_pointers(), Ok(()));
        assert_eq!(g.pilfer_pointers(), Ok(()));
        assert_eq!(g.pilfer_pointers(), Ok(()));
        assert_eq!(g.inner().calls.get(), 1);
        assert!(g.is_seized());
    }

    #[test]
    fn latch_rearms_on_session_start() {
        let g = LatchedGate::new(Scripted::new());
        g.pilfer_pointers().unwrap();
        g.on_session_start();
        assert!(!g.is_seized());
        g.pilfer_pointers().unwrap();
        assert_eq!(g.inner().calls.get(), 2);
    }

    #[test]
    fn refused_seize_leaves_latch_open() {
        let g = LatchedGate::new(Scripted::new());
        g.inner().refuse.set(true);
        assert_eq!(g.pilfer_pointers(), Err(SeizeError::Refused));
        assert!(!g.is_seized());
        g.inner().refuse.set(false);
        assert_eq!(g.pilfer_pointers(), Ok(()));
        assert_eq!(g.inner().calls.get(), 2);
    }

    #[test]
    fn borrowed_gates_forward() {
        let g = Scripted::new();
        let r = &g;
        r.pilfer_pointers().unwrap();
        PilferGate::on_session_start(&r);
        assert_eq!(g.calls.get(), 1);
    }

    #[test]
    fn errors_render() {
        use alloc::string::ToString;
        assert_eq!(SeizeError::SessionEnded.to_string(), "gesture session already ended");
    }
}
