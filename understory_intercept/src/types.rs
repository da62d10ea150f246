// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the interception chain: actions, samples, node states, and consumer kinds.
//!
//! ## Overview
//!
//! These types describe the input side of the protocol and the per-node state it drives.
//! They are consumed by [`EventConsumer`](crate::consumer::EventConsumer) implementations
//! and reported by [`InterceptionSnapshot`](crate::snapshot::InterceptionSnapshot).

use core::fmt;

use kurbo::Point;

/// Kind of a pointer sample.
///
/// Carried by every [`Sample`]. Codes the chain does not understand are kept as
/// [`Unknown`](Action::Unknown) and passed through without interpretation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    /// First pointer went down; starts a gesture session.
    Down,
    /// An additional pointer went down during a session.
    PointerDown,
    /// One or more pointers moved.
    Move,
    /// A non-final pointer went up.
    PointerUp,
    /// The last pointer went up; ends the gesture session.
    Up,
    /// The gesture was cancelled; ends the gesture session.
    Cancel,
    /// An action code the chain does not recognize.
    Unknown(u16),
}

impl Action {
    /// Map a raw platform action code.
    ///
    /// Codes follow the common touch numbering: `0` down, `1` up, `2` move,
    /// `3` cancel, `5` pointer-down, `6` pointer-up. Anything else maps to
    /// [`Action::Unknown`].
    pub const fn from_raw(code: u16) -> Self {
        match code {
            0 => Self::Down,
            1 => Self::Up,
            2 => Self::Move,
            3 => Self::Cancel,
            5 => Self::PointerDown,
            6 => Self::PointerUp,
            other => Self::Unknown(other),
        }
    }

    /// Returns `true` for action codes that could not be interpreted.
    pub const fn is_malformed(self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Returns `true` if this action terminates the gesture session.
    pub const fn ends_session(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => f.write_str("down"),
            Self::PointerDown => f.write_str("pointer-down"),
            Self::Move => f.write_str("move"),
            Self::PointerUp => f.write_str("pointer-up"),
            Self::Up => f.write_str("up"),
            Self::Cancel => f.write_str("cancel"),
            Self::Unknown(code) => write!(f, "unknown({code})"),
        }
    }
}

/// Identifier of a single pointer (finger, stylus tip) within a session.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PointerId(pub u32);

/// Identifier of the input device that produced a sample.
///
/// Negative ids are conventionally used for injected (synthetic) input.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeviceId(pub i32);

/// One pointer event sample.
///
/// Samples are immutable values. A consumer that needs to send a different
/// action downstream (for example a synthesized cancel) derives a copy with
/// [`Sample::with_action`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// What happened.
    pub action: Action,
    /// Pointer that triggered the action.
    pub pointer: PointerId,
    /// Device the sample came from.
    pub device: DeviceId,
    /// Position in the host's world coordinates.
    pub position: Point,
    /// Monotonic timestamp in nanoseconds.
    pub timestamp: u64,
}

impl Sample {
    /// Create a sample for the primary pointer of the default device.
    pub const fn new(action: Action, position: Point, timestamp: u64) -> Self {
        Self {
            action,
            pointer: PointerId(0),
            device: DeviceId(0),
            position,
            timestamp,
        }
    }

    /// Set the pointer id.
    pub const fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }

    /// Set the device id.
    pub const fn with_device(mut self, device: DeviceId) -> Self {
        self.device = device;
        self
    }

    /// Copy this sample with a different action, keeping position, ids and timestamp.
    pub const fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }
}

/// Interception state of a single delegating node.
///
/// Owned and mutated only by the node it belongs to. Within one gesture
/// session the state never leaves [`Active`](InterceptionState::Active) once
/// it has been entered.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum InterceptionState {
    /// Observing and forwarding; the node may still seize the gesture.
    #[default]
    Inactive,
    /// The node owns the gesture; nothing is forwarded except cancellation.
    Active,
    /// A consumer below this node has claimed the gesture or refuses interception.
    DelegateActive,
}

impl fmt::Display for InterceptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inactive => "Inactive",
            Self::Active => "Active",
            Self::DelegateActive => "DelegateActive",
        })
    }
}

bitflags::bitflags! {
    /// What a consumer is, for logging and diagnostics.
    ///
    /// A delegating consumer reports the union of its own kind and its
    /// delegate's kind, so the head of a chain describes the whole chain.
    /// Bits above the named ones are free for hosts to assign.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct ConsumerKind: u32 {
        /// Consumer that ignores every sample.
        const NO_OP          = 1 << 0;
        /// Handles system navigation gestures.
        const SYSTEM_GESTURE = 1 << 1;
        /// Handles gestures on behalf of the foreground app.
        const APP_GESTURE    = 1 << 2;
        /// Handles the assistant corner gesture.
        const ASSISTANT      = 1 << 3;
        /// Handles accessibility gestures.
        const ACCESSIBILITY  = 1 << 4;
        /// Handles gestures while the device is locked.
        const DEVICE_LOCKED  = 1 << 5;
        /// Resets gesture state without consuming anything.
        const RESET          = 1 << 6;

        const _ = !0;
    }
}

impl Default for ConsumerKind {
    fn default() -> Self {
        Self::empty()
    }
}
