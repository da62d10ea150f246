// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stock intercept policies.
//!
//! Real gesture recognizers belong to the host. These cover the common cases of
//! "take over once the pointer has travelled far enough" and "never take over".

use kurbo::{Point, Vec2};

use crate::delegate::{Decision, InterceptPolicy};
use crate::types::{Action, ConsumerKind, PointerId, Sample};

/// Axis along which displacement is measured.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Axis {
    /// Horizontal distance only.
    X,
    /// Vertical distance only.
    Y,
    /// Euclidean distance.
    #[default]
    Any,
}

/// Configuration for [`DisplacementPolicy`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DisplacementConfig {
    /// Distance from the down position at which the node takes the gesture.
    pub slop: f64,
    /// Axis the distance is measured on.
    pub axis: Axis,
    /// Refuse interception by parents while a gesture is being tracked.
    pub veto_while_tracking: bool,
}

impl Default for DisplacementConfig {
    fn default() -> Self {
        Self {
            slop: 24.0,
            axis: Axis::Any,
            veto_while_tracking: false,
        }
    }
}

/// Intercepts once the pointer has moved `slop` away from where it went down.
///
/// The threshold is inclusive: with `slop = 40` on [`Axis::X`], a move of
/// `dx = 40` intercepts. Direction does not matter. Only the pointer that went
/// down first is measured; additional pointers never trigger.
///
/// ```
/// use kurbo::Point;
/// use understory_intercept::delegate::{Decision, InterceptPolicy};
/// use understory_intercept::policy::{Axis, DisplacementConfig, DisplacementPolicy};
/// use understory_intercept::types::{Action, Sample};
///
/// let mut p = DisplacementPolicy::new(
///     "swipe",
///     DisplacementConfig { slop: 40.0, axis: Axis::X, ..Default::default() },
/// );
/// assert_eq!(p.inspect(&Sample::new(Action::Down, Point::ZERO, 0)), Decision::Forward);
/// assert_eq!(p.inspect(&Sample::new(Action::Move, Point::new(5.0, 90.0), 1)), Decision::Forward);
/// assert_eq!(p.inspect(&Sample::new(Action::Move, Point::new(-40.0, 0.0), 2)), Decision::Intercept);
/// ```
#[derive(Clone, Debug)]
pub struct DisplacementPolicy {
    name: &'static str,
    kind: ConsumerKind,
    config: DisplacementConfig,
    origin: Option<(PointerId, Point)>,
}

impl DisplacementPolicy {
    /// Create a policy with no gesture in progress.
    pub fn new(name: &'static str, config: DisplacementConfig) -> Self {
        Self {
            name,
            kind: ConsumerKind::empty(),
            config,
            origin: None,
        }
    }

    /// Set the kind reported by the node.
    pub fn with_kind(mut self, kind: ConsumerKind) -> Self {
        self.kind = kind;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &DisplacementConfig {
        &self.config
    }

    /// Where the tracked gesture went down, if one is in progress.
    pub fn origin(&self) -> Option<Point> {
        self.origin.map(|(_, p)| p)
    }

    fn reached(&self, d: Vec2) -> bool {
        let slop2 = self.config.slop * self.config.slop;
        match self.config.axis {
            Axis::X => d.x * d.x >= slop2,
            Axis::Y => d.y * d.y >= slop2,
            Axis::Any => d.hypot2() >= slop2,
        }
    }
}

impl InterceptPolicy for DisplacementPolicy {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> ConsumerKind {
        self.kind
    }

    fn inspect(&mut self, sample: &Sample) -> Decision {
        match sample.action {
            Action::Down => {
                self.origin = Some((sample.pointer, sample.position));
                Decision::Forward
            }
            Action::Move | Action::PointerDown | Action::PointerUp => match self.origin {
                Some((primary, origin))
                    if sample.pointer == primary && self.reached(sample.position - origin) =>
                {
                    Decision::Intercept
                }
                _ => Decision::Forward,
            },
            Action::Up | Action::Cancel => {
                self.origin = None;
                Decision::Forward
            }
            Action::Unknown(_) => Decision::Forward,
        }
    }

    fn handle(&mut self, sample: &Sample) {
        if sample.action.ends_session() {
            self.origin = None;
        }
    }

    fn allow_intercept_by_parent(&self) -> bool {
        !(self.config.veto_while_tracking && self.origin.is_some())
    }

    fn on_consumer_about_to_be_switched(&mut self) {
        self.origin = None;
    }
}

/// A pass-through policy that never intercepts.
#[derive(Clone, Debug)]
pub struct Never {
    name: &'static str,
    kind: ConsumerKind,
}

impl Never {
    /// Create a named pass-through policy.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            kind: ConsumerKind::empty(),
        }
    }

    /// Set the kind reported by the node.
    pub fn with_kind(mut self, kind: ConsumerKind) -> Self {
        self.kind = kind;
        self
    }
}

impl InterceptPolicy for Never {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> ConsumerKind {
        self.kind
    }

    fn inspect(&mut self, _sample: &Sample) -> Decision {
        Decision::Forward
    }
}
