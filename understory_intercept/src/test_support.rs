// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording consumers, probe policies, and a counting gate for unit tests.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Point;

use crate::consumer::EventConsumer;
use crate::delegate::{Decision, InterceptPolicy};
use crate::gate::{PilferGate, SeizeError};
use crate::snapshot::SnapshotBuilder;
use crate::types::{Action, ConsumerKind, Sample};

/// Sample for the primary pointer at `(x, y)`.
pub(crate) fn at(action: Action, x: f64, y: f64) -> Sample {
    Sample::new(action, Point::new(x, y), 0)
}

/// Shared record of which node saw which sample, in delivery order.
#[derive(Default)]
pub(crate) struct Journal {
    seen: RefCell<Vec<(String, Sample)>>,
    switches: RefCell<Vec<String>>,
}

impl Journal {
    fn note(&self, who: &str, sample: &Sample) {
        self.seen.borrow_mut().push((String::from(who), *sample));
    }

    fn note_switch(&self, who: &str) {
        self.switches.borrow_mut().push(String::from(who));
    }

    pub(crate) fn samples_of(&self, who: &str) -> Vec<Sample> {
        self.seen
            .borrow()
            .iter()
            .filter(|(w, _)| w == who)
            .map(|(_, s)| *s)
            .collect()
    }

    pub(crate) fn actions_of(&self, who: &str) -> Vec<Action> {
        self.samples_of(who).into_iter().map(|s| s.action).collect()
    }

    pub(crate) fn switches(&self) -> Vec<String> {
        self.switches.borrow().clone()
    }
}

/// Policy that journals everything it inspects or handles.
pub(crate) struct Probe<'j> {
    name: &'static str,
    journal: &'j Journal,
    trigger: Option<Box<dyn Fn(&Sample) -> bool>>,
    veto: bool,
}

impl<'j> Probe<'j> {
    pub(crate) fn new(name: &'static str, journal: &'j Journal) -> Self {
        Self {
            name,
            journal,
            trigger: None,
            veto: false,
        }
    }

    pub(crate) fn triggered_by(mut self, trigger: impl Fn(&Sample) -> bool + 'static) -> Self {
        self.trigger = Some(Box::new(trigger));
        self
    }

    pub(crate) fn vetoing(mut self) -> Self {
        self.veto = true;
        self
    }
}

impl InterceptPolicy for Probe<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn inspect(&mut self, sample: &Sample) -> Decision {
        self.journal.note(self.name, sample);
        match &self.trigger {
            Some(t) if t(sample) => Decision::Intercept,
            _ => Decision::Forward,
        }
    }

    fn handle(&mut self, sample: &Sample) {
        self.journal.note(self.name, sample);
    }

    fn allow_intercept_by_parent(&self) -> bool {
        !self.veto
    }

    fn on_consumer_about_to_be_switched(&mut self) {
        self.journal.note_switch(self.name);
    }
}

/// Terminal consumer that journals every sample.
pub(crate) struct Recorder<'j> {
    name: &'static str,
    journal: &'j Journal,
    veto: bool,
    veto_switch: Option<&'j Cell<bool>>,
}

impl<'j> Recorder<'j> {
    pub(crate) fn new(name: &'static str, journal: &'j Journal) -> Self {
        Self {
            name,
            journal,
            veto: false,
            veto_switch: None,
        }
    }

    pub(crate) fn vetoing(mut self) -> Self {
        self.veto = true;
        self
    }

    /// Veto while `switch` is set; the test flips it after the chain is built.
    pub(crate) fn vetoing_while(mut self, switch: &'j Cell<bool>) -> Self {
        self.veto_switch = Some(switch);
        self
    }
}

impl EventConsumer for Recorder<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> ConsumerKind {
        ConsumerKind::empty()
    }

    fn on_event(&mut self, sample: &Sample) {
        self.journal.note(self.name, sample);
    }

    fn active_consumer_in_hierarchy(&self) -> &dyn EventConsumer {
        self
    }

    fn allow_intercept_by_parent(&self) -> bool {
        !(self.veto || self.veto_switch.is_some_and(Cell::get))
    }

    fn on_consumer_about_to_be_switched(&mut self) {
        self.journal.note_switch(self.name);
    }

    fn describe(&self, out: &mut SnapshotBuilder) {
        out.push(self.name, self.kind(), None);
    }
}

/// Gate that counts seize requests and optionally refuses them.
#[derive(Default)]
pub(crate) struct CountingGate {
    calls: Cell<u32>,
    sessions: Cell<u32>,
    refusal: Option<SeizeError>,
}

impl CountingGate {
    pub(crate) fn refusing(err: SeizeError) -> Self {
        Self {
            refusal: Some(err),
            ..Default::default()
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.get()
    }

    pub(crate) fn sessions(&self) -> u32 {
        self.sessions.get()
    }
}

impl PilferGate for CountingGate {
    fn pilfer_pointers(&self) -> Result<(), SeizeError> {
        self.calls.set(self.calls.get() + 1);
        match self.refusal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn on_session_start(&self) {
        self.sessions.set(self.sessions.get() + 1);
    }
}
