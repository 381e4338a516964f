use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::directory::DirectoryStore;
use crate::core::matcher::MatchEngine;
use crate::models::{AppointmentConfirmation, LocationFix, RankedLawyer};

/// States of the booking flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowState {
    Idle,
    Activating,
    ReadyToSearch,
    Searching,
    ResultsShown,
    Confirmed,
}

/// Side effect requested by a transition, performed by the caller
///
/// Transitions stay pure; the shell owns the actual sensor call and reports
/// back through [`BookingFlow::location_resolved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    AcquireLocation { generation: u64 },
}

/// Generates simulated appointment slots
///
/// The randomness source is injected so tests can seed it and assert exact
/// output. Slots land 1-7 days out, between 09:00 and 16:30, on the half hour.
#[derive(Debug)]
pub struct AppointmentScheduler<R: Rng> {
    rng: R,
}

impl<R: Rng> AppointmentScheduler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Propose a slot relative to `now`
    pub fn propose(&mut self, now: NaiveDateTime) -> NaiveDateTime {
        let day_offset = self.rng.random_range(1..=7);
        let hour = self.rng.random_range(9..=16u32);
        let minute = if self.rng.random_bool(0.5) { 30 } else { 0 };

        (now.date() + Duration::days(day_offset))
            .and_hms_opt(hour, minute, 0)
            .expect("slot hour and minute are in range")
    }
}

/// Render a slot the way the confirmation view shows it,
/// e.g. "Saturday, September 5 at 10:30 AM"
pub fn describe_slot(slot: NaiveDateTime) -> String {
    slot.format("%A, %B %-d at %-I:%M %p").to_string()
}

/// The booking flow state machine
///
/// One value per activation lifecycle: opening the flow activates it, closing
/// it discards all transient state. Every input either advances the flow or
/// is a no-op; there is no terminal failure state.
#[derive(Debug, Clone)]
pub struct BookingFlow {
    state: FlowState,
    /// Activation token; a location resolution carrying a stale generation
    /// belongs to an abandoned activation and is discarded.
    generation: u64,
    specialties: Vec<String>,
    selected: Option<String>,
    location: Option<LocationFix>,
    results: Vec<RankedLawyer>,
    confirmation: Option<AppointmentConfirmation>,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            generation: 0,
            specialties: Vec::new(),
            selected: None,
            location: None,
            results: Vec::new(),
            confirmation: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn specialties(&self) -> &[String] {
        &self.specialties
    }

    pub fn selected_specialty(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn results(&self) -> &[RankedLawyer] {
        &self.results
    }

    pub fn confirmation(&self) -> Option<&AppointmentConfirmation> {
        self.confirmation.as_ref()
    }

    /// True when this activation runs without a resolved location and the
    /// degraded-mode advisory should be shown
    pub fn location_advisory(&self) -> bool {
        matches!(self.location, Some(LocationFix::Unavailable(_)))
    }

    /// Open the flow: reset transient state, derive the specialty catalog,
    /// select the lexicographically-first tag and request one location
    /// acquisition
    ///
    /// Lands in `Activating`; the flow moves to `ReadyToSearch` once the
    /// acquisition resolves, successfully or not.
    pub fn activate(&mut self, directory: &DirectoryStore) -> Vec<Effect> {
        self.generation += 1;
        self.results.clear();
        self.confirmation = None;
        self.location = None;
        self.specialties = directory.specialties();
        self.selected = self.specialties.first().cloned();
        self.state = FlowState::Activating;

        vec![Effect::AcquireLocation {
            generation: self.generation,
        }]
    }

    /// Report the outcome of a location acquisition
    ///
    /// Returns false when the fix belongs to an abandoned activation and was
    /// discarded. A degraded fix still moves the flow to `ReadyToSearch`;
    /// unavailability is an advisory, not an error.
    pub fn location_resolved(&mut self, generation: u64, fix: LocationFix) -> bool {
        if generation != self.generation || self.state != FlowState::Activating {
            return false;
        }

        self.location = Some(fix);
        self.state = FlowState::ReadyToSearch;
        true
    }

    /// Change the selected specialty
    ///
    /// Stale results from a previous search must not be shown against the new
    /// selection, so from `ResultsShown` this clears them and returns to
    /// `ReadyToSearch`. Unknown tags are a no-op.
    pub fn select_specialty(&mut self, tag: &str) -> bool {
        let selectable = matches!(
            self.state,
            FlowState::Activating | FlowState::ReadyToSearch | FlowState::ResultsShown
        );
        if !selectable || !self.specialties.iter().any(|s| s == tag) {
            return false;
        }

        self.selected = Some(tag.to_string());
        if self.state == FlowState::ResultsShown {
            self.results.clear();
            self.state = FlowState::ReadyToSearch;
        }
        true
    }

    /// Run a search for the currently selected specialty
    ///
    /// Valid from `ReadyToSearch` and `ResultsShown`; always lands in
    /// `ResultsShown`, empty results included. A search before the location
    /// resolves, or with an empty catalog, is a no-op.
    pub fn search(&mut self, engine: &MatchEngine, directory: &DirectoryStore) -> bool {
        if !matches!(
            self.state,
            FlowState::ReadyToSearch | FlowState::ResultsShown
        ) {
            return false;
        }
        let (Some(specialty), Some(location)) = (self.selected.clone(), self.location) else {
            return false;
        };

        self.state = FlowState::Searching;
        self.results = engine.rank(directory, &specialty, location);
        self.state = FlowState::ResultsShown;
        true
    }

    /// Book an appointment with a professional from the current results
    ///
    /// Only valid in `ResultsShown` and only for an id present in the last
    /// search's results; anything else is a stale caller reference and is
    /// rejected as a no-op. The confirmation is simulated, no scheduling
    /// system is contacted.
    pub fn book<R: Rng>(
        &mut self,
        lawyer_id: u32,
        scheduler: &mut AppointmentScheduler<R>,
        now: NaiveDateTime,
    ) -> Option<&AppointmentConfirmation> {
        if self.state != FlowState::ResultsShown {
            return None;
        }
        let lawyer = self
            .results
            .iter()
            .find(|r| r.lawyer.id == lawyer_id)?
            .lawyer
            .clone();

        let slot = scheduler.propose(now);
        self.confirmation = Some(AppointmentConfirmation {
            lawyer_name: lawyer.name,
            scheduled_for: describe_slot(slot),
        });
        self.state = FlowState::Confirmed;
        self.confirmation.as_ref()
    }

    /// Close the flow from any state, discarding all transient state
    ///
    /// Bumping the generation here abandons any acquisition still in flight.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = FlowState::Idle;
        self.specialties.clear();
        self.selected = None;
        self.location = None;
        self.results.clear();
        self.confirmation = None;
    }
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self::new()
    }
}
