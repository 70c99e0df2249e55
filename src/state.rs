//! Shared roster and position state fed by the data sources.
//!
//! All mutation goes through the `apply_*` entry points, which run on the
//! frame loop. Each source hands out tickets so that a slow response can
//! never overwrite one issued after it.

use std::collections::HashMap;

use crate::feed::{FeedError, FeedMessage};
use crate::position::{SimulatedOrbit, SpacecraftPosition};
use crate::roster::{CraftCrew, CrewRoster};

#[derive(Clone, Debug, Default)]
pub struct SourceSequence {
    issued: u64,
    applied: u64,
}

impl SourceSequence {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Accepts a ticket only if nothing newer has been applied yet.
    pub fn accept(&mut self, ticket: u64) -> bool {
        if ticket <= self.applied {
            return false;
        }
        self.applied = ticket;
        true
    }

    /// Tickets issued since the last applied one.
    pub fn in_flight(&self) -> u64 {
        self.issued - self.applied
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RosterSource {
    Live,
    Fallback,
}

impl RosterSource {
    pub fn label(&self) -> &'static str {
        match self {
            RosterSource::Live => "live",
            RosterSource::Fallback => "offline snapshot",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    roster: Option<(CrewRoster, RosterSource)>,
    positions: HashMap<String, SpacecraftPosition>,
    orbit: SimulatedOrbit,
    roster_seq: SourceSequence,
    position_seq: SourceSequence,
}

impl AppState {
    pub fn roster(&self) -> Option<&CrewRoster> {
        self.roster.as_ref().map(|(r, _)| r)
    }

    pub fn roster_source(&self) -> Option<RosterSource> {
        self.roster.as_ref().map(|(_, s)| *s)
    }

    pub fn positions(&self) -> &HashMap<String, SpacecraftPosition> {
        &self.positions
    }

    pub fn position(&self, craft: &str) -> Option<&SpacecraftPosition> {
        self.positions.get(craft)
    }

    pub fn craft_groups(&self) -> Vec<CraftCrew> {
        self.roster().map(CrewRoster::craft_groups).unwrap_or_default()
    }

    pub fn begin_roster_refresh(&mut self) -> u64 {
        self.roster_seq.issue()
    }

    pub fn begin_position_refresh(&mut self) -> u64 {
        self.position_seq.issue()
    }

    pub fn apply(&mut self, message: FeedMessage, fallback: &CrewRoster, now: i64) -> bool {
        match message {
            FeedMessage::Roster { ticket, result } => self.apply_roster(ticket, result, fallback),
            FeedMessage::Position { ticket, craft, result } => {
                self.apply_position(ticket, &craft, result, now)
            }
        }
    }

    pub fn apply_roster(
        &mut self,
        ticket: u64,
        result: Result<CrewRoster, FeedError>,
        fallback: &CrewRoster,
    ) -> bool {
        if !self.roster_seq.accept(ticket) {
            log::debug!("Discarding superseded roster response #{}", ticket);
            return false;
        }
        match result {
            Ok(roster) => {
                log::info!("Astronaut data loaded: {} people in space", roster.number);
                self.roster = Some((roster, RosterSource::Live));
            }
            Err(e) => {
                log::warn!("Using fallback astronaut data: {}", e);
                self.use_fallback_roster(fallback);
            }
        }
        true
    }

    pub fn use_fallback_roster(&mut self, fallback: &CrewRoster) {
        self.roster = Some((fallback.clone(), RosterSource::Fallback));
    }

    pub fn apply_position(
        &mut self,
        ticket: u64,
        craft: &str,
        result: Result<SpacecraftPosition, FeedError>,
        now: i64,
    ) -> bool {
        if !self.position_seq.accept(ticket) {
            log::debug!("Discarding superseded {} position #{}", craft, ticket);
            return false;
        }
        match result {
            Ok(position) => {
                log::debug!("{} position updated", craft);
                self.positions.insert(craft.to_string(), position);
            }
            Err(e) => {
                log::warn!("Using simulated {} orbit: {}", craft, e);
                self.advance_simulated(craft, now);
            }
        }
        true
    }

    pub fn advance_simulated(&mut self, craft: &str, now: i64) {
        let position = self.orbit.step(now);
        self.positions.insert(craft.to_string(), position);
    }

    pub fn simulated_angle(&self) -> f64 {
        self.orbit.angle()
    }

    pub fn requests_in_flight(&self) -> u64 {
        self.roster_seq.in_flight() + self.position_seq.in_flight()
    }
}
