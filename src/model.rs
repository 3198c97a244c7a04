//! Core domain types for single-day tour planning.
//!
//! These are intentionally plain value types. Temporal schedules are always
//! derived by the evaluator and never edited directly by search operators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closing minute that, together with opening minute 0, marks an attraction
/// as open around the clock.
pub const LAST_MINUTE_OF_DAY: f64 = 1439.0;

/// A candidate attraction loaded once at startup and never mutated.
///
/// `name` is the stable unique key; all matrix lookups go through the
/// attraction's position in the loaded catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    pub neighborhood: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Visit duration in minutes.
    pub visit_minutes: f64,
    /// Entry cost in currency units.
    pub cost: f64,
    /// Opening minute-of-day (0..=1439).
    pub opening_minute: f64,
    /// Closing minute-of-day (0..=1439).
    pub closing_minute: f64,
}

impl Attraction {
    /// Whether the attraction never closes (open 00:00, close 23:59).
    pub fn is_open_all_day(&self) -> bool {
        self.opening_minute == 0.0 && self.closing_minute == LAST_MINUTE_OF_DAY
    }
}

/// Transport mode between two consecutive attractions.
///
/// Bus variants are intentionally absent; walking is free, car rides are
/// charged per km by the transport context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Walk,
    Car,
}

impl TransportMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            TransportMode::Walk => TransportMode::Car,
            TransportMode::Car => TransportMode::Walk,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Walk => "WALK",
            TransportMode::Car => "CAR",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WALK" => Ok(TransportMode::Walk),
            "CAR" => Ok(TransportMode::Car),
            other => Err(format!("unknown transport mode: {other}")),
        }
    }
}

/// An ordered visit sequence with the transport choice for each leg.
///
/// Invariants (enforced by construction sites, checked in debug builds):
/// no attraction index appears twice, and `modes.len()` is
/// `stops.len() - 1` for non-empty itineraries (0 otherwise).
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    /// Attraction indices into the loaded catalog, in visit order.
    pub stops: Vec<usize>,
    /// Transport mode per consecutive pair of stops.
    pub modes: Vec<TransportMode>,
}

impl Itinerary {
    pub fn new(stops: Vec<usize>, modes: Vec<TransportMode>) -> Self {
        debug_assert_eq!(modes.len(), stops.len().saturating_sub(1));
        Self { stops, modes }
    }

    pub fn empty() -> Self {
        Self {
            stops: Vec::new(),
            modes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// True when no attraction index occurs twice.
    pub fn has_unique_stops(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.stops.len());
        self.stops.iter().all(|stop| seen.insert(*stop))
    }
}

/// Derived timing for one stop, in minutes-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub arrival: f64,
    /// Minutes spent waiting for the attraction to open.
    pub wait: f64,
    pub departure: f64,
}

/// The four-objective vector of an evaluated itinerary.
///
/// Cost and time are minimized directly; attraction and neighborhood counts
/// are maximized, so [`Objectives::minimized`] negates them to give a
/// uniform minimization view for dominance checks and indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Objectives {
    /// Entry costs plus transport costs.
    pub cost: f64,
    /// Departure from the last stop minus arrival at the first.
    pub time: f64,
    pub attractions: usize,
    pub neighborhoods: usize,
}

impl Objectives {
    /// All four objectives as a minimization vector:
    /// `(cost, time, -attractions, -neighborhoods)`.
    pub fn minimized(&self) -> [f64; 4] {
        [
            self.cost,
            self.time,
            -(self.attractions as f64),
            -(self.neighborhoods as f64),
        ]
    }
}

/// An evaluated solution: the itinerary plus its derived schedule and
/// cached objective vector. Owned by engine populations and archives.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub itinerary: Itinerary,
    pub schedule: Vec<ScheduleEntry>,
    pub objectives: Objectives,
}
