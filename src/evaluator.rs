//! Itinerary evaluator: temporal schedule, feasibility, objective vector.
//!
//! The evaluator is pure; both engines call it on every candidate. Infeasible
//! candidates are not discarded: they come back stamped with a penalty cost
//! and time so they stay comparable but dominated by any feasible solution.

use std::collections::HashSet;

use crate::model::{Attraction, Itinerary, Objectives, ScheduleEntry, Solution, TransportMode};
use crate::transport::TransportContext;

/// Canonical single-day touring limit: 14 hours.
pub const DEFAULT_DAILY_LIMIT_MINUTES: f64 = 840.0;

/// Cost and time stamped onto infeasible candidates. Strictly worse than any
/// feasible single-day itinerary.
pub const INFEASIBILITY_PENALTY: f64 = 1_000_000.0;

#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Maximum elapsed minutes between arrival at the first stop and
    /// departure from the last (inclusive bound).
    pub daily_limit_minutes: f64,
    /// Cost/time value stamped onto infeasible candidates.
    pub penalty: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            daily_limit_minutes: DEFAULT_DAILY_LIMIT_MINUTES,
            penalty: INFEASIBILITY_PENALTY,
        }
    }
}

/// Result of evaluating one itinerary.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub schedule: Vec<ScheduleEntry>,
    pub objectives: Objectives,
    pub feasible: bool,
}

/// Maps an ordered attraction sequence plus transport choices to a
/// four-objective vector under time-window and daily-limit constraints.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    attractions: &'a [Attraction],
    transport: &'a TransportContext,
    config: EvaluatorConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(attractions: &'a [Attraction], transport: &'a TransportContext) -> Self {
        Self {
            attractions,
            transport,
            config: EvaluatorConfig::default(),
        }
    }

    pub fn with_config(
        attractions: &'a [Attraction],
        transport: &'a TransportContext,
        config: EvaluatorConfig,
    ) -> Self {
        Self {
            attractions,
            transport,
            config,
        }
    }

    pub fn attractions(&self) -> &'a [Attraction] {
        self.attractions
    }

    pub fn transport(&self) -> &'a TransportContext {
        self.transport
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Preferred mode for every consecutive pair of stops.
    pub fn default_modes(&self, stops: &[usize]) -> Vec<TransportMode> {
        stops
            .windows(2)
            .map(|pair| self.transport.preferred_mode(pair[0], pair[1]))
            .collect()
    }

    /// Evaluate an ordered stop sequence; modes default to the preferred
    /// mode of each pair when not supplied.
    pub fn evaluate_stops(
        &self,
        stops: Vec<usize>,
        modes: Option<Vec<TransportMode>>,
    ) -> Solution {
        let modes = modes.unwrap_or_else(|| self.default_modes(&stops));
        let itinerary = Itinerary::new(stops, modes);
        let evaluation = self.evaluate(&itinerary);
        Solution {
            itinerary,
            schedule: evaluation.schedule,
            objectives: evaluation.objectives,
        }
    }

    /// Derive the schedule and objective vector for an itinerary.
    ///
    /// The tour begins at the first attraction's opening minute, not earlier.
    /// Each stop must finish service before closing, and the whole tour must
    /// fit the daily limit (both bounds inclusive).
    pub fn evaluate(&self, itinerary: &Itinerary) -> Evaluation {
        if itinerary.is_empty() {
            return Evaluation {
                schedule: Vec::new(),
                objectives: Objectives {
                    cost: 0.0,
                    time: 0.0,
                    attractions: 0,
                    neighborhoods: 0,
                },
                feasible: true,
            };
        }

        let mut schedule = Vec::with_capacity(itinerary.len());
        let mut feasible = true;
        let mut transport_cost = 0.0;

        for (position, &stop) in itinerary.stops.iter().enumerate() {
            let attraction = &self.attractions[stop];
            let arrival = if position == 0 {
                attraction.opening_minute
            } else {
                let previous: &ScheduleEntry = &schedule[position - 1];
                let mode = itinerary.modes[position - 1];
                let from = itinerary.stops[position - 1];
                transport_cost += self.transport.travel_cost(from, stop, mode);
                previous.departure + self.transport.travel_time(from, stop, mode)
            };
            let wait = (attraction.opening_minute - arrival).max(0.0);
            let departure = arrival + wait + attraction.visit_minutes;

            // Service must start early enough to finish before closing.
            if arrival + wait > attraction.closing_minute - attraction.visit_minutes {
                feasible = false;
            }

            schedule.push(ScheduleEntry {
                arrival,
                wait,
                departure,
            });
        }

        let first_arrival = schedule[0].arrival;
        let last_departure = schedule[schedule.len() - 1].departure;
        let elapsed = last_departure - first_arrival;
        if elapsed > self.config.daily_limit_minutes {
            feasible = false;
        }

        let objectives = if feasible {
            let entry_cost: f64 = itinerary
                .stops
                .iter()
                .map(|&stop| self.attractions[stop].cost)
                .sum();
            let neighborhoods: HashSet<&str> = itinerary
                .stops
                .iter()
                .map(|&stop| self.attractions[stop].neighborhood.as_str())
                .collect();
            Objectives {
                cost: entry_cost + transport_cost,
                time: elapsed,
                attractions: itinerary.len(),
                neighborhoods: neighborhoods.len(),
            }
        } else {
            Objectives {
                cost: self.config.penalty,
                time: self.config.penalty,
                attractions: 0,
                neighborhoods: 0,
            }
        };

        Evaluation {
            schedule,
            objectives,
            feasible,
        }
    }
}
