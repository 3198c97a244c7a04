//! Transport oracle: O(1) distance/time/cost lookups between attractions.
//!
//! The context owns the four loaded matrices; the evaluator and the engines
//! borrow it for their lifetime. There are no globals.

use std::collections::HashMap;

use crate::model::TransportMode;

/// Walking is preferred below this walking time (minutes).
pub const DEFAULT_WALK_PREFERENCE_MINUTES: f64 = 15.0;

/// Default car fare per kilometer.
pub const DEFAULT_CAR_COST_PER_KM: f64 = 1.0;

/// Error type for transport lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The name is not part of the loaded attraction set.
    UnknownAttraction(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::UnknownAttraction(name) => {
                write!(f, "unknown attraction: {name}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// The four square matrices indexed by attraction position.
///
/// Self-entries are zero and no value is negative; symmetry is not assumed.
/// Distances are meters, times are minutes.
#[derive(Debug, Clone)]
pub struct TransportMatrices {
    pub car_distance: Vec<Vec<f64>>,
    pub walk_distance: Vec<Vec<f64>>,
    pub car_time: Vec<Vec<f64>>,
    pub walk_time: Vec<Vec<f64>>,
}

/// Immutable lookup context shared by the evaluator and both engines.
#[derive(Debug, Clone)]
pub struct TransportContext {
    names: Vec<String>,
    index: HashMap<String, usize>,
    matrices: TransportMatrices,
    /// Walking time threshold (minutes) below which WALK is preferred.
    pub walk_preference_minutes: f64,
    /// Car fare per kilometer; walking is free.
    pub car_cost_per_km: f64,
}

impl TransportContext {
    pub fn new(names: Vec<String>, matrices: TransportMatrices) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names,
            index,
            matrices,
            walk_preference_minutes: DEFAULT_WALK_PREFERENCE_MINUTES,
            car_cost_per_km: DEFAULT_CAR_COST_PER_KM,
        }
    }

    pub fn with_walk_preference(mut self, minutes: f64) -> Self {
        self.walk_preference_minutes = minutes;
        self
    }

    pub fn with_car_cost_per_km(mut self, rate: f64) -> Self {
        self.car_cost_per_km = rate;
        self
    }

    /// Number of attractions covered by the matrices.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of a named attraction in the matrix ordering.
    pub fn index_of(&self, name: &str) -> Result<usize, TransportError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| TransportError::UnknownAttraction(name.to_string()))
    }

    /// Distance in meters between attraction positions `from` and `to`.
    pub fn distance(&self, from: usize, to: usize, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Car => self.matrices.car_distance[from][to],
            TransportMode::Walk => self.matrices.walk_distance[from][to],
        }
    }

    /// Travel time in minutes between attraction positions `from` and `to`.
    pub fn travel_time(&self, from: usize, to: usize, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Car => self.matrices.car_time[from][to],
            TransportMode::Walk => self.matrices.walk_time[from][to],
        }
    }

    /// Monetary cost of the leg. Walking is free, car rides are charged
    /// per km of car distance.
    pub fn travel_cost(&self, from: usize, to: usize, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Walk => 0.0,
            TransportMode::Car => {
                self.matrices.car_distance[from][to] / 1000.0 * self.car_cost_per_km
            }
        }
    }

    /// WALK when the walking time is within the preference threshold,
    /// CAR otherwise.
    pub fn preferred_mode(&self, from: usize, to: usize) -> TransportMode {
        if self.matrices.walk_time[from][to] <= self.walk_preference_minutes {
            TransportMode::Walk
        } else {
            TransportMode::Car
        }
    }
}
