//! Test fixtures for tour-planner.
//!
//! Provides realistic test data including:
//! - Real Rio de Janeiro attractions (coordinates from OpenStreetMap)
//! - Builders for attractions and transport contexts

pub mod rio_locations;

pub use rio_locations::*;

use tour_planner::model::Attraction;
use tour_planner::transport::{TransportContext, TransportMatrices};

/// Builder for test attractions with sensible defaults.
#[derive(Debug, Clone)]
pub struct AttractionBuilder {
    name: String,
    neighborhood: String,
    latitude: f64,
    longitude: f64,
    visit_minutes: f64,
    cost: f64,
    opening_minute: f64,
    closing_minute: f64,
}

impl AttractionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            neighborhood: "center".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            visit_minutes: 60.0,
            cost: 10.0,
            opening_minute: 9.0 * 60.0,
            closing_minute: 18.0 * 60.0,
        }
    }

    pub fn neighborhood(mut self, neighborhood: &str) -> Self {
        self.neighborhood = neighborhood.to_string();
        self
    }

    pub fn coords(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn visit(mut self, minutes: f64) -> Self {
        self.visit_minutes = minutes;
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Opening hours given as minutes of day.
    pub fn hours(mut self, opening: f64, closing: f64) -> Self {
        self.opening_minute = opening;
        self.closing_minute = closing;
        self
    }

    pub fn open_all_day(self) -> Self {
        self.hours(0.0, 1439.0)
    }

    pub fn build(self) -> Attraction {
        Attraction {
            name: self.name,
            neighborhood: self.neighborhood,
            latitude: self.latitude,
            longitude: self.longitude,
            visit_minutes: self.visit_minutes,
            cost: self.cost,
            opening_minute: self.opening_minute,
            closing_minute: self.closing_minute,
        }
    }
}

/// Transport context where every pair shares the same legs. Handy for
/// scenarios that only exercise the temporal logic.
pub fn uniform_context(
    attractions: &[Attraction],
    car_time: f64,
    walk_time: f64,
    car_distance: f64,
) -> TransportContext {
    let n = attractions.len();
    let names = attractions.iter().map(|a| a.name.clone()).collect();
    let filled = |value: f64| {
        let mut matrix = vec![vec![value; n]; n];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        matrix
    };
    TransportContext::new(
        names,
        TransportMatrices {
            car_distance: filled(car_distance),
            walk_distance: filled(car_distance),
            car_time: filled(car_time),
            walk_time: filled(walk_time),
        },
    )
}
