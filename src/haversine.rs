//! Haversine transport matrices (fallback when no matrix files are given).
//!
//! Uses great-circle distance to estimate walking and driving legs.
//! Less accurate than measured matrices (ignores roads) but always available.

use crate::model::Attraction;
use crate::transport::TransportMatrices;

/// Average walking speed assumption for time estimation.
const DEFAULT_WALK_SPEED_KMH: f64 = 5.0;

/// Average driving speed assumption for time estimation.
const DEFAULT_CAR_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based matrix builder.
///
/// Estimates travel times from straight-line distance and assumed speeds.
/// Useful as a fallback when no measured matrices are available.
#[derive(Debug, Clone)]
pub struct HaversineMatrices {
    /// Assumed walking speed in km/h.
    pub walk_speed_kmh: f64,
    /// Assumed driving speed in km/h.
    pub car_speed_kmh: f64,
}

impl Default for HaversineMatrices {
    fn default() -> Self {
        Self {
            walk_speed_kmh: DEFAULT_WALK_SPEED_KMH,
            car_speed_kmh: DEFAULT_CAR_SPEED_KMH,
        }
    }
}

impl HaversineMatrices {
    pub fn new(walk_speed_kmh: f64, car_speed_kmh: f64) -> Self {
        Self {
            walk_speed_kmh,
            car_speed_kmh,
        }
    }

    /// Calculate haversine distance between two points in kilometers.
    fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Convert distance in km to travel time in minutes at a given speed.
    fn km_to_minutes(km: f64, speed_kmh: f64) -> f64 {
        km / speed_kmh * 60.0
    }

    /// Build all four matrices from the attraction coordinates.
    pub fn build(&self, attractions: &[Attraction]) -> TransportMatrices {
        let n = attractions.len();
        let mut distance = vec![vec![0.0; n]; n];
        let mut car_time = vec![vec![0.0; n]; n];
        let mut walk_time = vec![vec![0.0; n]; n];

        for (i, from) in attractions.iter().enumerate() {
            for (j, to) in attractions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let km = Self::haversine_km(
                    (from.latitude, from.longitude),
                    (to.latitude, to.longitude),
                );
                distance[i][j] = km * 1000.0;
                car_time[i][j] = Self::km_to_minutes(km, self.car_speed_kmh);
                walk_time[i][j] = Self::km_to_minutes(km, self.walk_speed_kmh);
            }
        }

        TransportMatrices {
            car_distance: distance.clone(),
            walk_distance: distance,
            car_time,
            walk_time,
        }
    }
}
