//! Haversine route provider (fallback when OSRM unavailable).
//!
//! Uses great-circle distance to estimate travel time.
//! Less accurate than OSRM (ignores roads) but always available.

use crate::geo::{distance_km, Coordinate};
use crate::polyline::Polyline;
use crate::traits::{Route, RouteError, RouteProvider};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Straight-line route provider.
///
/// Produces a two-point polyline between origin and destination and a
/// duration from an assumed average speed.
#[derive(Debug, Clone)]
pub struct HaversineRouter {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineRouter {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineRouter {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Convert distance in km to travel time in minutes.
    fn km_to_minutes(&self, km: f64) -> f64 {
        km / self.speed_kmh * 60.0
    }
}

impl RouteProvider for HaversineRouter {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route, RouteError> {
        let km = distance_km(origin, destination);
        Ok(Route {
            distance_km: km,
            duration_minutes: self.km_to_minutes(km),
            polyline: Polyline::new(vec![origin, destination]),
        })
    }
}
