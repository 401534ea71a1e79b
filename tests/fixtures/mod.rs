//! Test fixtures for ev-trip-planner.
//!
//! Provides:
//! - Real South Indian city coordinates
//! - Synthetic straight routes with stations placed along them
//! - Route providers that succeed or fail on demand

#![allow(dead_code)]

pub mod places;

pub use places::*;

use ev_trip_planner::geo::{Coordinate, EARTH_RADIUS_KM};
use ev_trip_planner::polyline::Polyline;
use ev_trip_planner::station::Station;
use ev_trip_planner::traits::{Route, RouteError, RouteProvider};

/// Assumed speed for synthetic route durations.
pub const FIXTURE_SPEED_KMH: f64 = 60.0;

/// Point `km` due east of `origin` along its parallel.
pub fn east_of(origin: Coordinate, km: f64) -> Coordinate {
    let km_per_degree = EARTH_RADIUS_KM.to_radians() * origin.latitude.to_radians().cos();
    Coordinate::new(origin.latitude, origin.longitude + km / km_per_degree)
}

/// Linear interpolation in degree space.
pub fn point_along(from: Coordinate, to: Coordinate, fraction: f64) -> Coordinate {
    Coordinate::new(
        from.latitude + (to.latitude - from.latitude) * fraction,
        from.longitude + (to.longitude - from.longitude) * fraction,
    )
}

/// A straight route with `vertices` evenly spaced points.
pub fn straight_route(from: Coordinate, to: Coordinate, vertices: usize) -> Route {
    let points: Vec<Coordinate> = (0..vertices)
        .map(|i| point_along(from, to, i as f64 / (vertices - 1) as f64))
        .collect();
    let polyline = Polyline::new(points);
    let distance_km = polyline.length_km();
    Route {
        distance_km,
        duration_minutes: distance_km / FIXTURE_SPEED_KMH * 60.0,
        polyline,
    }
}

pub fn station(id: &str, at: Coordinate, connector: &str) -> Station {
    Station {
        id: id.to_string(),
        name: format!("Fixture Station {id}"),
        state: "Karnataka".to_string(),
        city: "Fixture".to_string(),
        address: format!("Highway marker {id}"),
        latitude: at.latitude,
        longitude: at.longitude,
        connector_type: connector.to_string(),
    }
}

/// Stations on the straight line between `from` and `to`, one per fraction.
pub fn stations_along(from: Coordinate, to: Coordinate, fractions: &[f64], connector: &str) -> Vec<Station> {
    fractions
        .iter()
        .enumerate()
        .map(|(i, fraction)| station(&format!("s{}", i + 1), point_along(from, to, *fraction), connector))
        .collect()
}

/// Always returns the same route.
#[derive(Debug, Clone)]
pub struct FixedRoute(pub Route);

impl RouteProvider for FixedRoute {
    fn route(&self, _origin: Coordinate, _destination: Coordinate) -> Result<Route, RouteError> {
        Ok(self.0.clone())
    }
}

/// Always fails with the given HTTP status.
#[derive(Debug, Clone, Copy)]
pub struct FailingRoute(pub u16);

impl RouteProvider for FailingRoute {
    fn route(&self, _origin: Coordinate, _destination: Coordinate) -> Result<Route, RouteError> {
        Err(RouteError::Status(self.0))
    }
}

/// Builds straight routes between whatever points it is asked for.
#[derive(Debug, Clone, Copy)]
pub struct StraightRouter {
    pub vertices: usize,
}

impl RouteProvider for StraightRouter {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route, RouteError> {
        Ok(straight_route(origin, destination, self.vertices))
    }
}
