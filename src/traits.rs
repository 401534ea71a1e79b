//! Seams to external collaborators.
//!
//! The planner core only depends on these contracts; concrete providers
//! (OSRM, Nominatim, the crowd monitor) implement them, and tests swap in
//! mocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::polyline::Polyline;
use crate::station::Station;

/// A driving route between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub polyline: Polyline,
}

/// Why no route could be obtained.
#[derive(Debug)]
pub enum RouteError {
    /// Transport failure or timeout.
    Http(reqwest::Error),
    /// Provider answered with a non-success status.
    Status(u16),
    /// Provider answered but had no route between the points.
    NoRoute,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::Http(e) => write!(f, "route request failed: {e}"),
            RouteError::Status(status) => write!(f, "route provider returned status {status}"),
            RouteError::NoRoute => write!(f, "no route between the given points"),
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => RouteError::Status(status.as_u16()),
            None => RouteError::Http(err),
        }
    }
}

/// Computes road routes.
pub trait RouteProvider {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route, RouteError>;
}

/// One geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub display_name: String,
    pub coordinate: Coordinate,
    pub place_id: u64,
}

impl GeocodeResult {
    /// The first two comma-separated parts of the display name.
    pub fn short_name(&self) -> String {
        self.display_name
            .split(',')
            .take(2)
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Free-text place search. Failures surface as an empty list.
pub trait Geocoder {
    fn search(&self, query: &str) -> Vec<GeocodeResult>;
}

/// Expected queueing time at a station, if anything is known.
pub trait WaitTimeSource {
    fn wait_minutes(&self, station: &Station) -> Option<u32>;
}

/// Wait-time source for when no live signal is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWaitData;

impl WaitTimeSource for NoWaitData {
    fn wait_minutes(&self, _station: &Station) -> Option<u32> {
        None
    }
}

/// Adapts a plain function into a wait-time source.
#[derive(Debug, Clone, Copy)]
pub struct WaitTimeFn<F>(pub F);

impl<F> WaitTimeSource for WaitTimeFn<F>
where
    F: Fn(&Station) -> Option<u32>,
{
    fn wait_minutes(&self, station: &Station) -> Option<u32> {
        (self.0)(station)
    }
}
