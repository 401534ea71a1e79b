//! Trip feasibility evaluation.
//!
//! Fetches a route, decides whether the current charge covers it, plans
//! charging stops when it does not, and totals the trip time.

use std::fmt;

use serde::Serialize;

use crate::geo::Coordinate;
use crate::planner::{self, ChargingStop, PlannerConfig};
use crate::polyline::Polyline;
use crate::station::Station;
use crate::traits::{NoWaitData, Route, RouteError, RouteProvider, WaitTimeSource};
use crate::vehicle::VehicleProfile;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub name: String,
    pub coordinate: Coordinate,
}

impl Destination {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}

/// What the plan means for the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TripStatus {
    /// Current charge covers the trip with margin.
    Direct,
    /// Charging stops were found that reach the destination.
    Planned,
    /// Some stops were found, but the destination stays out of reach.
    Incomplete,
    /// Current charge reaches the destination but without the safety margin,
    /// and no stop was planned.
    ReachableWithoutMargin,
    /// Charging is needed and no usable station lies along the route.
    NoStations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPlan {
    pub destination: Destination,
    pub total_distance_km: f64,
    /// Driving time plus all charging and waiting.
    pub total_duration_minutes: f64,
    pub total_charging_time_minutes: u32,
    pub total_wait_time_minutes: u32,
    pub can_complete_without_charging: bool,
    pub charging_stops: Vec<ChargingStop>,
    pub route_coordinates: Polyline,
    pub status: TripStatus,
}

#[derive(Debug)]
pub enum TripError {
    /// The route provider could not produce a route.
    NoRoute(RouteError),
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripError::NoRoute(e) => write!(f, "could not calculate route: {e}"),
        }
    }
}

impl std::error::Error for TripError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TripError::NoRoute(e) => Some(e),
        }
    }
}

impl From<RouteError> for TripError {
    fn from(err: RouteError) -> Self {
        TripError::NoRoute(err)
    }
}

/// Builds a plan for an already fetched route.
pub fn plan_trip_on_route<W: WaitTimeSource + ?Sized>(
    route: Route,
    destination: Destination,
    current_soc_percent: f64,
    vehicle: &VehicleProfile,
    stations: &[Station],
    config: &PlannerConfig,
    wait_source: &W,
) -> TripPlan {
    let can_complete = planner::can_complete_without_charging(
        route.distance_km,
        current_soc_percent,
        vehicle.max_range_km,
        config,
    );

    let (charging_stops, status) = if can_complete {
        (Vec::new(), TripStatus::Direct)
    } else {
        let plan = planner::plan(
            route.distance_km,
            current_soc_percent,
            vehicle.max_range_km,
            stations,
            &route.polyline,
            config,
            wait_source,
        );
        let status = match (plan.stops.is_empty(), plan.reaches_destination) {
            (true, true) => TripStatus::ReachableWithoutMargin,
            (true, false) => TripStatus::NoStations,
            (false, true) => TripStatus::Planned,
            (false, false) => TripStatus::Incomplete,
        };
        (plan.stops, status)
    };

    let total_charging_time_minutes: u32 =
        charging_stops.iter().map(|stop| stop.charging_time_minutes).sum();
    let total_wait_time_minutes: u32 = charging_stops
        .iter()
        .map(|stop| stop.wait_time_minutes.unwrap_or(0))
        .sum();
    let total_duration_minutes = route.duration_minutes
        + f64::from(total_charging_time_minutes)
        + f64::from(total_wait_time_minutes);

    tracing::info!(
        destination = %destination.name,
        distance_km = route.distance_km,
        stops = charging_stops.len(),
        ?status,
        "trip evaluated"
    );

    TripPlan {
        destination,
        total_distance_km: route.distance_km,
        total_duration_minutes,
        total_charging_time_minutes,
        total_wait_time_minutes,
        can_complete_without_charging: can_complete,
        charging_stops,
        route_coordinates: route.polyline,
        status,
    }
}

/// Evaluates trips against a route provider and a station set.
#[derive(Debug, Clone)]
pub struct TripPlanner<'s, R, W = NoWaitData> {
    routes: R,
    stations: &'s [Station],
    wait_source: W,
    config: PlannerConfig,
}

impl<'s, R: RouteProvider> TripPlanner<'s, R, NoWaitData> {
    pub fn new(routes: R, stations: &'s [Station]) -> Self {
        Self {
            routes,
            stations,
            wait_source: NoWaitData,
            config: PlannerConfig::default(),
        }
    }
}

impl<'s, R: RouteProvider, W: WaitTimeSource> TripPlanner<'s, R, W> {
    pub fn with_wait_source<W2: WaitTimeSource>(self, wait_source: W2) -> TripPlanner<'s, R, W2> {
        TripPlanner {
            routes: self.routes,
            stations: self.stations,
            wait_source,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Fetches the route and plans the trip.
    ///
    /// A missing route is an error, never a zero-distance plan.
    pub fn evaluate_trip(
        &self,
        origin: Coordinate,
        destination: Destination,
        current_soc_percent: f64,
        vehicle: &VehicleProfile,
    ) -> Result<TripPlan, TripError> {
        let route = self
            .routes
            .route(origin, destination.coordinate)
            .inspect_err(|err| tracing::warn!(error = %err, "no route to destination"))?;

        Ok(plan_trip_on_route(
            route,
            destination,
            current_soc_percent,
            vehicle,
            self.stations,
            &self.config,
            &self.wait_source,
        ))
    }
}
