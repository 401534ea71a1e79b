//! OSRM HTTP adapter for driving routes.

use serde::Deserialize;

use crate::geo::Coordinate;
use crate::polyline::Polyline;
use crate::traits::{Route, RouteError, RouteProvider};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    /// Request timeout; a slow provider surfaces as `RouteError::Http`.
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson",
            self.config.base_url,
            self.config.profile,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude
        )
    }
}

impl RouteProvider for OsrmClient {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route, RouteError> {
        let url = self.route_url(origin, destination);

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())
            .map_err(|err| {
                tracing::warn!(error = %err, "OSRM route request failed");
                RouteError::from(err)
            })?;

        body.into_route().ok_or(RouteError::NoRoute)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: [longitude, latitude].
    coordinates: Vec<[f64; 2]>,
}

impl OsrmRouteResponse {
    fn into_route(self) -> Option<Route> {
        let route = self.routes.into_iter().next()?;
        let points = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinate::new(lat, lng))
            .collect();

        Some(Route {
            distance_km: route.distance / 1000.0,
            duration_minutes: route.duration / 60.0,
            polyline: Polyline::new(points),
        })
    }
}
