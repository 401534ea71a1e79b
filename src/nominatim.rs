//! Nominatim HTTP geocoder.

use serde::Deserialize;

use crate::geo::Coordinate;
use crate::traits::{GeocodeResult, Geocoder};

/// Queries shorter than this are not sent.
pub const MIN_QUERY_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Comma-separated ISO country codes restricting the search.
    pub country_codes: String,
    pub limit: usize,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            country_codes: "in".to_string(),
            limit: 5,
            user_agent: concat!("ev-trip-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    fn fetch(&self, query: &str) -> Result<Vec<NominatimPlace>, reqwest::Error> {
        let limit = self.config.limit.to_string();
        self.client
            .get(format!("{}/search", self.config.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("countrycodes", self.config.country_codes.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, query: &str) -> Vec<GeocodeResult> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        match self.fetch(query) {
            Ok(places) => places.into_iter().filter_map(NominatimPlace::into_result).collect(),
            Err(err) => {
                tracing::warn!(error = %err, "geocoding request failed");
                Vec::new()
            }
        }
    }
}

/// Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
    place_id: u64,
}

impl NominatimPlace {
    fn into_result(self) -> Option<GeocodeResult> {
        let latitude = self.lat.parse::<f64>().ok()?;
        let longitude = self.lon.parse::<f64>().ok()?;
        Some(GeocodeResult {
            display_name: self.display_name,
            coordinate: Coordinate::new(latitude, longitude),
            place_id: self.place_id,
        })
    }
}
