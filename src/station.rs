//! Charging station reference data.

use std::collections::HashSet;
use std::fmt;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Connector class, which decides charging speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorClass {
    Ac,
    DcFast,
}

impl ConnectorClass {
    /// Classifies free-text connector metadata by keyword.
    ///
    /// Anything mentioning "dc", "ccs" or "chademo" (any case) is DC-fast.
    pub fn classify(connector_type: &str) -> Self {
        let lowered = connector_type.to_lowercase();
        if ["dc", "ccs", "chademo"]
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            ConnectorClass::DcFast
        } else {
            ConnectorClass::Ac
        }
    }
}

/// A public charging station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Free-text connector description, e.g. "DC Fast Charger" or "CCS2".
    #[serde(rename = "type")]
    pub connector_type: String,
}

impl Station {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn connector_class(&self) -> ConnectorClass {
        ConnectorClass::classify(&self.connector_type)
    }

    pub fn is_dc_fast(&self) -> bool {
        self.connector_class() == ConnectorClass::DcFast
    }
}

#[derive(Debug)]
pub enum StationLoadError {
    Io(io::Error),
    Json(serde_json::Error),
    DuplicateId(String),
}

impl fmt::Display for StationLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationLoadError::Io(e) => write!(f, "failed to read station file: {e}"),
            StationLoadError::Json(e) => write!(f, "invalid station data: {e}"),
            StationLoadError::DuplicateId(id) => write!(f, "duplicate station id: {id}"),
        }
    }
}

impl std::error::Error for StationLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StationLoadError::Io(e) => Some(e),
            StationLoadError::Json(e) => Some(e),
            StationLoadError::DuplicateId(_) => None,
        }
    }
}

impl From<io::Error> for StationLoadError {
    fn from(err: io::Error) -> Self {
        StationLoadError::Io(err)
    }
}

impl From<serde_json::Error> for StationLoadError {
    fn from(err: serde_json::Error) -> Self {
        StationLoadError::Json(err)
    }
}

/// Immutable station set, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: Vec<Station>,
}

impl StationDirectory {
    /// Builds a directory, rejecting duplicate ids.
    pub fn new(stations: Vec<Station>) -> Result<Self, StationLoadError> {
        let mut seen = HashSet::new();
        for station in &stations {
            if !seen.insert(station.id.as_str()) {
                return Err(StationLoadError::DuplicateId(station.id.clone()));
            }
        }
        Ok(Self { stations })
    }

    /// Reads a JSON array of stations.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StationLoadError> {
        let stations: Vec<Station> = serde_json::from_reader(reader)?;
        let directory = Self::new(stations)?;
        tracing::info!(count = directory.len(), "loaded station directory");
        Ok(directory)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StationLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn get(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.id == id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_dc_keywords() {
        assert_eq!(ConnectorClass::classify("DC Fast Charger"), ConnectorClass::DcFast);
        assert_eq!(ConnectorClass::classify("CCS2"), ConnectorClass::DcFast);
        assert_eq!(ConnectorClass::classify("CHAdeMO"), ConnectorClass::DcFast);
    }

    #[test]
    fn test_classify_ac_fallback() {
        assert_eq!(ConnectorClass::classify("AC Charger"), ConnectorClass::Ac);
        assert_eq!(ConnectorClass::classify("Type 2"), ConnectorClass::Ac);
        assert_eq!(ConnectorClass::classify(""), ConnectorClass::Ac);
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"[
            {"id": "1", "name": "Tata Power", "state": "Maharashtra", "city": "Mumbai",
             "address": "Andheri East", "latitude": 19.1136, "longitude": 72.8697,
             "type": "DC Fast Charger"},
            {"id": "2", "name": "Ather Grid", "latitude": 12.9352, "longitude": 77.6245,
             "type": "AC Charger"}
        ]"#;
        let directory = StationDirectory::from_reader(json.as_bytes()).unwrap();
        assert_eq!(directory.len(), 2);
        assert!(directory.get("1").unwrap().is_dc_fast());
        assert_eq!(directory.get("2").unwrap().connector_class(), ConnectorClass::Ac);
        assert!(directory.get("3").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": "1", "name": "A", "latitude": 0.0, "longitude": 0.0, "type": "AC"},
            {"id": "1", "name": "B", "latitude": 1.0, "longitude": 1.0, "type": "AC"}
        ]"#;
        let err = StationDirectory::from_reader(json.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "duplicate station id: 1");
    }

    #[test]
    fn test_malformed_json() {
        let err = StationDirectory::from_reader("not json".as_bytes()).unwrap_err();
        assert!(matches!(err, StationLoadError::Json(_)));
    }
}
