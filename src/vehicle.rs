//! Vehicle range/battery profiles and user-input validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::planner;

/// An EV's range and battery capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub name: String,
    /// Range on a full charge, in km.
    pub max_range_km: f64,
    pub battery_capacity_kwh: f64,
}

/// A catalogue entry for a known model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvModel {
    pub name: &'static str,
    pub max_range_km: f64,
    pub battery_capacity_kwh: f64,
}

impl EvModel {
    const fn new(name: &'static str, max_range_km: f64, battery_capacity_kwh: f64) -> Self {
        Self {
            name,
            max_range_km,
            battery_capacity_kwh,
        }
    }

    pub fn profile(&self) -> VehicleProfile {
        VehicleProfile {
            name: self.name.to_string(),
            max_range_km: self.max_range_km,
            battery_capacity_kwh: self.battery_capacity_kwh,
        }
    }
}

pub const EV_MODELS: &[EvModel] = &[
    EvModel::new("Tata Nexon EV", 312.0, 30.2),
    EvModel::new("Tata Nexon EV Max", 437.0, 40.5),
    EvModel::new("Tata Tiago EV", 315.0, 24.0),
    EvModel::new("Tata Punch EV", 421.0, 35.0),
    EvModel::new("MG ZS EV", 461.0, 50.3),
    EvModel::new("MG Comet EV", 230.0, 17.3),
    EvModel::new("Mahindra XUV400", 456.0, 39.4),
    EvModel::new("Hyundai Ioniq 5", 631.0, 72.6),
    EvModel::new("Kia EV6", 708.0, 77.4),
    EvModel::new("BYD Atto 3", 521.0, 60.48),
    EvModel::new("BYD e6", 415.0, 71.7),
    EvModel::new("Mercedes EQS", 857.0, 107.8),
    EvModel::new("BMW iX", 630.0, 76.6),
    EvModel::new("Audi e-tron", 484.0, 71.0),
    EvModel::new("Volvo XC40 Recharge", 418.0, 69.0),
    EvModel::new("Custom / Other", 300.0, 40.0),
];

/// Looks up a catalogue model by exact name.
pub fn find_model(name: &str) -> Option<&'static EvModel> {
    EV_MODELS.iter().find(|model| model.name == name)
}

#[derive(Debug, Clone, PartialEq)]
pub enum VehicleError {
    /// Field could not be read as a number.
    NotNumeric { field: &'static str, value: String },
    /// Field was zero, negative or not finite.
    NotPositive { field: &'static str, value: f64 },
}

impl fmt::Display for VehicleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleError::NotNumeric { field, value } => {
                write!(f, "{field} must be a number, got {value:?}")
            }
            VehicleError::NotPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
        }
    }
}

impl std::error::Error for VehicleError {}

impl VehicleProfile {
    /// Builds a profile from numeric values, rejecting non-positive ones.
    pub fn new(
        name: impl Into<String>,
        max_range_km: f64,
        battery_capacity_kwh: f64,
    ) -> Result<Self, VehicleError> {
        Ok(Self {
            name: name.into(),
            max_range_km: positive("max range", max_range_km)?,
            battery_capacity_kwh: positive("battery capacity", battery_capacity_kwh)?,
        })
    }

    /// Builds a profile from user-entered text fields.
    pub fn parse(name: impl Into<String>, max_range: &str, battery_capacity: &str) -> Result<Self, VehicleError> {
        let max_range_km = parse_number("max range", max_range)?;
        let battery_capacity_kwh = parse_number("battery capacity", battery_capacity)?;
        Self::new(name, max_range_km, battery_capacity_kwh)
    }

    /// Remaining range at `soc_percent`, rounded to whole km.
    pub fn display_range_km(&self, soc_percent: f64) -> f64 {
        display_range_km(soc_percent, self.max_range_km)
    }

    /// Usable energy at `soc_percent`, rounded to 0.1 kWh.
    pub fn usable_energy_kwh(&self, soc_percent: f64) -> f64 {
        (self.battery_capacity_kwh * clamp_soc(soc_percent) / 100.0 * 10.0).round() / 10.0
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, VehicleError> {
    value.trim().parse::<f64>().map_err(|_| VehicleError::NotNumeric {
        field,
        value: value.to_string(),
    })
}

fn positive(field: &'static str, value: f64) -> Result<f64, VehicleError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(VehicleError::NotPositive { field, value })
    }
}

/// Clamps a SOC reading to 0..=100.
pub fn clamp_soc(soc_percent: f64) -> f64 {
    soc_percent.clamp(0.0, 100.0)
}

/// Remaining range for display, rounded to whole km.
pub fn display_range_km(soc_percent: f64, max_range_km: f64) -> f64 {
    planner::remaining_range_km(soc_percent, max_range_km).round()
}

/// Minutes to charge from `current_soc` to `target_soc` percent at the
/// planner's default rates.
pub fn estimate_charge_time(current_soc: f64, target_soc: f64, is_dc_fast: bool) -> u32 {
    let soc_to_charge = (target_soc - current_soc).max(0.0);
    let rate = if is_dc_fast {
        planner::DC_MINUTES_PER_PERCENT
    } else {
        planner::AC_MINUTES_PER_PERCENT
    };
    (soc_to_charge * rate).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let profile = VehicleProfile::parse("Nexon", " 312 ", "30.2").unwrap();
        assert_eq!(profile.max_range_km, 312.0);
        assert_eq!(profile.battery_capacity_kwh, 30.2);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = VehicleProfile::parse("x", "far", "30").unwrap_err();
        assert_eq!(
            err,
            VehicleError::NotNumeric {
                field: "max range",
                value: "far".into()
            }
        );
        assert!(VehicleProfile::parse("x", "300", "").is_err());
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert!(matches!(
            VehicleProfile::parse("x", "0", "30"),
            Err(VehicleError::NotPositive { field: "max range", .. })
        ));
        assert!(matches!(
            VehicleProfile::parse("x", "300", "-4"),
            Err(VehicleError::NotPositive { field: "battery capacity", .. })
        ));
        assert!(VehicleProfile::parse("x", "NaN", "30").is_err());
        assert!(VehicleProfile::parse("x", "inf", "30").is_err());
    }

    #[test]
    fn test_error_display() {
        let err = VehicleError::NotPositive {
            field: "max range",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "max range must be positive, got -1");
    }

    #[test]
    fn test_catalogue_lookup() {
        let model = find_model("Kia EV6").unwrap();
        assert_eq!(model.max_range_km, 708.0);
        assert_eq!(model.profile().battery_capacity_kwh, 77.4);
        assert!(find_model("Unknown").is_none());
        assert!(EV_MODELS.iter().all(|m| m.max_range_km > 0.0 && m.battery_capacity_kwh > 0.0));
    }

    #[test]
    fn test_display_range_rounds() {
        assert_eq!(display_range_km(33.0, 312.0), 103.0);
        assert_eq!(display_range_km(120.0, 300.0), 300.0);
        assert_eq!(find_model("Kia EV6").unwrap().profile().display_range_km(50.0), 354.0);
    }

    #[test]
    fn test_usable_energy() {
        let profile = find_model("Tata Nexon EV").unwrap().profile();
        assert_eq!(profile.usable_energy_kwh(50.0), 15.1);
    }

    #[test]
    fn test_estimate_charge_time() {
        assert_eq!(estimate_charge_time(50.0, 80.0, true), 30);
        assert_eq!(estimate_charge_time(50.0, 80.0, false), 120);
        assert_eq!(estimate_charge_time(90.0, 80.0, true), 0);
        assert_eq!(estimate_charge_time(20.5, 100.0, true), 80);
    }

    #[test]
    fn test_charge_time_matches_planner_rates() {
        use crate::station::ConnectorClass;

        let config = planner::PlannerConfig::default();
        let dc = (30.0 * config.minutes_per_percent(ConnectorClass::DcFast)).ceil() as u32;
        let ac = (30.0 * config.minutes_per_percent(ConnectorClass::Ac)).ceil() as u32;
        assert_eq!(estimate_charge_time(50.0, 80.0, true), dc);
        assert_eq!(estimate_charge_time(50.0, 80.0, false), ac);
    }
}
