//! Charging-stop planner (greedy forward simulation).

use serde::Serialize;

use crate::matcher::{match_stations_with, MatchMode, MatchOptions, MatchedStation};
use crate::polyline::Polyline;
use crate::station::{ConnectorClass, Station};
use crate::traits::WaitTimeSource;

/// DC-fast charging rate, minutes per percent of SOC.
pub const DC_MINUTES_PER_PERCENT: f64 = 1.0;
/// AC charging rate, minutes per percent of SOC.
pub const AC_MINUTES_PER_PERCENT: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Corridor width used to pick candidate stations, in km.
    pub corridor_km: f64,
    /// Minimum forward progress between consecutive stops, in km.
    pub min_gap_km: f64,
    /// Minimum gap used when no stop fits inside the reserve-adjusted range.
    pub relaxed_min_gap_km: f64,
    /// A trip needs no charging when range >= distance * this factor.
    pub feasibility_margin: f64,
    /// Fraction of the current range treated as safely usable.
    pub reserve_factor: f64,
    /// Charge level every stop charges up to (clamped to 100).
    pub target_soc_percent: u8,
    /// Hard cap on planning iterations.
    pub max_iterations: usize,
    /// Share of the furthest reachable stations considered for a stop.
    pub candidate_fraction: f64,
    /// Lower bound on that candidate window.
    pub min_candidates: usize,
    pub dc_minutes_per_percent: f64,
    pub ac_minutes_per_percent: f64,
    pub match_mode: MatchMode,
    pub max_sampled_vertices: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            corridor_km: 1.0,
            min_gap_km: 5.0,
            relaxed_min_gap_km: 1.0,
            feasibility_margin: 1.1,
            reserve_factor: 0.85,
            target_soc_percent: 80,
            max_iterations: 20,
            candidate_fraction: 0.25,
            min_candidates: 3,
            dc_minutes_per_percent: DC_MINUTES_PER_PERCENT,
            ac_minutes_per_percent: AC_MINUTES_PER_PERCENT,
            match_mode: MatchMode::Auto,
            max_sampled_vertices: crate::matcher::DEFAULT_MAX_SAMPLED_VERTICES,
        }
    }
}

impl PlannerConfig {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            corridor_km: self.corridor_km,
            mode: self.match_mode,
            max_sampled_vertices: self.max_sampled_vertices,
        }
    }

    /// Charging rate in minutes per percent of SOC.
    pub fn minutes_per_percent(&self, class: ConnectorClass) -> f64 {
        match class {
            ConnectorClass::DcFast => self.dc_minutes_per_percent,
            ConnectorClass::Ac => self.ac_minutes_per_percent,
        }
    }

    fn target_soc(&self) -> u8 {
        self.target_soc_percent.min(100)
    }
}

/// One planned charging stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingStop {
    pub station: Station,
    pub connector_class: ConnectorClass,
    /// Along-route distance from the origin, rounded to 0.1 km.
    pub distance_from_start_km: f64,
    pub soc_on_arrival_percent: u8,
    pub charging_time_minutes: u32,
    pub soc_after_charging_percent: u8,
    pub wait_time_minutes: Option<u32>,
}

/// Outcome of a planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingPlan {
    pub stops: Vec<ChargingStop>,
    /// Whether the last stop (or the starting charge) covers the trip.
    pub reaches_destination: bool,
    pub iterations: usize,
}

/// Remaining range in km for a SOC percentage, SOC clamped to 0..=100.
pub fn remaining_range_km(soc_percent: f64, max_range_km: f64) -> f64 {
    (soc_percent.clamp(0.0, 100.0) / 100.0) * max_range_km
}

/// True when the starting charge covers the trip with the safety margin.
pub fn can_complete_without_charging(
    total_distance_km: f64,
    current_soc_percent: f64,
    vehicle_max_range_km: f64,
    config: &PlannerConfig,
) -> bool {
    remaining_range_km(current_soc_percent, vehicle_max_range_km)
        >= total_distance_km * config.feasibility_margin
}

/// Plans charging stops and returns them in route order.
///
/// The list may be empty (no charging needed, or no usable station) or
/// incomplete (search ran out of reachable stations). Use [`plan`] to learn
/// whether the stops actually reach the destination.
pub fn plan_charging_stops<W: WaitTimeSource + ?Sized>(
    total_distance_km: f64,
    current_soc_percent: f64,
    vehicle_max_range_km: f64,
    stations: &[Station],
    route: &Polyline,
    config: &PlannerConfig,
    wait_source: &W,
) -> Vec<ChargingStop> {
    plan(
        total_distance_km,
        current_soc_percent,
        vehicle_max_range_km,
        stations,
        route,
        config,
        wait_source,
    )
    .stops
}

/// Runs the greedy stop search.
///
/// `vehicle_max_range_km` must be positive; validation happens upstream.
pub fn plan<W: WaitTimeSource + ?Sized>(
    total_distance_km: f64,
    current_soc_percent: f64,
    vehicle_max_range_km: f64,
    stations: &[Station],
    route: &Polyline,
    config: &PlannerConfig,
    wait_source: &W,
) -> ChargingPlan {
    let remaining_range = remaining_range_km(current_soc_percent, vehicle_max_range_km);
    if can_complete_without_charging(
        total_distance_km,
        current_soc_percent,
        vehicle_max_range_km,
        config,
    ) {
        tracing::debug!(remaining_range, total_distance_km, "no charging needed");
        return ChargingPlan {
            stops: Vec::new(),
            reaches_destination: true,
            iterations: 0,
        };
    }

    let matched = match_stations_with(stations, route, &config.match_options());
    if matched.is_empty() {
        tracing::info!(corridor_km = config.corridor_km, "no stations along route");
        return ChargingPlan {
            stops: Vec::new(),
            reaches_destination: remaining_range >= total_distance_km,
            iterations: 0,
        };
    }

    let target_soc = config.target_soc();
    let mut stops = Vec::new();
    let mut distance_covered = 0.0;
    let mut current_range = remaining_range;
    let mut soc_calc = current_soc_percent.clamp(0.0, 100.0);
    let mut iterations = 0;

    while distance_covered + current_range < total_distance_km && iterations < config.max_iterations {
        iterations += 1;

        let safe_range = current_range * config.reserve_factor;
        let mut reachable =
            reachable_window(&matched, distance_covered, config.min_gap_km, safe_range);
        if reachable.is_empty() {
            reachable = reachable_window(
                &matched,
                distance_covered,
                config.relaxed_min_gap_km,
                current_range,
            );
        }
        let Some(best) = pick_candidate(reachable, config) else {
            tracing::warn!(
                distance_covered,
                current_range,
                stops = stops.len(),
                "no reachable charging station ahead"
            );
            break;
        };

        let distance_to_station = best.along_route_distance_km - distance_covered;
        let soc_used = (distance_to_station / vehicle_max_range_km) * 100.0;
        let soc_on_arrival = (soc_calc - soc_used).round().clamp(0.0, 100.0) as u8;
        let soc_to_charge = target_soc.saturating_sub(soc_on_arrival);
        let connector_class = best.station.connector_class();
        let charging_time =
            (f64::from(soc_to_charge) * config.minutes_per_percent(connector_class)).ceil() as u32;

        tracing::debug!(
            station = %best.station.id,
            along_km = best.along_route_distance_km,
            soc_on_arrival,
            charging_time,
            "selected charging stop"
        );

        stops.push(ChargingStop {
            station: best.station.clone(),
            connector_class,
            distance_from_start_km: (best.along_route_distance_km * 10.0).round() / 10.0,
            soc_on_arrival_percent: soc_on_arrival,
            charging_time_minutes: charging_time,
            soc_after_charging_percent: target_soc,
            wait_time_minutes: wait_source.wait_minutes(best.station),
        });

        distance_covered = best.along_route_distance_km;
        soc_calc = f64::from(target_soc);
        current_range = remaining_range_km(soc_calc, vehicle_max_range_km);
    }

    let reaches_destination = distance_covered + current_range >= total_distance_km;
    if !reaches_destination && iterations >= config.max_iterations {
        tracing::warn!(iterations, "iteration cap reached before destination was reachable");
    }

    ChargingPlan {
        stops,
        reaches_destination,
        iterations,
    }
}

/// Stations strictly beyond `from + gap` and no further than `from + range`.
fn reachable_window<'m, 'a>(
    matched: &'m [MatchedStation<'a>],
    from: f64,
    gap: f64,
    range: f64,
) -> &'m [MatchedStation<'a>] {
    // `matched` is sorted by along-route distance.
    let start = matched.partition_point(|m| m.along_route_distance_km <= from + gap);
    let end = matched.partition_point(|m| m.along_route_distance_km <= from + range);
    if start >= end {
        &[]
    } else {
        &matched[start..end]
    }
}

/// Among the furthest reachable stations, the one closest to the route.
///
/// Exact lateral ties go to the station further along.
fn pick_candidate<'m, 'a>(
    reachable: &'m [MatchedStation<'a>],
    config: &PlannerConfig,
) -> Option<&'m MatchedStation<'a>> {
    let fraction = ((reachable.len() as f64 * config.candidate_fraction).floor() as usize).max(1);
    let window = fraction.max(config.min_candidates).min(reachable.len());
    let candidates = &reachable[reachable.len() - window..];

    candidates.iter().fold(None, |best: Option<&MatchedStation<'a>>, candidate| match best {
        Some(current) if current.lateral_distance_km < candidate.lateral_distance_km => Some(current),
        _ => Some(candidate),
    })
}
