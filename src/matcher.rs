//! Route-station matching.
//!
//! Finds the stations lying inside a corridor around a route polyline and
//! tags each one with how far along the route it sits.

use std::ops::Range;

use rayon::prelude::*;

use crate::geo::{distance_km, nearest_point_on_segment, Coordinate, SegmentProjection};
use crate::polyline::Polyline;
use crate::station::Station;

/// Default bound on vertices used by sampled matching.
pub const DEFAULT_MAX_SAMPLED_VERTICES: usize = 100;

/// Relative tolerance on a sampled window's path length when ruling it out.
const WINDOW_SLACK: f64 = 0.01;

/// How the nearest route position is found for each station.
///
/// Both strategies project onto the original segments, so a station lying on
/// the route is always matched with zero lateral distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Precise for short polylines, sampled once the vertex count exceeds
    /// `max_sampled_vertices`.
    Auto,
    /// Project onto every segment of the full polyline.
    Precise,
    /// Use a fixed-stride sample of the vertices to discard stretches of the
    /// route that cannot be inside the corridor, then project onto the
    /// segments of the stretches that remain.
    Sampled,
}

#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Maximum lateral distance from the route, in km.
    pub corridor_km: f64,
    pub mode: MatchMode,
    pub max_sampled_vertices: usize,
}

impl MatchOptions {
    pub fn new(corridor_km: f64) -> Self {
        Self {
            corridor_km,
            ..Self::default()
        }
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            corridor_km: 1.0,
            mode: MatchMode::Auto,
            max_sampled_vertices: DEFAULT_MAX_SAMPLED_VERTICES,
        }
    }
}

/// A station inside the route corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedStation<'a> {
    pub station: &'a Station,
    /// Shortest distance from the station to the route.
    pub lateral_distance_km: f64,
    /// Path distance from the origin to the station's nearest route position.
    pub along_route_distance_km: f64,
}

/// Matches stations against a route using the default options and the
/// given corridor width. Result is ordered by along-route distance.
pub fn match_stations<'a>(
    stations: &'a [Station],
    route: &Polyline,
    corridor_km: f64,
) -> Vec<MatchedStation<'a>> {
    match_stations_with(stations, route, &MatchOptions::new(corridor_km))
}

pub fn match_stations_with<'a>(
    stations: &'a [Station],
    route: &Polyline,
    options: &MatchOptions,
) -> Vec<MatchedStation<'a>> {
    let points = route.points();
    if points.is_empty() || stations.is_empty() {
        return Vec::new();
    }

    let cumulative = route.cumulative_km();
    let precise = match options.mode {
        MatchMode::Precise => true,
        MatchMode::Sampled => false,
        MatchMode::Auto => points.len() <= options.max_sampled_vertices,
    };
    let sampled = if precise {
        Vec::new()
    } else {
        route.sample_indices(options.max_sampled_vertices)
    };

    let mut matched: Vec<MatchedStation<'a>> = stations
        .par_iter()
        .filter_map(|station| {
            let position = station.coordinate();
            let (lateral, along) = if points.len() == 1 {
                (distance_km(position, points[0]), 0.0)
            } else {
                let hit = if precise {
                    nearest_in_segments(position, points, 0..points.len() - 1)?
                } else {
                    nearest_in_windows(position, points, &cumulative, &sampled, options.corridor_km)?
                };
                locate(position, points, &cumulative, hit)
            };

            (lateral <= options.corridor_km).then_some(MatchedStation {
                station,
                lateral_distance_km: lateral,
                along_route_distance_km: along,
            })
        })
        .collect();

    matched.sort_by(|a, b| a.along_route_distance_km.total_cmp(&b.along_route_distance_km));

    tracing::debug!(
        stations = stations.len(),
        matched = matched.len(),
        vertices = points.len(),
        precise,
        corridor_km = options.corridor_km,
        "matched stations along route"
    );

    matched
}

/// Closest segment found so far, ranked by planar distance.
#[derive(Debug, Clone, Copy)]
struct SegmentHit {
    index: usize,
    projection: SegmentProjection,
    planar_distance_sq: f64,
}

/// Nearest of the segments `points[i]..points[i + 1]` for `i` in `segments`.
fn nearest_in_segments(p: Coordinate, points: &[Coordinate], segments: Range<usize>) -> Option<SegmentHit> {
    segments
        .map(|index| {
            let projection = nearest_point_on_segment(p, points[index], points[index + 1]);
            SegmentHit {
                index,
                projection,
                planar_distance_sq: projection.planar_distance_sq(p),
            }
        })
        .reduce(|best, hit| {
            if hit.planar_distance_sq < best.planar_distance_sq {
                hit
            } else {
                best
            }
        })
}

/// Searches only the sampled windows that could hold a point within
/// `corridor_km` of `p`. `None` when every window is ruled out.
///
/// Any route point between samples `a` and `b` is at least
/// `(d(p, a) + d(p, b) - path(a, b)) / 2` from `p`.
fn nearest_in_windows(
    p: Coordinate,
    points: &[Coordinate],
    cumulative: &[f64],
    sampled: &[usize],
    corridor_km: f64,
) -> Option<SegmentHit> {
    let to_sample: Vec<f64> = sampled.iter().map(|&i| distance_km(p, points[i])).collect();

    sampled
        .windows(2)
        .zip(to_sample.windows(2))
        .filter(|(window, dist)| {
            let span = cumulative[window[1]] - cumulative[window[0]];
            // Degree-space projections can sit slightly off the great circle.
            (dist[0] + dist[1] - span) / 2.0 <= corridor_km + span * WINDOW_SLACK
        })
        .filter_map(|(window, _)| nearest_in_segments(p, points, window[0]..window[1]))
        .reduce(|best, hit| {
            if hit.planar_distance_sq < best.planar_distance_sq {
                hit
            } else {
                best
            }
        })
}

/// Geodesic (lateral km, along-route km) for a segment hit.
fn locate(p: Coordinate, points: &[Coordinate], cumulative: &[f64], hit: SegmentHit) -> (f64, f64) {
    let point = hit.projection.point;
    let lateral = distance_km(p, point);
    let along = cumulative[hit.index] + distance_km(points[hit.index], point);
    (lateral, along)
}
