//! Coordinate type and great-circle helpers.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Haversine distance between two points in kilometers.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Result of projecting a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Closest point on the segment.
    pub point: Coordinate,
    /// Position along the segment, 0 at `v` and 1 at `w`.
    pub t: f64,
}

impl SegmentProjection {
    /// Squared planar distance (degrees²) from `p` to the projected point.
    ///
    /// Only meaningful for ranking segments against each other.
    pub fn planar_distance_sq(&self, p: Coordinate) -> f64 {
        (p.latitude - self.point.latitude).powi(2) + (p.longitude - self.point.longitude).powi(2)
    }
}

/// Projects `p` onto the segment `v`–`w` in degree space, clamped to the segment.
///
/// A degenerate segment (`v == w`) projects to `v`.
pub fn nearest_point_on_segment(p: Coordinate, v: Coordinate, w: Coordinate) -> SegmentProjection {
    let d_lat = w.latitude - v.latitude;
    let d_lng = w.longitude - v.longitude;
    let l2 = d_lat * d_lat + d_lng * d_lng;
    if l2 == 0.0 {
        return SegmentProjection { point: v, t: 0.0 };
    }

    let t = ((p.latitude - v.latitude) * d_lat + (p.longitude - v.longitude) * d_lng) / l2;
    let t = t.clamp(0.0, 1.0);

    SegmentProjection {
        point: Coordinate::new(v.latitude + t * d_lat, v.longitude + t * d_lng),
        t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BENGALURU: Coordinate = Coordinate::new(12.9716, 77.5946);
    const CHENNAI: Coordinate = Coordinate::new(13.0827, 80.2707);

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(BENGALURU, BENGALURU), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // Bengaluru to Chennai is ~290 km as the crow flies
        let dist = distance_km(BENGALURU, CHENNAI);
        assert!(dist > 280.0 && dist < 300.0, "got {}", dist);
    }

    #[test]
    fn test_projection_clamps_before_segment() {
        let v = Coordinate::new(0.0, 0.0);
        let w = Coordinate::new(0.0, 1.0);
        let proj = nearest_point_on_segment(Coordinate::new(0.5, -1.0), v, w);
        assert_eq!(proj.t, 0.0);
        assert_eq!(proj.point, v);
    }

    #[test]
    fn test_projection_clamps_after_segment() {
        let v = Coordinate::new(0.0, 0.0);
        let w = Coordinate::new(0.0, 1.0);
        let proj = nearest_point_on_segment(Coordinate::new(0.5, 3.0), v, w);
        assert_eq!(proj.t, 1.0);
        assert_eq!(proj.point, w);
    }

    #[test]
    fn test_projection_midpoint() {
        let v = Coordinate::new(0.0, 0.0);
        let w = Coordinate::new(0.0, 2.0);
        let proj = nearest_point_on_segment(Coordinate::new(1.0, 1.0), v, w);
        assert!((proj.t - 0.5).abs() < 1e-12);
        assert!((proj.point.longitude - 1.0).abs() < 1e-12);
        assert!((proj.planar_distance_sq(Coordinate::new(1.0, 1.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_segment() {
        let v = Coordinate::new(12.0, 77.0);
        let proj = nearest_point_on_segment(Coordinate::new(13.0, 78.0), v, v);
        assert_eq!(proj.point, v);
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            lat1 in -89.0f64..89.0, lng1 in -179.0f64..179.0,
            lat2 in -89.0f64..89.0, lng2 in -179.0f64..179.0,
        ) {
            let a = Coordinate::new(lat1, lng1);
            let b = Coordinate::new(lat2, lng2);
            prop_assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
            prop_assert_eq!(distance_km(a, a), 0.0);
        }

        #[test]
        fn projection_stays_on_segment(
            px in -10.0f64..10.0, py in -10.0f64..10.0,
            vx in -10.0f64..10.0, vy in -10.0f64..10.0,
            wx in -10.0f64..10.0, wy in -10.0f64..10.0,
        ) {
            let proj = nearest_point_on_segment(
                Coordinate::new(px, py),
                Coordinate::new(vx, vy),
                Coordinate::new(wx, wy),
            );
            prop_assert!((0.0..=1.0).contains(&proj.t));
        }
    }
}
