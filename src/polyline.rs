//! Route polylines as decoded coordinate sequences.
//!
//! Index 0 is the trip origin. Providers hand these over already decoded;
//! nothing here knows about wire encodings.

use serde::{Deserialize, Serialize};

use crate::geo::{distance_km, Coordinate};

/// A directional route geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Cumulative path distance (km) from the origin to every vertex.
    ///
    /// Same length as the polyline; the first entry is always 0.
    pub fn cumulative_km(&self) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(self.points.len());
        let mut total = 0.0;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                total += distance_km(self.points[i - 1], *point);
            }
            cumulative.push(total);
        }
        cumulative
    }

    /// Total path length in kilometers.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| distance_km(pair[0], pair[1]))
            .sum()
    }

    /// Vertex indices kept by fixed-stride sampling down to at most
    /// `max_vertices` entries. The final vertex is always retained.
    pub fn sample_indices(&self, max_vertices: usize) -> Vec<usize> {
        let n = self.points.len();
        if n == 0 {
            return Vec::new();
        }
        let max_vertices = max_vertices.max(2);
        if n <= max_vertices {
            return (0..n).collect();
        }

        // Leave room for the final vertex.
        let stride = (n - 1).div_ceil(max_vertices - 1);
        let mut indices: Vec<usize> = (0..n).step_by(stride).collect();
        if indices.last() != Some(&(n - 1)) {
            indices.push(n - 1);
        }
        indices
    }
}

impl From<Vec<Coordinate>> for Polyline {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}
