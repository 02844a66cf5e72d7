//! Prediction grid generation.
//!
//! The survey area is a square grid of cell-center coordinates laid out
//! around an anchor point. Generation is pure arithmetic: no I/O, no
//! failure modes, and the same spec always yields the same points.

use serde::{Deserialize, Serialize};

/// Anchor latitude of the default survey grid (Mozambique Channel).
pub const DEFAULT_CENTER_LAT: f64 = -13.00;
/// Anchor longitude of the default survey grid.
pub const DEFAULT_CENTER_LON: f64 = 46.23;
/// Default cell spacing in degrees.
pub const DEFAULT_SPACING_DEG: f64 = 0.02;
/// Default cells per grid side.
pub const DEFAULT_GRID_SIZE: u32 = 40;

/// A single point on the prediction grid, in EPSG:4326 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Geometry of a square prediction grid.
///
/// Cell centers are offset from the anchor so the grid is symmetric
/// around it: index `i` of `size` maps to
/// `center + (i - size/2 + 0.5) * spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Anchor latitude, degrees
    pub center_lat: f64,
    /// Anchor longitude, degrees
    pub center_lon: f64,
    /// Cell spacing, degrees
    pub spacing_deg: f64,
    /// Cells per side
    pub size: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER_LAT,
            center_lon: DEFAULT_CENTER_LON,
            spacing_deg: DEFAULT_SPACING_DEG,
            size: DEFAULT_GRID_SIZE,
        }
    }
}

impl GridSpec {
    /// Total number of points the grid produces.
    pub fn total_points(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    /// Iterate the grid points in row-major order.
    ///
    /// The latitude index is the outer loop, longitude the inner one, so
    /// points come out south-to-north within the generation order of the
    /// original survey definition. Callers that need a presentation order
    /// sort the scored records, not these points.
    pub fn points(&self) -> GridPointsIterator {
        GridPointsIterator {
            spec: *self,
            current: 0,
        }
    }

    fn point_at(&self, i: u32, j: u32) -> GridPoint {
        let half = f64::from(self.size) / 2.0;
        GridPoint {
            latitude: self.center_lat + (f64::from(i) - half + 0.5) * self.spacing_deg,
            longitude: self.center_lon + (f64::from(j) - half + 0.5) * self.spacing_deg,
        }
    }
}

/// Iterator over the points of a [`GridSpec`] in row-major order.
pub struct GridPointsIterator {
    spec: GridSpec,
    current: usize,
}

impl Iterator for GridPointsIterator {
    type Item = GridPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.spec.total_points() {
            return None;
        }

        let size = self.spec.size as usize;
        let i = (self.current / size) as u32;
        let j = (self.current % size) as u32;

        self.current += 1;

        Some(self.spec.point_at(i, j))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.spec.total_points() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridPointsIterator {
    fn len(&self) -> usize {
        self.spec.total_points() - self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_spec(size: u32) -> GridSpec {
        GridSpec {
            center_lat: 0.0,
            center_lon: 0.0,
            spacing_deg: 1.0,
            size,
        }
    }

    #[test]
    fn test_point_count_is_size_squared() {
        assert_eq!(unit_spec(2).points().count(), 4);
        assert_eq!(unit_spec(3).points().count(), 9);
        assert_eq!(GridSpec::default().points().count(), 1600);
    }

    #[test]
    fn test_two_by_two_unit_grid() {
        let points: Vec<GridPoint> = unit_spec(2).points().collect();

        // Row-major: latitude outer (south first), longitude inner
        assert_eq!(points.len(), 4);
        assert!((points[0].latitude - -0.5).abs() < 1e-12);
        assert!((points[0].longitude - -0.5).abs() < 1e-12);
        assert!((points[1].latitude - -0.5).abs() < 1e-12);
        assert!((points[1].longitude - 0.5).abs() < 1e-12);
        assert!((points[2].latitude - 0.5).abs() < 1e-12);
        assert!((points[2].longitude - -0.5).abs() < 1e-12);
        assert!((points[3].latitude - 0.5).abs() < 1e-12);
        assert!((points[3].longitude - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_grid_is_centered_on_anchor() {
        let spec = GridSpec {
            center_lat: -13.0,
            center_lon: 46.23,
            spacing_deg: 0.02,
            size: 40,
        };
        let points: Vec<GridPoint> = spec.points().collect();

        let mean_lat: f64 =
            points.iter().map(|p| p.latitude).sum::<f64>() / points.len() as f64;
        let mean_lon: f64 =
            points.iter().map(|p| p.longitude).sum::<f64>() / points.len() as f64;

        assert!((mean_lat - spec.center_lat).abs() < 1e-9);
        assert!((mean_lon - spec.center_lon).abs() < 1e-9);
    }

    #[test]
    fn test_odd_size_places_center_cell_on_anchor() {
        // Odd side: the middle cell's half-step offset cancels and it sits
        // exactly on the anchor
        let points: Vec<GridPoint> = unit_spec(3).points().collect();
        let center = points[4];
        assert!(center.latitude.abs() < 1e-12);
        assert!(center.longitude.abs() < 1e-12);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let spec = GridSpec::default();
        let first: Vec<GridPoint> = spec.points().collect();
        let second: Vec<GridPoint> = spec.points().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iterator_len_tracks_consumption() {
        let mut iter = unit_spec(4).points();
        assert_eq!(iter.len(), 16);
        assert_eq!(iter.size_hint(), (16, Some(16)));

        iter.next();
        assert_eq!(iter.len(), 15);

        let rest: Vec<GridPoint> = iter.collect();
        assert_eq!(rest.len(), 15);
    }

    #[test]
    fn test_default_spec_matches_survey_deployment() {
        let spec = GridSpec::default();
        assert!((spec.center_lat - -13.00).abs() < f64::EPSILON);
        assert!((spec.center_lon - 46.23).abs() < f64::EPSILON);
        assert!((spec.spacing_deg - 0.02).abs() < f64::EPSILON);
        assert_eq!(spec.size, 40);
    }

    #[test]
    fn test_spacing_separates_neighbours() {
        let spec = GridSpec {
            center_lat: 10.0,
            center_lon: 20.0,
            spacing_deg: 0.25,
            size: 4,
        };
        let points: Vec<GridPoint> = spec.points().collect();

        // Adjacent points in a row differ by exactly one spacing step
        for row in points.chunks(4) {
            for pair in row.windows(2) {
                assert!((pair[1].longitude - pair[0].longitude - 0.25).abs() < 1e-12);
                assert!((pair[1].latitude - pair[0].latitude).abs() < 1e-12);
            }
        }
    }
}
