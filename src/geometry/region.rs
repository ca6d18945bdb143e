use geo::{BoundingRect, Contains, LineString, Point, Polygon, Rect};

use super::GeometryError;

/// The sampling area: a simple polygon plus its cached bounding box.
///
/// Corners are given as (lat, lon) and stored in `geo` order (x = lon,
/// y = lat). The ring is closed automatically. Self-intersection is not
/// checked.
#[derive(Debug, Clone)]
pub struct Region {
    polygon: Polygon<f64>,
    bounds: Rect<f64>,
}

impl Region {
    pub fn new(corners: &[(f64, f64)]) -> Result<Self, GeometryError> {
        if corners.len() < 3 {
            return Err(GeometryError::TooFewCorners(corners.len()));
        }

        for (index, &(lat, lon)) in corners.iter().enumerate() {
            if !lat.is_finite() || !lon.is_finite() {
                return Err(GeometryError::NonFiniteCorner { index, lat, lon });
            }
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(GeometryError::CornerOutOfRange { index, lat, lon });
            }
        }

        let ring: LineString<f64> = corners.iter().map(|&(lat, lon)| (lon, lat)).collect();
        let polygon = Polygon::new(ring, vec![]);

        // A polygon with at least one finite vertex always has a bounding box
        let bounds = polygon
            .bounding_rect()
            .ok_or(GeometryError::TooFewCorners(0))?;

        Ok(Self { polygon, bounds })
    }

    /// Strict interior test: points exactly on an edge or vertex are outside.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.polygon.contains(point)
    }

    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }
}
