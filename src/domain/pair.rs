use geo::Point;

/// An origin/destination pair, both inside the sampling region.
///
/// Points follow the `geo` convention: `x` is longitude, `y` is latitude.
/// Nothing forces the two points to differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair {
    pub origin: Point<f64>,
    pub destination: Point<f64>,
}

impl Pair {
    pub fn new(origin: Point<f64>, destination: Point<f64>) -> Self {
        Self {
            origin,
            destination,
        }
    }
}
