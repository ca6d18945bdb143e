use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 corners, got {0}")]
    TooFewCorners(usize),

    #[error("corner {index} has a non-finite coordinate ({lat}, {lon})")]
    NonFiniteCorner { index: usize, lat: f64, lon: f64 },

    #[error("corner {index} ({lat}, {lon}) is outside [-90, 90] x [-180, 180]")]
    CornerOutOfRange { index: usize, lat: f64, lon: f64 },

    /// Rejection sampling never hit the interior. Usually a zero-area
    /// polygon (collinear or repeated corners).
    #[error("no point inside the polygon after {attempts} attempts; is the polygon degenerate?")]
    DegeneratePolygon { attempts: u32 },
}
