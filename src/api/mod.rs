pub mod distance_matrix;

pub use distance_matrix::{
    DISTANCE_MATRIX_URL, ElementStatus, GoogleDistanceMatrix, PairOutcome, RouteMatrix,
    TravelMode,
};
