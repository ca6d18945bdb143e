use serde::{Deserialize, Serialize};

use super::Pair;

/// One resolved pair as written to the output file.
///
/// Field order matches the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub dest_lat: f64,
    pub dest_lng: f64,
    pub duration_sec: u64,
}

impl ResultRow {
    pub fn from_pair(pair: &Pair, duration_sec: u64) -> Self {
        Self {
            origin_lat: pair.origin.y(),
            origin_lng: pair.origin.x(),
            dest_lat: pair.destination.y(),
            dest_lng: pair.destination.x(),
            duration_sec,
        }
    }
}
