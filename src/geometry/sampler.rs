use geo::Point;
use rand::Rng;
use rand::seq::SliceRandom;

use super::{GeometryError, Region};
use crate::domain::Pair;

/// Draw one point uniformly from the interior of `region`.
///
/// Rejection sampling over the bounding box. Gives up after
/// `max_attempts` misses so that a zero-area polygon fails instead of
/// spinning forever.
pub fn sample_point<R: Rng + ?Sized>(
    region: &Region,
    rng: &mut R,
    max_attempts: u32,
) -> Result<Point<f64>, GeometryError> {
    let bounds = region.bounds();
    let (min, max) = (bounds.min(), bounds.max());

    for _ in 0..max_attempts {
        let candidate = Point::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));
        if region.contains(&candidate) {
            return Ok(candidate);
        }
    }

    Err(GeometryError::DegeneratePolygon {
        attempts: max_attempts,
    })
}

/// Generate `count` origin/destination pairs inside `region`.
///
/// Draws `2 * count` points, shuffles them, then pairs neighbours, so
/// roles come from shuffle position rather than draw order.
pub fn generate_pairs<R: Rng + ?Sized>(
    region: &Region,
    count: usize,
    rng: &mut R,
    max_attempts: u32,
) -> Result<Vec<Pair>, GeometryError> {
    let mut points = (0..count * 2)
        .map(|_| sample_point(region, rng, max_attempts))
        .collect::<Result<Vec<_>, _>>()?;

    points.shuffle(rng);

    Ok(points
        .chunks_exact(2)
        .map(|p| Pair::new(p[0], p[1]))
        .collect())
}
