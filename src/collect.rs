use anyhow::{Context, Result, ensure};
use std::num::NonZeroUsize;

use crate::api::RouteMatrix;
use crate::batch::partition;
use crate::domain::{Pair, ResultRow};

/// Query `matrix` batch by batch and keep one row per successful pair.
///
/// Pairs whose cell is not `OK` are dropped without error, so the result
/// may hold fewer rows than `pairs`. Any error from `matrix` aborts the
/// whole collection. `on_batch` is called after each batch with the
/// number of pairs it covered.
pub fn collect_durations<M, F>(
    pairs: &[Pair],
    batch_size: NonZeroUsize,
    matrix: &M,
    mut on_batch: F,
) -> Result<Vec<ResultRow>>
where
    M: RouteMatrix + ?Sized,
    F: FnMut(usize),
{
    let mut rows = Vec::with_capacity(pairs.len());

    for (index, batch) in partition(pairs, batch_size).enumerate() {
        let origins: Vec<_> = batch.iter().map(|p| p.origin).collect();
        let destinations: Vec<_> = batch.iter().map(|p| p.destination).collect();

        let outcomes = matrix
            .submit(&origins, &destinations)
            .with_context(|| format!("Routing query failed for batch {}", index + 1))?;
        ensure!(
            outcomes.len() == batch.len(),
            "Routing query for batch {} returned {} results for {} pairs",
            index + 1,
            outcomes.len(),
            batch.len()
        );

        let before = rows.len();
        rows.extend(
            batch
                .iter()
                .zip(&outcomes)
                .filter_map(|(pair, outcome)| {
                    outcome
                        .duration()
                        .map(|secs| ResultRow::from_pair(pair, secs))
                }),
        );

        tracing::debug!(
            batch = index + 1,
            size = batch.len(),
            kept = rows.len() - before,
            dropped = batch.len() - (rows.len() - before),
            "batch resolved"
        );
        on_batch(batch.len());
    }

    Ok(rows)
}
