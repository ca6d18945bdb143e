use anyhow::{Context, Result};
use rand::Rng;

use crate::api::RouteMatrix;
use crate::collect::collect_durations;
use crate::config::RunConfig;
use crate::domain::{Pair, ResultRow};
use crate::geometry::{Region, generate_pairs};
use crate::output::write_rows;

/// Sample the configured number of pairs inside the configured polygon
pub fn sample_pairs<R: Rng + ?Sized>(config: &RunConfig, rng: &mut R) -> Result<Vec<Pair>> {
    let region = Region::new(&config.corners).context("Invalid sampling polygon")?;
    generate_pairs(&region, config.pairs, rng, config.max_attempts)
        .context("Failed to sample points inside the polygon")
}

/// Resolve durations for `pairs` and write them to `config.output`.
///
/// The file is only written once every batch has been answered, so a
/// failing query leaves any previous output untouched. Returns the rows
/// that were written.
pub fn generate_dataset<M, F>(
    config: &RunConfig,
    pairs: &[Pair],
    matrix: &M,
    on_batch: F,
) -> Result<Vec<ResultRow>>
where
    M: RouteMatrix + ?Sized,
    F: FnMut(usize),
{
    let rows = collect_durations(pairs, config.batch_size, matrix, on_batch)?;

    tracing::info!(
        requested = pairs.len(),
        resolved = rows.len(),
        output = %config.output.display(),
        "writing results"
    );
    write_rows(&config.output, &rows)?;

    Ok(rows)
}
