use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

use crate::domain::ResultRow;

pub const HEADER: [&str; 5] = [
    "origin_lat",
    "origin_lng",
    "dest_lat",
    "dest_lng",
    "duration_sec",
];

/// Write rows as CSV, replacing any existing file at `path`.
///
/// The header is always written, so an empty result still produces a
/// valid file with one line.
pub fn write_rows(path: &Path, rows: &[ResultRow]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(())
}

/// Read a file produced by `write_rows`
pub fn read_rows(path: &Path) -> Result<Vec<ResultRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader.headers()?.clone();
    anyhow::ensure!(
        headers.iter().eq(HEADER),
        "Unexpected CSV header in {}: {:?}",
        path.display(),
        headers
    );

    reader
        .deserialize()
        .collect::<Result<Vec<ResultRow>, _>>()
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}
