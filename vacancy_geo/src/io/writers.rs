//! Writers for the pipeline outputs.

use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::core::domain::{MatchResult, ORGANIZATION_LOCATION_COLUMN};
use crate::error::Result;

/// Text written in place of a gazetteer name when nothing matched.
pub const NO_MATCH_LABEL: &str = "none found";

pub const AUDIT_COLUMNS: [&str; 5] = [
    ORGANIZATION_LOCATION_COLUMN,
    "best_match_name",
    "fuzzy_rating",
    "latitude",
    "longitude",
];

/// Write a frame as CSV with a header row. Null cells are written empty.
pub fn write_frame_csv<W: Write>(writer: W, df: &mut DataFrame) -> Result<()> {
    CsvWriter::new(writer).include_header(true).finish(df)?;
    Ok(())
}

/// The per-name match table as a frame, one row per distinct name.
///
/// Names without a match get [`NO_MATCH_LABEL`] and null coordinates.
pub fn match_audit_frame(matches: &[MatchResult]) -> Result<DataFrame> {
    let names: Vec<&str> = matches.iter().map(|m| m.name.as_str()).collect();
    let best: Vec<&str> = matches
        .iter()
        .map(|m| m.best_match.as_ref().map_or(NO_MATCH_LABEL, |b| b.name.as_str()))
        .collect();
    let scores: Vec<u32> = matches.iter().map(|m| u32::from(m.score)).collect();
    let latitudes: Vec<Option<f64>> = matches.iter().map(|m| m.point().map(|p| p.latitude)).collect();
    let longitudes: Vec<Option<f64>> = matches.iter().map(|m| m.point().map(|p| p.longitude)).collect();

    Ok(df!(
        AUDIT_COLUMNS[0] => names,
        AUDIT_COLUMNS[1] => best,
        AUDIT_COLUMNS[2] => scores,
        AUDIT_COLUMNS[3] => latitudes,
        AUDIT_COLUMNS[4] => longitudes
    )?)
}

/// Write the per-name match table as CSV.
pub fn write_match_audit_csv<W: Write>(writer: W, matches: &[MatchResult]) -> Result<()> {
    let mut audit = match_audit_frame(matches)?;
    write_frame_csv(writer, &mut audit)
}

/// Serialize `value` as pretty JSON.
pub fn write_json<W: Write, T: Serialize>(writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Create `path` (and its parent directories) for writing.
pub fn create_output(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
