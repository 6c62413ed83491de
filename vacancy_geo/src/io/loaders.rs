use polars::prelude::*;
use std::fs;
use std::path::Path;

use crate::core::domain::Gazetteer;
use crate::error::{GeoError, Result};
use crate::io::checksum::calculate_checksum;
use crate::parsing::csv_parser::parse_records_csv;
use crate::parsing::gazetteer::{gazetteer_from_frame, GazetteerColumns};
use crate::parsing::json_parser::parse_records_json;

/// Format of a tabular input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Csv,
    Json,
}

impl SourceType {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| GeoError::UnsupportedFormat(format!("{} has no extension", path.display())))?;

        match extension.to_lowercase().as_str() {
            "csv" => Ok(SourceType::Csv),
            "json" => Ok(SourceType::Json),
            other => Err(GeoError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Result of loading the vacancy records
#[derive(Debug, Clone)]
pub struct RecordsLoadResult {
    pub records: DataFrame,
    pub source_type: SourceType,
    /// SHA-256 of the file content
    pub checksum: String,
}

/// Result of loading the gazetteer
#[derive(Debug, Clone)]
pub struct GazetteerLoadResult {
    pub gazetteer: Gazetteer,
    pub source_type: SourceType,
    pub checksum: String,
}

/// Load a vacancy frame from CSV or JSON, detected by extension.
pub fn load_records(path: &Path) -> Result<RecordsLoadResult> {
    let source_type = SourceType::from_path(path)?;
    let checksum = calculate_checksum(&fs::read(path)?);

    let records = parse_source(path, source_type)?;
    log::info!(
        "Loaded {} records from {} ({} columns)",
        records.height(),
        path.display(),
        records.width()
    );

    Ok(RecordsLoadResult {
        records,
        source_type,
        checksum,
    })
}

/// Load the reference city table from CSV or JSON.
pub fn load_gazetteer(path: &Path, columns: &GazetteerColumns) -> Result<GazetteerLoadResult> {
    let source_type = SourceType::from_path(path)?;
    let checksum = calculate_checksum(&fs::read(path)?);

    let table = parse_source(path, source_type)?;
    let gazetteer = gazetteer_from_frame(&table, columns)?;
    log::info!("Loaded {} gazetteer entries from {}", gazetteer.len(), path.display());

    Ok(GazetteerLoadResult {
        gazetteer,
        source_type,
        checksum,
    })
}

fn parse_source(path: &Path, source_type: SourceType) -> Result<DataFrame> {
    match source_type {
        SourceType::Csv => parse_records_csv(path),
        SourceType::Json => parse_records_json(path),
    }
}
