//! Distance pipeline orchestration.
//!
//! Stages, in order:
//! 1. schema check against the output whitelist
//! 2. name normalization (records and gazetteer), blank names dropped
//! 3. optional singleton-name drop
//! 4. missing job coordinates dropped
//! 5. distinct-name matching against the gazetteer
//! 6. resolution and confidence filter
//! 7. job coordinate parsing and distance computation
//! 8. projection onto the output whitelist
//!
//! Each stage consumes the previous stage's frame. Per-row failures in stage 7
//! are logged and counted in the [`DropSummary`]; everything else that goes
//! wrong aborts the run.

use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

use crate::algorithms::geodesy::distance_km;
use crate::algorithms::matching::{index_matches, match_distinct_names};
use crate::config::PipelineConfig;
use crate::core::domain::{
    column_text, Gazetteer, GazetteerEntry, GeoPoint, MatchResult, DERIVED_COLUMNS,
    DISTANCE_COLUMN, JOB_LATITUDE_COLUMN, JOB_LONGITUDE_COLUMN, LOCATION_COORDINATES_COLUMN,
    ORGANIZATION_LATITUDE_COLUMN, ORGANIZATION_LOCATION_COLUMN, ORGANIZATION_LONGITUDE_COLUMN,
};
use crate::error::{GeoError, Result};
use crate::parsing::coordinates::parse_location_coordinates;
use crate::preprocessing::normalizer::Normalizer;
use crate::preprocessing::resolver::resolve;
use crate::transformations::filtering::{drop_blank, drop_singleton_values, filter_by_confidence};
use crate::transformations::projection::{project_columns, require_columns};

/// Number of records removed at each pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropSummary {
    pub input_records: usize,
    pub blank_names: usize,
    pub singleton_names: usize,
    pub missing_coordinates: usize,
    pub low_confidence: usize,
    pub malformed_coordinates: usize,
    pub invalid_coordinates: usize,
    pub output_records: usize,
    /// Gazetteer entries whose name normalized to nothing
    pub skipped_gazetteer_entries: usize,
}

impl DropSummary {
    pub fn total_dropped(&self) -> usize {
        self.blank_names
            + self.singleton_names
            + self.missing_coordinates
            + self.low_confidence
            + self.malformed_coordinates
            + self.invalid_coordinates
    }

    fn log(&self) {
        log::info!(
            "Distance pipeline: {} -> {} records (blank names: {}, singleton names: {}, \
             missing coordinates: {}, low confidence: {}, malformed coordinates: {}, \
             invalid coordinates: {})",
            self.input_records,
            self.output_records,
            self.blank_names,
            self.singleton_names,
            self.missing_coordinates,
            self.low_confidence,
            self.malformed_coordinates,
            self.invalid_coordinates,
        );
        if self.skipped_gazetteer_entries > 0 {
            log::info!(
                "Skipped {} gazetteer entries with empty names",
                self.skipped_gazetteer_entries
            );
        }
    }
}

/// Result of a distance run.
#[derive(Debug, Clone)]
pub struct DistanceOutput {
    /// Rows with distances, projected onto the output whitelist
    pub table: DataFrame,
    /// One match per distinct normalized name, in order of first appearance
    pub matches: Vec<MatchResult>,
    pub summary: DropSummary,
}

/// Geocodes organization locations and measures job-to-organization distances.
#[derive(Debug, Clone, Default)]
pub struct DistancePipeline {
    config: PipelineConfig,
}

impl DistancePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Columns the input must carry: the two location columns plus every
    /// whitelisted column the pipeline does not derive itself.
    pub fn required_columns(&self) -> Vec<String> {
        let mut required = vec![
            ORGANIZATION_LOCATION_COLUMN.to_string(),
            LOCATION_COORDINATES_COLUMN.to_string(),
        ];
        for column in &self.config.output_columns {
            if !DERIVED_COLUMNS.contains(&column.as_str()) && !required.contains(column) {
                required.push(column.clone());
            }
        }
        required
    }

    /// Run the pipeline over `records` against `gazetteer`.
    pub fn compute_distances(
        &self,
        records: DataFrame,
        gazetteer: &Gazetteer,
    ) -> Result<DistanceOutput> {
        require_columns(&records, &self.required_columns())?;

        let mut summary = DropSummary {
            input_records: records.height(),
            ..DropSummary::default()
        };

        let (gazetteer, skipped) = normalize_gazetteer(gazetteer, &self.config.normalizer);
        summary.skipped_gazetteer_entries = skipped;

        let normalized = normalize_location_names(records, &self.config.normalizer)?;

        let named = drop_blank(normalized, ORGANIZATION_LOCATION_COLUMN)?;
        summary.blank_names = named.dropped;
        let mut remaining = named.kept;

        if self.config.drop_singleton_names {
            let repeated = drop_singleton_values(remaining, ORGANIZATION_LOCATION_COLUMN)?;
            summary.singleton_names = repeated.dropped;
            remaining = repeated.kept;
        }

        let located = drop_blank(remaining, LOCATION_COORDINATES_COLUMN)?;
        summary.missing_coordinates = located.dropped;
        let remaining = located.kept;

        let names = distinct_names(&remaining)?;
        log::debug!(
            "Matching {} distinct names against {} gazetteer entries",
            names.len(),
            gazetteer.len()
        );
        let matches = match_distinct_names(&names, &gazetteer, self.config.scorer, self.config.parallel);
        let by_name = index_matches(&matches);

        let confident = filter_by_confidence(
            resolve(remaining, &by_name)?,
            self.config.confidence_threshold,
        )?;
        summary.low_confidence = confident.dropped;

        let measured = attach_distances(confident.kept, &mut summary)?;

        let table = project_columns(&measured, &self.config.output_columns)?;
        summary.output_records = table.height();
        summary.log();

        Ok(DistanceOutput {
            table,
            matches,
            summary,
        })
    }
}

/// Run the pipeline with default settings.
pub fn compute_distances(records: DataFrame, gazetteer: &Gazetteer) -> Result<DistanceOutput> {
    DistancePipeline::new().compute_distances(records, gazetteer)
}

fn normalize_location_names(mut df: DataFrame, normalizer: &Normalizer) -> Result<DataFrame> {
    let names: Vec<Option<String>> = column_text(&df, ORGANIZATION_LOCATION_COLUMN)?
        .into_iter()
        .map(|name| name.map(|name| normalizer.normalize(&name)))
        .collect();
    df.with_column(Series::new(ORGANIZATION_LOCATION_COLUMN.into(), names))?;
    Ok(df)
}

/// Entries whose name normalizes to nothing stay in place so match indices
/// keep pointing at the caller's rows; an empty name scores 0 and never wins.
fn normalize_gazetteer(gazetteer: &Gazetteer, normalizer: &Normalizer) -> (Gazetteer, usize) {
    let entries: Vec<GazetteerEntry> = gazetteer
        .entries()
        .iter()
        .map(|entry| {
            GazetteerEntry::new(normalizer.normalize(&entry.name), entry.latitude, entry.longitude)
        })
        .collect();
    let skipped = entries.iter().filter(|e| e.name.is_empty()).count();
    (Gazetteer::new(entries), skipped)
}

fn distinct_names(df: &DataFrame) -> Result<Vec<String>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();
    for name in column_text(df, ORGANIZATION_LOCATION_COLUMN)?.into_iter().flatten() {
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Parse each row's job coordinates and measure the distance to its
/// organization. Rows with malformed or out-of-range coordinates are dropped
/// and counted.
fn attach_distances(df: DataFrame, summary: &mut DropSummary) -> Result<DataFrame> {
    let coordinates = column_text(&df, LOCATION_COORDINATES_COLUMN)?;
    let organization_latitudes = df.column(ORGANIZATION_LATITUDE_COLUMN)?.f64()?;
    let organization_longitudes = df.column(ORGANIZATION_LONGITUDE_COLUMN)?.f64()?;

    let mut keep: Vec<bool> = Vec::with_capacity(coordinates.len());
    let mut job_latitudes: Vec<f64> = Vec::new();
    let mut job_longitudes: Vec<f64> = Vec::new();
    let mut distances: Vec<Option<f64>> = Vec::new();

    for (i, raw) in coordinates.iter().enumerate() {
        let organization = match (organization_latitudes.get(i), organization_longitudes.get(i)) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        };

        match measure(raw.as_deref().unwrap_or_default(), organization) {
            Ok((job, distance)) => {
                keep.push(true);
                job_latitudes.push(job.latitude);
                job_longitudes.push(job.longitude);
                distances.push(distance);
            }
            Err(e) if e.is_record_level() => {
                log::warn!("Dropping record: {}", e);
                match e {
                    GeoError::MalformedCoordinateString(_) => summary.malformed_coordinates += 1,
                    _ => summary.invalid_coordinates += 1,
                }
                keep.push(false);
            }
            Err(e) => return Err(e),
        }
    }

    let mask: BooleanChunked = keep.into_iter().collect();
    let mut measured = df.filter(&mask)?;
    measured.with_column(Series::new(JOB_LATITUDE_COLUMN.into(), job_latitudes))?;
    measured.with_column(Series::new(JOB_LONGITUDE_COLUMN.into(), job_longitudes))?;
    measured.with_column(Series::new(DISTANCE_COLUMN.into(), distances))?;
    Ok(measured)
}

fn measure(raw: &str, organization: Option<GeoPoint>) -> Result<(GeoPoint, Option<f64>)> {
    let job = parse_location_coordinates(raw)?;
    let distance = match organization {
        Some(organization) => Some(distance_km(job, organization)?),
        None => None,
    };
    Ok((job, distance))
}
