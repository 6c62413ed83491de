//! Run report for a distance computation.

use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::Serialize;

use crate::algorithms::fuzzy::Scorer;
use crate::config::PipelineConfig;
use crate::core::domain::DISTANCE_COLUMN;
use crate::error::Result;
use crate::preprocessing::pipeline::{DistanceOutput, DropSummary};

/// Summary statistics of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

/// Statistics of a numeric column, nulls skipped. Standard deviation is the
/// population one (`ddof = 0`); an empty column reports zeros.
pub fn column_stats(df: &DataFrame, column: &str) -> Result<DistributionStats> {
    let values = df.column(column)?.cast(&DataType::Float64)?;
    let values = values.f64()?;

    Ok(DistributionStats {
        count: values.len() - values.null_count(),
        mean: values.mean().unwrap_or(0.0),
        median: values.median().unwrap_or(0.0),
        std_dev: values.std(0).unwrap_or(0.0),
        min: values.min().unwrap_or(0.0),
        max: values.max().unwrap_or(0.0),
        sum: values.sum().unwrap_or(0.0),
    })
}

/// Settings a run was made with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSettings {
    pub confidence_threshold: u8,
    pub scorer: Scorer,
    pub parallel: bool,
    pub drop_singleton_names: bool,
}

impl From<&PipelineConfig> for RunSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            scorer: config.scorer,
            parallel: config.parallel,
            drop_singleton_names: config.drop_singleton_names,
        }
    }
}

/// Checksums of the files a run read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputChecksums {
    pub records: Option<String>,
    pub gazetteer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub inputs: InputChecksums,
    pub settings: RunSettings,
    pub distinct_names: usize,
    /// Distinct names with any gazetteer match
    pub matched_names: usize,
    /// Distinct names whose match passed the confidence threshold
    pub confident_names: usize,
    pub summary: DropSummary,
    /// Statistics of the distance column in kilometres, absent when the
    /// output whitelist does not carry it
    pub distance_km: Option<DistributionStats>,
}

impl RunReport {
    pub fn new(
        output: &DistanceOutput,
        config: &PipelineConfig,
        inputs: InputChecksums,
    ) -> Result<Self> {
        let matched_names = output.matches.iter().filter(|m| m.is_match()).count();
        let confident_names = output
            .matches
            .iter()
            .filter(|m| m.is_match() && m.score >= config.confidence_threshold)
            .count();

        let distance_km = match output.table.column(DISTANCE_COLUMN) {
            Ok(_) => Some(column_stats(&output.table, DISTANCE_COLUMN)?),
            Err(_) => None,
        };

        Ok(Self {
            generated_at: Utc::now(),
            inputs,
            settings: RunSettings::from(config),
            distinct_names: output.matches.len(),
            matched_names,
            confident_names,
            summary: output.summary.clone(),
            distance_km,
        })
    }
}
