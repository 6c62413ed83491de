//! Configuration file support.
//!
//! Settings are read from a TOML file whose sections all fall back to
//! defaults, so an empty file is a valid configuration:
//!
//! ```toml
//! [matching]
//! threshold = 85
//! scorer = "ratio"
//! parallel = true
//!
//! [filtering]
//! drop_singleton_names = true
//!
//! [gazetteer]
//! name_column = "Stadt"
//! latitude_column = "Breitengrad"
//! longitude_column = "Längengrad"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::algorithms::fuzzy::Scorer;
use crate::core::domain::{
    DISTANCE_COLUMN, FUZZY_RATING_COLUMN, JOB_LATITUDE_COLUMN, JOB_LONGITUDE_COLUMN,
    ORGANIZATION_LATITUDE_COLUMN, ORGANIZATION_LONGITUDE_COLUMN,
};
use crate::error::{GeoError, Result};
use crate::parsing::gazetteer::GazetteerColumns;
use crate::preprocessing::normalizer::{Normalizer, GERMAN_SUBSTITUTIONS};
use crate::transformations::cleaning::CleaningRules;

/// Minimum fuzzy score a match needs to be kept.
pub const DEFAULT_CONFIDENCE_THRESHOLD: u8 = 85;

/// Column whitelist of the final distance dataset, in output order.
pub const DEFAULT_OUTPUT_COLUMNS: [&str; 46] = [
    "organization_location_name",
    "advertiser_type_value",
    "advertiser_type_label",
    "posting_count",
    "date",
    "duration",
    "via_intermediary",
    "language",
    "job_title",
    "profession_value",
    "profession_isco_code_value",
    "profession_isco_code_label",
    "location",
    "location_name",
    "region_value",
    "region_label",
    "education_level_value",
    "education_level_label",
    "contract_type_value",
    "contract_type_label",
    "working_hours_type_value",
    "working_hours_type_label",
    "hours_per_week_from",
    "hours_per_week_to",
    "salary",
    "organization_industry_value",
    "organization_industry_label",
    "organization_size_value",
    "organization_size_label",
    "location_coordinates",
    "organization_ID",
    "contract_type_label_cluster",
    "salary_dummy",
    "Applicant_language_cluster",
    "education_level_cluster",
    "quarter_of_date",
    "month_of_date",
    "log_duration",
    ORGANIZATION_LATITUDE_COLUMN,
    ORGANIZATION_LONGITUDE_COLUMN,
    FUZZY_RATING_COLUMN,
    JOB_LATITUDE_COLUMN,
    JOB_LONGITUDE_COLUMN,
    DISTANCE_COLUMN,
    "profession_isco_code_value_agg_1",
    "profession_isco_code_value_agg_2",
];

/// Runtime settings of the distance pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub confidence_threshold: u8,
    pub drop_singleton_names: bool,
    pub output_columns: Vec<String>,
    pub scorer: Scorer,
    pub parallel: bool,
    pub normalizer: Normalizer,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            drop_singleton_names: true,
            output_columns: default_output_columns(),
            scorer: Scorer::default(),
            parallel: true,
            normalizer: Normalizer::default(),
        }
    }
}

/// Configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoConfig {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub filtering: FilteringSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub gazetteer: GazetteerColumns,
    #[serde(default)]
    pub normalization: NormalizationSettings,
    #[serde(default)]
    pub cleaning: CleaningRules,
}

/// Fuzzy matching settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub scorer: Scorer,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            scorer: Scorer::default(),
            parallel: true,
        }
    }
}

/// Record filtering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteringSettings {
    #[serde(default = "default_true")]
    pub drop_singleton_names: bool,
}

impl Default for FilteringSettings {
    fn default() -> Self {
        Self {
            drop_singleton_names: true,
        }
    }
}

/// Output projection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_columns")]
    pub columns: Vec<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            columns: default_output_columns(),
        }
    }
}

/// Name normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationSettings {
    /// `(pattern, replacement)` pairs applied in order
    #[serde(default = "default_substitutions")]
    pub substitutions: Vec<(String, String)>,
}

impl Default for NormalizationSettings {
    fn default() -> Self {
        Self {
            substitutions: default_substitutions(),
        }
    }
}

fn default_threshold() -> u8 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_true() -> bool {
    true
}

fn default_output_columns() -> Vec<String> {
    DEFAULT_OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn default_substitutions() -> Vec<(String, String)> {
    GERMAN_SUBSTITUTIONS
        .iter()
        .map(|(p, r)| (p.to_string(), r.to_string()))
        .collect()
}

impl GeoConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(GeoConfig)` if the file was read, parsed and validated
    /// * `Err(GeoError::Config)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| GeoError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GeoConfig = toml::from_str(content)
            .map_err(|e| GeoError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location, `None` when no file
    /// exists there.
    ///
    /// Searches for `vacancy_geo.toml` in:
    /// 1. Current directory
    /// 2. `vacancy_geo/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Option<Self>> {
        Self::from_default_location_in(Path::new("."))
    }

    /// Same search as [`GeoConfig::from_default_location`], relative to `base`.
    pub fn from_default_location_in(base: &Path) -> Result<Option<Self>> {
        match Self::find_default_location_in(base) {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    /// First existing file among the standard locations under `base`.
    pub fn find_default_location_in(base: &Path) -> Option<PathBuf> {
        ["vacancy_geo.toml", "vacancy_geo/vacancy_geo.toml", "../vacancy_geo.toml"]
            .iter()
            .map(|candidate| base.join(candidate))
            .find(|path| path.exists())
    }

    /// Reject values that parse but make no sense.
    pub fn validate(&self) -> Result<()> {
        if self.matching.threshold > 100 {
            return Err(GeoError::Config(format!(
                "matching.threshold must be within 0..=100, got {}",
                self.matching.threshold
            )));
        }
        if self.output.columns.is_empty() {
            return Err(GeoError::Config(
                "output.columns must name at least one column".to_string(),
            ));
        }
        if self.gazetteer.name_column.is_empty()
            || self.gazetteer.latitude_column.is_empty()
            || self.gazetteer.longitude_column.is_empty()
        {
            return Err(GeoError::Config(
                "gazetteer column names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings for the distance pipeline.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            confidence_threshold: self.matching.threshold,
            drop_singleton_names: self.filtering.drop_singleton_names,
            output_columns: self.output.columns.clone(),
            scorer: self.matching.scorer,
            parallel: self.matching.parallel,
            normalizer: Normalizer::new(self.normalization.substitutions.clone()),
        }
    }
}
