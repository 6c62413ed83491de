//! Domain models for gazetteer cities and match results.
//!
//! The vacancy table itself is a polars `DataFrame` so that arbitrary
//! passthrough columns of the raw export survive the pipeline untouched.
//! Everything the pipeline derives itself is strongly typed (`GeoPoint`,
//! `MatchResult`) and only written back into the frame as columns.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GeoError, Result};

/// Free-text city of the employing organization.
pub const ORGANIZATION_LOCATION_COLUMN: &str = "organization_location_name";
/// Job location encoded as `"<lat>,<lon>"`.
pub const LOCATION_COORDINATES_COLUMN: &str = "location_coordinates";

pub const FUZZY_RATING_COLUMN: &str = "Fuzzy_Rating";
pub const ORGANIZATION_LATITUDE_COLUMN: &str = "Latitudal_coordinates_organization";
pub const ORGANIZATION_LONGITUDE_COLUMN: &str = "Longitudinal_coordinates_organization";
pub const JOB_LATITUDE_COLUMN: &str = "latitudinal_coordinates_job";
pub const JOB_LONGITUDE_COLUMN: &str = "longitudinal_coordinates_job";
pub const DISTANCE_COLUMN: &str = "distance_between_job_and_organization";

/// Columns written by the distance pipeline (never expected in the input).
pub const DERIVED_COLUMNS: [&str; 6] = [
    FUZZY_RATING_COLUMN,
    ORGANIZATION_LATITUDE_COLUMN,
    ORGANIZATION_LONGITUDE_COLUMN,
    JOB_LATITUDE_COLUMN,
    JOB_LONGITUDE_COLUMN,
    DISTANCE_COLUMN,
];

/// Cells of `column` as owned text, top to bottom.
///
/// Non-string columns are cast first, so numeric and boolean cells come back
/// in their display form. Nulls stay `None`.
pub fn column_text(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let values = df.column(column)?.cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Names of the frame's columns in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// A position on the Earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Reject out-of-range coordinates instead of clamping them.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// One reference city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GazetteerEntry {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Reference table of cities, read-only during matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
}

impl Gazetteer {
    pub fn new(entries: Vec<GazetteerEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&GazetteerEntry> {
        self.entries.get(index)
    }

    /// Candidate names in gazetteer order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<GazetteerEntry> for Gazetteer {
    fn from_iter<I: IntoIterator<Item = GazetteerEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The gazetteer city a distinct name was matched to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerMatch {
    /// Position of the city in the gazetteer
    pub index: usize,
    pub name: String,
    pub point: GeoPoint,
}

/// Best gazetteer match for one distinct normalized location name.
///
/// `best_match` is `None` when no candidate scored above zero; the score is
/// then 0 and the confidence filter removes every record carrying this name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub name: String,
    pub best_match: Option<GazetteerMatch>,
    pub score: u8,
}

impl MatchResult {
    pub fn no_match(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            best_match: None,
            score: 0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.best_match.is_some()
    }

    pub fn point(&self) -> Option<GeoPoint> {
        self.best_match.as_ref().map(|m| m.point)
    }
}
