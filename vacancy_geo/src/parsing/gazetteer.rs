//! Building the reference city table from a loaded frame.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::domain::{column_text, Gazetteer, GazetteerEntry};
use crate::error::{GeoError, Result};
use crate::transformations::projection::require_columns;

/// Names of the gazetteer's name / latitude / longitude columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerColumns {
    #[serde(default = "default_name_column")]
    pub name_column: String,
    #[serde(default = "default_latitude_column")]
    pub latitude_column: String,
    #[serde(default = "default_longitude_column")]
    pub longitude_column: String,
}

fn default_name_column() -> String {
    "name".to_string()
}

fn default_latitude_column() -> String {
    "latitude".to_string()
}

fn default_longitude_column() -> String {
    "longitude".to_string()
}

impl Default for GazetteerColumns {
    fn default() -> Self {
        Self {
            name_column: default_name_column(),
            latitude_column: default_latitude_column(),
            longitude_column: default_longitude_column(),
        }
    }
}

impl GazetteerColumns {
    pub fn new(
        name_column: impl Into<String>,
        latitude_column: impl Into<String>,
        longitude_column: impl Into<String>,
    ) -> Self {
        Self {
            name_column: name_column.into(),
            latitude_column: latitude_column.into(),
            longitude_column: longitude_column.into(),
        }
    }
}

/// Turn a loaded table into a gazetteer.
///
/// Missing names load as empty strings (the pipeline ignores them), but every
/// row needs numeric coordinates: a gazetteer with an unreadable position is
/// rejected as a whole with `InvalidGazetteerEntry`. Rows are numbered from 1.
pub fn gazetteer_from_frame(df: &DataFrame, columns: &GazetteerColumns) -> Result<Gazetteer> {
    require_columns(
        df,
        &[
            columns.name_column.as_str(),
            columns.latitude_column.as_str(),
            columns.longitude_column.as_str(),
        ],
    )?;

    let names = column_text(df, &columns.name_column)?;
    let latitudes = column_text(df, &columns.latitude_column)?;
    let longitudes = column_text(df, &columns.longitude_column)?;

    names
        .into_iter()
        .zip(latitudes.iter().zip(longitudes.iter()))
        .enumerate()
        .map(|(i, (name, (latitude, longitude)))| {
            let row = i + 1;
            let latitude = coordinate(latitude.as_deref(), &columns.latitude_column, row)?;
            let longitude = coordinate(longitude.as_deref(), &columns.longitude_column, row)?;
            Ok(GazetteerEntry::new(name.unwrap_or_default(), latitude, longitude))
        })
        .collect()
}

fn coordinate(cell: Option<&str>, column: &str, row: usize) -> Result<f64> {
    cell.and_then(|text| text.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(|| GeoError::InvalidGazetteerEntry {
            row,
            reason: format!("{} '{}' is not numeric", column, cell.unwrap_or_default()),
        })
}
