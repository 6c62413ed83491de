//! Fuzzy geocoding of organization locations and job-to-organization
//! distances for job-vacancy datasets.
//!
//! Free-text organization city names are normalized, matched once per
//! distinct name against a reference gazetteer, and the matched city's
//! coordinates are broadcast back onto every row of a polars `DataFrame`.
//! The geodesic distance between the job location and the organization
//! location is then added as a column and the result projected onto a fixed
//! output schema.
//!
//! # Example
//!
//! ```
//! use polars::prelude::*;
//! use vacancy_geo::config::PipelineConfig;
//! use vacancy_geo::core::domain::{Gazetteer, GazetteerEntry};
//! use vacancy_geo::preprocessing::DistancePipeline;
//!
//! let records = df!(
//!     "organization_location_name" => ["Berlin ", "berlin"],
//!     "location_coordinates" => ["52.5,13.4", "52.4,13.3"]
//! )
//! .unwrap();
//! let gazetteer = Gazetteer::new(vec![GazetteerEntry::new("Berlin", 52.52, 13.40)]);
//!
//! let config = PipelineConfig {
//!     output_columns: vec![
//!         "organization_location_name".to_string(),
//!         "distance_between_job_and_organization".to_string(),
//!     ],
//!     ..PipelineConfig::default()
//! };
//! let output = DistancePipeline::with_config(config)
//!     .compute_distances(records, &gazetteer)
//!     .unwrap();
//! assert_eq!(output.table.height(), 2);
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod services;
pub mod transformations;

pub use config::{GeoConfig, PipelineConfig};
pub use error::{GeoError, Result};
