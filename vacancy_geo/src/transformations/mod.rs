//! Row filters, cleaning rules and output projection.
//!
//! # Modules
//!
//! - [`filtering`]: drop rows by missing values, accepted values or match confidence
//! - [`cleaning`]: recode and filter the raw vacancy export
//! - [`projection`]: validate schemas and project onto the output whitelist
//!
//! # Example
//!
//! ```
//! use polars::prelude::*;
//! use vacancy_geo::transformations::{drop_singleton_values, project_columns};
//!
//! let df = df!(
//!     "organization_location_name" => ["bonn", "bonn", "kiel"],
//!     "job_id" => ["1", "2", "3"]
//! )
//! .unwrap();
//! let filtered = drop_singleton_values(df, "organization_location_name").unwrap();
//! assert_eq!(filtered.dropped, 1);
//!
//! let table = project_columns(&filtered.kept, &["job_id"]).unwrap();
//! assert_eq!(table.shape(), (2, 1));
//! ```

pub mod cleaning;
pub mod filtering;
pub mod projection;

pub use cleaning::{clean_vacancies, CleaningRules, CleaningStep, CleaningSummary};
pub use filtering::{
    drop_blank, drop_missing, drop_singleton_values, exclude_by_column, filter_by_column,
    filter_by_confidence, Filtered,
};
pub use projection::{project_columns, require_columns, validate_schema};
