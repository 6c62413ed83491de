//! File loading and writing.
//!
//! Loaders detect CSV or JSON from the extension, parse the content and
//! record a SHA-256 checksum of the bytes they read. Writers produce the
//! projected distance table, the cleaned vacancy frame, the match audit
//! table and JSON reports.
//!
//! # Example
//!
//! ```no_run
//! use vacancy_geo::io::loaders::load_records;
//! use std::path::Path;
//!
//! let loaded = load_records(Path::new("vacancies_cleaned.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} records ({})", loaded.records.height(), loaded.checksum);
//! ```

pub mod checksum;
pub mod loaders;
pub mod writers;

#[cfg(test)]
mod loaders_tests;

pub use checksum::calculate_checksum;
pub use loaders::{load_gazetteer, load_records, GazetteerLoadResult, RecordsLoadResult, SourceType};
