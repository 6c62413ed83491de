//! Parsers for vacancy and gazetteer inputs.
//!
//! # Parsers
//!
//! - [`csv_parser`]: CSV tables with a header row
//! - [`json_parser`]: JSON arrays of flat objects
//! - [`gazetteer`]: reference city table from a loaded frame
//! - [`coordinates`]: `"<lat>,<lon>"` job coordinate strings
//! - [`dates`]: posting dates in the common export formats
//!
//! # Example
//!
//! ```no_run
//! use vacancy_geo::parsing::csv_parser::parse_records_csv;
//! use std::path::Path;
//!
//! let df = parse_records_csv(Path::new("vacancies_cleaned.csv"))
//!     .expect("Failed to parse vacancies");
//! println!("Loaded {} vacancies", df.height());
//! ```

pub mod coordinates;
pub mod csv_parser;
pub mod dates;
pub mod gazetteer;
pub mod json_parser;


pub use coordinates::parse_location_coordinates;
pub use gazetteer::{gazetteer_from_frame, GazetteerColumns};
