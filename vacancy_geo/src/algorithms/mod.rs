//! Matching and distance algorithms.
//!
//! # Components
//!
//! - [`fuzzy`]: 0-100 string similarity scores and best-candidate search
//! - [`matching`]: distinct-name matching against the gazetteer (optionally parallel)
//! - [`geodesy`]: WGS-84 geodesic distance between two coordinates
//!
//! # Example
//!
//! ```
//! use vacancy_geo::algorithms::{find_best_match, geodesic_distance_km};
//!
//! let best = find_best_match("muenchen", &["munchen", "muenster"]);
//! assert_eq!(best.candidate.map(|c| c.value), Some("munchen"));
//!
//! let km = geodesic_distance_km(48.137, 11.575, 48.137, 11.575).unwrap();
//! assert_eq!(km, 0.0);
//! ```

pub mod fuzzy;
pub mod geodesy;
pub mod matching;

pub use fuzzy::{find_best_match, find_best_match_with, ratio, BestMatch, Candidate, Scorer};
pub use geodesy::{distance_km, geodesic_distance_km, great_circle_km};
pub use matching::{index_matches, match_distinct_names, match_name};
