//! Broadcasting per-name match results back onto the full vacancy frame.
//!
//! Matching runs once per distinct normalized name; the resolver copies the
//! outcome onto every row carrying that name. The lookup is keyed solely by
//! the row's own normalized `organization_location_name`, so the result of
//! resolving a row does not depend on where it sits in the frame.

use polars::prelude::*;
use std::collections::HashMap;

use crate::core::domain::{
    column_text, GeoPoint, MatchResult, FUZZY_RATING_COLUMN, ORGANIZATION_LATITUDE_COLUMN,
    ORGANIZATION_LOCATION_COLUMN, ORGANIZATION_LONGITUDE_COLUMN,
};
use crate::error::Result;

/// Organization coordinates of the city a name was matched to.
///
/// `fuzzy_rating` is `None` when the name has no entry in the match table;
/// `organization` is `None` whenever no gazetteer city was matched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Resolution {
    pub fuzzy_rating: Option<u8>,
    pub organization: Option<GeoPoint>,
}

impl Resolution {
    /// Whether the row carries a match at or above `threshold`.
    pub fn meets_confidence(&self, threshold: u8) -> bool {
        self.organization.is_some() && self.fuzzy_rating.is_some_and(|score| score >= threshold)
    }
}

/// Resolve a single normalized name against the match table.
pub fn resolve_name(name: Option<&str>, matches: &HashMap<String, MatchResult>) -> Resolution {
    match name.and_then(|name| matches.get(name)) {
        Some(result) => Resolution {
            fuzzy_rating: Some(result.score),
            organization: result.point(),
        },
        None => Resolution::default(),
    }
}

/// Attach `Fuzzy_Rating` and the organization coordinate columns.
///
/// Total: the output has exactly one row per input row, in the same order.
/// Unresolved rows carry nulls in all three columns.
pub fn resolve(mut df: DataFrame, matches: &HashMap<String, MatchResult>) -> Result<DataFrame> {
    let names = column_text(&df, ORGANIZATION_LOCATION_COLUMN)?;

    let mut ratings: Vec<Option<u32>> = Vec::with_capacity(names.len());
    let mut latitudes: Vec<Option<f64>> = Vec::with_capacity(names.len());
    let mut longitudes: Vec<Option<f64>> = Vec::with_capacity(names.len());
    for name in &names {
        let resolution = resolve_name(name.as_deref(), matches);
        ratings.push(resolution.fuzzy_rating.map(u32::from));
        latitudes.push(resolution.organization.map(|p| p.latitude));
        longitudes.push(resolution.organization.map(|p| p.longitude));
    }

    df.with_column(Series::new(FUZZY_RATING_COLUMN.into(), ratings))?;
    df.with_column(Series::new(ORGANIZATION_LATITUDE_COLUMN.into(), latitudes))?;
    df.with_column(Series::new(ORGANIZATION_LONGITUDE_COLUMN.into(), longitudes))?;
    Ok(df)
}
