//! Row filters over vacancy frames.
//!
//! Every filter consumes its input and reports how many rows it removed, so
//! the pipeline can log a per-stage drop summary.

use polars::prelude::*;

use crate::core::domain::{FUZZY_RATING_COLUMN, ORGANIZATION_LATITUDE_COLUMN};
use crate::error::Result;

/// Rows kept by a filter plus the number removed.
#[derive(Debug, Clone)]
pub struct Filtered {
    pub kept: DataFrame,
    pub dropped: usize,
}

impl Filtered {
    fn from_heights(before: usize, kept: DataFrame) -> Self {
        let dropped = before - kept.height();
        Self { kept, dropped }
    }

    /// Keep the rows where `mask` is true, preserving their order.
    pub fn by_mask(df: DataFrame, mask: &BooleanChunked) -> Result<Self> {
        let kept = df.filter(mask)?;
        Ok(Self::from_heights(df.height(), kept))
    }

    /// Keep the rows where `predicate` evaluates to true.
    pub fn by_expr(df: DataFrame, predicate: Expr) -> Result<Self> {
        let before = df.height();
        let kept = df.lazy().filter(predicate).collect()?;
        Ok(Self::from_heights(before, kept))
    }
}

/// Mask built from the text form of each cell in `column`.
fn text_mask<F>(df: &DataFrame, column: &str, keep: F) -> Result<BooleanChunked>
where
    F: FnMut(Option<&str>) -> bool,
{
    let values = df.column(column)?.cast(&DataType::String)?;
    Ok(values.str()?.into_iter().map(keep).collect())
}

/// Drop rows whose `column` is null.
pub fn drop_missing(df: DataFrame, column: &str) -> Result<Filtered> {
    let mask = df.column(column)?.is_not_null();
    Filtered::by_mask(df, &mask)
}

/// Drop rows whose `column` is null or blank text.
pub fn drop_blank(df: DataFrame, column: &str) -> Result<Filtered> {
    let mask = text_mask(&df, column, |value| {
        value.is_some_and(|s| !s.trim().is_empty())
    })?;
    Filtered::by_mask(df, &mask)
}

/// Drop rows whose value in `column` occurs fewer than twice in the frame.
///
/// Rows with a null value are dropped as well: a null is never counted as an
/// occurrence.
pub fn drop_singleton_values(df: DataFrame, column: &str) -> Result<Filtered> {
    Filtered::by_expr(df, col(column).count().over([col(column)]).gt(lit(1)))
}

/// Keep rows whose text in `column` is one of `accepted`.
pub fn filter_by_column<S: AsRef<str>>(
    df: DataFrame,
    column: &str,
    accepted: &[S],
) -> Result<Filtered> {
    let mask = text_mask(&df, column, |value| {
        value.is_some_and(|v| accepted.iter().any(|a| a.as_ref() == v))
    })?;
    Filtered::by_mask(df, &mask)
}

/// Drop rows whose text in `column` is one of `excluded`. Nulls are kept.
pub fn exclude_by_column<S: AsRef<str>>(
    df: DataFrame,
    column: &str,
    excluded: &[S],
) -> Result<Filtered> {
    let mask = text_mask(&df, column, |value| {
        !value.is_some_and(|v| excluded.iter().any(|e| e.as_ref() == v))
    })?;
    Filtered::by_mask(df, &mask)
}

/// Keep resolved rows whose `Fuzzy_Rating` is at least `threshold`.
///
/// Rows without a resolved organization position are always dropped,
/// whatever the threshold.
pub fn filter_by_confidence(df: DataFrame, threshold: u8) -> Result<Filtered> {
    Filtered::by_expr(
        df,
        col(ORGANIZATION_LATITUDE_COLUMN)
            .is_not_null()
            .and(col(FUZZY_RATING_COLUMN).gt_eq(lit(u32::from(threshold)))),
    )
}
