//! Schema checks and projection onto the output column whitelist.

use polars::prelude::*;

use crate::error::{GeoError, Result};

/// Check a frame's header against required columns.
///
/// Returns `(is_valid, issues)` where each issue names one missing column,
/// so callers can report every problem at once instead of the first.
pub fn validate_schema<S: AsRef<str>>(df: &DataFrame, required_columns: &[S]) -> (bool, Vec<String>) {
    let issues: Vec<String> = required_columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|column| df.column(column).is_err())
        .map(|column| format!("Missing required column: {}", column))
        .collect();

    (issues.is_empty(), issues)
}

/// Fail fast with `MissingRequiredColumn` for the first absent column.
pub fn require_columns<S: AsRef<str>>(df: &DataFrame, required_columns: &[S]) -> Result<()> {
    match required_columns
        .iter()
        .map(AsRef::as_ref)
        .find(|column| df.column(column).is_err())
    {
        Some(column) => Err(GeoError::MissingRequiredColumn(column.to_string())),
        None => Ok(()),
    }
}

/// Project a frame onto `columns`, in that order.
///
/// Columns not on the list are dropped. A listed column the frame does not
/// carry is `MissingRequiredColumn`; no partial table is returned.
pub fn project_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    require_columns(df, columns)?;
    Ok(df.select(columns.iter().map(AsRef::as_ref))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{column_names, column_text};

    fn frame() -> DataFrame {
        df!(
            "a" => ["1", "4"],
            "b" => ["2", "5"],
            "c" => ["3", "6"]
        )
        .unwrap()
    }

    #[test]
    fn test_projection_orders_and_drops_columns() {
        let table = project_columns(&frame(), &["c", "a"]).unwrap();
        assert_eq!(column_names(&table), vec!["c", "a"]);
        assert_eq!(
            column_text(&table, "c").unwrap(),
            vec![Some("3".to_string()), Some("6".to_string())]
        );
        assert_eq!(
            column_text(&table, "a").unwrap(),
            vec![Some("1".to_string()), Some("4".to_string())]
        );
    }

    #[test]
    fn test_projection_fails_on_absent_column() {
        let err = project_columns(&frame(), &["a", "zzz"]).unwrap_err();
        assert!(matches!(err, GeoError::MissingRequiredColumn(c) if c == "zzz"));
    }

    #[test]
    fn test_projection_of_empty_frame() {
        let empty = frame().head(Some(0));
        let table = project_columns(&empty, &["a"]).unwrap();
        assert_eq!(column_names(&table), vec!["a"]);
        assert_eq!(table.height(), 0);
    }

    #[test]
    fn test_validate_schema_lists_every_issue() {
        let (ok, issues) = validate_schema(&frame(), &["a", "b"]);
        assert!(ok);
        assert!(issues.is_empty());

        let (ok, issues) = validate_schema(&frame(), &["a", "x", "y"]);
        assert!(!ok);
        assert_eq!(
            issues,
            vec!["Missing required column: x", "Missing required column: y"]
        );
    }

    #[test]
    fn test_require_columns_reports_first_absent() {
        assert!(require_columns(&frame(), &["a", "c"]).is_ok());
        let err = require_columns(&frame(), &["a", "x", "y"]).unwrap_err();
        assert!(matches!(err, GeoError::MissingRequiredColumn(c) if c == "x"));
    }
}
