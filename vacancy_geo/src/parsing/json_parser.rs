use polars::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// A flat JSON cell. Nested arrays and objects do not deserialize into it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonCell {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl JsonCell {
    fn into_text(self) -> String {
        match self {
            JsonCell::Bool(b) => b.to_string(),
            JsonCell::Number(n) => n.to_string(),
            JsonCell::Text(s) => s,
        }
    }
}

/// Parse a JSON file holding an array of flat objects.
pub fn parse_records_json(json_path: &Path) -> Result<DataFrame> {
    let content = fs::read_to_string(json_path)?;
    parse_records_json_str(&content)
}

/// Parse records from a JSON string into a DataFrame of text columns.
///
/// Scalars are kept in their JSON text form so the frame matches what the
/// CSV loader produces; `null` and absent keys become null cells. The header
/// is the union of all keys in order of first appearance (sorted within each
/// object).
pub fn parse_records_json_str(json_str: &str) -> Result<DataFrame> {
    let rows: Vec<BTreeMap<String, Option<JsonCell>>> = serde_json::from_str(json_str)?;

    let mut header: Vec<String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !header.contains(key) {
                header.push(key.clone());
            }
        }
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(rows.len()); header.len()];
    for mut row in rows {
        for (column, values) in header.iter().zip(cells.iter_mut()) {
            values.push(row.remove(column).flatten().map(JsonCell::into_text));
        }
    }

    let columns: Vec<Column> = header
        .iter()
        .zip(cells)
        .map(|(name, values)| Series::new(name.as_str().into(), values).into_column())
        .collect();

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::column_text;
    use crate::error::GeoError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_array_of_objects() {
        let df = parse_records_json_str(
            r#"[
                {"organization_location_name": "Berlin", "location_coordinates": "52.5,13.4", "posting_count": 3},
                {"organization_location_name": null, "salary": 42000.5}
            ]"#,
        )
        .unwrap();

        assert_eq!(df.height(), 2);
        assert!(df.column("salary").is_ok());
        assert_eq!(
            column_text(&df, "posting_count").unwrap(),
            vec![Some("3".to_string()), None]
        );
        assert_eq!(
            column_text(&df, "organization_location_name").unwrap(),
            vec![Some("Berlin".to_string()), None]
        );
        assert_eq!(
            column_text(&df, "salary").unwrap(),
            vec![None, Some("42000.5".to_string())]
        );
    }

    #[test]
    fn test_empty_array_gives_empty_frame() {
        let df = parse_records_json_str("[]").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 0);
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let err = parse_records_json_str(r#"[{"a": {"b": 1}}]"#).unwrap_err();
        assert!(matches!(err, GeoError::Json(_)));

        let err = parse_records_json_str(r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, GeoError::Json(_)));
    }

    #[test]
    fn test_parse_records_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "Bonn", "flag": true}}]"#).unwrap();

        let df = parse_records_json(file.path()).unwrap();
        assert_eq!(column_text(&df, "flag").unwrap(), vec![Some("true".to_string())]);
    }
}
