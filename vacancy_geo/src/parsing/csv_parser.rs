use polars::prelude::*;
use std::path::Path;

use crate::error::Result;

/// Parse a CSV file with a header row into a DataFrame.
///
/// Schema inference is switched off so every column is loaded as text, the
/// way the raw export is delivered. Empty cells become null; whitespace is
/// kept verbatim. Typed views are derived later by the cleaning rules.
pub fn parse_records_csv(csv_path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(csv_path.to_path_buf()))?
        .finish()?;

    log::debug!(
        "Parsed {} CSV rows with {} columns from {}",
        df.height(),
        df.width(),
        csv_path.display()
    );
    Ok(df)
}
