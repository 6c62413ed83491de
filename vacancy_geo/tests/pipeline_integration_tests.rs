//! End-to-end tests: raw export -> cleaning -> distance computation -> files.

use polars::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use vacancy_geo::config::{GeoConfig, PipelineConfig, DEFAULT_OUTPUT_COLUMNS};
use vacancy_geo::core::domain::{
    column_names, column_text, DERIVED_COLUMNS, DISTANCE_COLUMN, FUZZY_RATING_COLUMN,
    ORGANIZATION_LOCATION_COLUMN,
};
use vacancy_geo::io::loaders::{load_gazetteer, load_records};
use vacancy_geo::io::writers::{write_frame_csv, write_match_audit_csv};
use vacancy_geo::parsing::csv_parser::parse_records_csv;
use vacancy_geo::parsing::gazetteer::GazetteerColumns;
use vacancy_geo::preprocessing::DistancePipeline;
use vacancy_geo::services::report::{InputChecksums, RunReport};
use vacancy_geo::transformations::cleaning::{clean_vacancies, CleaningRules, CLEANING_DERIVED_COLUMNS};
use vacancy_geo::GeoError;

/// Columns of the raw export: everything on the whitelist that neither the
/// cleaning rules nor the distance pipeline derive, plus `job_id`.
fn raw_columns() -> Vec<String> {
    let mut columns: Vec<String> = DEFAULT_OUTPUT_COLUMNS
        .iter()
        .filter(|c| !CLEANING_DERIVED_COLUMNS.contains(*c) && !DERIVED_COLUMNS.contains(*c))
        .map(|c| c.to_string())
        .collect();
    columns.push("job_id".to_string());
    columns
}

fn raw_row(city: &str, coordinates: &str, language: &str) -> HashMap<String, String> {
    let mut row: HashMap<String, String> = raw_columns()
        .into_iter()
        .map(|c| (c.clone(), format!("{}_value", c)))
        .collect();
    for (column, value) in [
        ("organization_location_name", city),
        ("location_coordinates", coordinates),
        ("language", language),
        ("duration", "45"),
        ("posting_count", "1"),
        ("contract_type_label", "Permanent contract"),
        ("working_hours_type_label", "Regular working hours"),
        ("salary", ""),
        ("advertiser_type_label", "Direct employer"),
        ("profession_isco_code_value", "2512"),
        ("job_id", "123"),
        ("organization_ID", "42"),
        ("organization_industry_label", "Software"),
        ("education_level_label", "Bachelor"),
        ("date", "2021-02-03"),
        ("organization_size_label", "1000-4999"),
    ] {
        row.insert(column.to_string(), value.to_string());
    }
    row
}

/// Write rows as CSV; empty strings become empty cells.
fn write_raw_csv(path: &Path, rows: &[HashMap<String, String>]) {
    let columns: Vec<Column> = raw_columns()
        .iter()
        .map(|c| {
            let values: Vec<Option<&str>> = rows
                .iter()
                .map(|row| Some(row[c].as_str()).filter(|v| !v.is_empty()))
                .collect();
            Series::new(c.as_str().into(), values).into_column()
        })
        .collect();
    let mut df = DataFrame::new(columns).unwrap();
    write_frame_csv(fs::File::create(path).unwrap(), &mut df).unwrap();
}

fn floats(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    df.column(column).unwrap().f64().unwrap().into_iter().collect()
}

fn write_gazetteer_csv(path: &Path) {
    fs::write(
        path,
        "Stadt,Breitengrad,Längengrad\n\
         Berlin,52.52,13.405\n\
         München,48.1372,11.5756\n\
         Köln,50.9375,6.9603\n",
    )
    .unwrap();
}

fn german_columns() -> GazetteerColumns {
    GazetteerColumns::new("Stadt", "Breitengrad", "Längengrad")
}

#[test]
fn test_clean_then_compute_distances() {
    let dir = tempfile::tempdir().unwrap();
    let raw_path = dir.path().join("vacancies.csv");
    let cleaned_path = dir.path().join("vacancies_cleaned.csv");
    let gazetteer_path = dir.path().join("cities_gps.csv");
    let final_path = dir.path().join("dataset_final.csv");
    let audit_path = dir.path().join("city_matches.csv");

    write_raw_csv(
        &raw_path,
        &[
            raw_row("Berlin", "52.5,13.4", "de"),
            raw_row("Berlin", "52.51,13.39", "en"),
            raw_row("berlin ", "52.49,13.41", "de"),
            raw_row("berlin ", "52.5,13.4", "de"),
            raw_row("München", "48.14,11.58", "de"),
            raw_row("München", "48.15,11.57", "fr"),
            raw_row("Hamburg", "53.55,9.99", "de"),
            raw_row("Hamburg", "53.55,9.99", "de"),
            raw_row("Bonn", "50.73,7.1", "de"),
        ],
    );
    write_gazetteer_csv(&gazetteer_path);

    // Cleaning stage
    let raw = load_records(&raw_path).unwrap();
    let (mut cleaned, summary) = clean_vacancies(raw.records, &CleaningRules::default()).unwrap();
    assert_eq!(summary.dropped_by("singleton_location_names"), 1);
    assert_eq!(cleaned.height(), 8);
    write_frame_csv(fs::File::create(&cleaned_path).unwrap(), &mut cleaned).unwrap();

    // Distance stage with the default configuration
    let records = load_records(&cleaned_path).unwrap();
    let gazetteer = load_gazetteer(&gazetteer_path, &german_columns()).unwrap();
    let mut output = DistancePipeline::new()
        .compute_distances(records.records, &gazetteer.gazetteer)
        .unwrap();

    assert_eq!(column_names(&output.table), DEFAULT_OUTPUT_COLUMNS.to_vec());
    assert_eq!(output.table.height(), 6);
    assert_eq!(output.summary.low_confidence, 2);
    assert_eq!(output.summary.singleton_names, 0);

    let names: Vec<&str> = output.matches.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["berlin", "muenchen", "hamburg"]);
    assert!(output.matches[2].score < 85);

    let ratings = output.table.column(FUZZY_RATING_COLUMN).unwrap().u32().unwrap();
    assert!(ratings.into_iter().all(|rating| rating == Some(100)));
    for km in floats(&output.table, DISTANCE_COLUMN) {
        let km = km.unwrap();
        assert!((0.0..5.0).contains(&km), "unexpected distance {}", km);
    }

    write_frame_csv(fs::File::create(&final_path).unwrap(), &mut output.table).unwrap();
    write_match_audit_csv(fs::File::create(&audit_path).unwrap(), &output.matches).unwrap();

    let written = parse_records_csv(&final_path).unwrap();
    assert_eq!(column_names(&written), DEFAULT_OUTPUT_COLUMNS.to_vec());
    assert_eq!(written.height(), 6);
    let first = |column: &str| column_text(&written, column).unwrap().swap_remove(0);
    assert_eq!(first(ORGANIZATION_LOCATION_COLUMN).as_deref(), Some("berlin"));
    assert_eq!(first("Applicant_language_cluster").as_deref(), Some("German"));
    assert_eq!(first("salary_dummy").as_deref(), Some("false"));

    let audit = fs::read_to_string(&audit_path).unwrap();
    assert!(audit.contains("muenchen,muenchen,100,48.1372,11.5756"));

    let report = RunReport::new(
        &output,
        &PipelineConfig::default(),
        InputChecksums {
            records: Some(records.checksum),
            gazetteer: Some(gazetteer.checksum),
        },
    )
    .unwrap();
    assert_eq!(report.distance_km.map(|stats| stats.count), Some(6));
    assert_eq!(report.confident_names, 2);
}

#[test]
fn test_missing_passthrough_column_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let records_path = dir.path().join("records.json");
    fs::write(
        &records_path,
        r#"[
            {"organization_location_name": "Berlin", "location_coordinates": "52.5,13.4"},
            {"organization_location_name": "Berlin", "location_coordinates": "52.5,13.4"}
        ]"#,
    )
    .unwrap();

    let records = load_records(&records_path).unwrap();
    let gazetteer_path = dir.path().join("cities_gps.csv");
    write_gazetteer_csv(&gazetteer_path);
    let gazetteer = load_gazetteer(&gazetteer_path, &german_columns()).unwrap();

    let err = DistancePipeline::new()
        .compute_distances(records.records, &gazetteer.gazetteer)
        .unwrap_err();
    assert!(matches!(err, GeoError::MissingRequiredColumn(c) if c == "advertiser_type_value"));
}

#[test]
fn test_configured_run_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("vacancy_geo.toml");
    fs::write(
        &config_path,
        r#"
[matching]
threshold = 90
parallel = false

[filtering]
drop_singleton_names = false

[output]
columns = ["organization_location_name", "Fuzzy_Rating", "distance_between_job_and_organization"]

[gazetteer]
name_column = "Stadt"
latitude_column = "Breitengrad"
longitude_column = "Längengrad"
"#,
    )
    .unwrap();
    let config = GeoConfig::from_file(&config_path).unwrap();

    let records_path = dir.path().join("records.json");
    fs::write(
        &records_path,
        r#"[
            {"organization_location_name": "Koeln", "location_coordinates": "50.94,6.96"},
            {"organization_location_name": "Koln", "location_coordinates": "50.94,6.96"},
            {"organization_location_name": "Muenchen", "location_coordinates": "48.1372,11.5756"}
        ]"#,
    )
    .unwrap();
    let gazetteer_path = dir.path().join("cities_gps.csv");
    write_gazetteer_csv(&gazetteer_path);

    let records = load_records(&records_path).unwrap();
    let gazetteer = load_gazetteer(&gazetteer_path, &config.gazetteer).unwrap();
    let output = DistancePipeline::with_config(config.to_pipeline_config())
        .compute_distances(records.records, &gazetteer.gazetteer)
        .unwrap();

    // "koln" scores 89 against "koeln" and misses the threshold of 90
    assert_eq!(output.table.height(), 2);
    assert_eq!(output.summary.low_confidence, 1);
    assert_eq!(
        column_text(&output.table, ORGANIZATION_LOCATION_COLUMN).unwrap(),
        vec![Some("koeln".to_string()), Some("muenchen".to_string())]
    );
    assert_eq!(floats(&output.table, DISTANCE_COLUMN)[1], Some(0.0));
}
