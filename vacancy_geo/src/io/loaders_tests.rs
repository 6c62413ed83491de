#[cfg(test)]
mod tests {
    use crate::core::domain::column_text;
    use crate::error::GeoError;
    use crate::io::checksum::calculate_checksum;
    use crate::io::loaders::{load_gazetteer, load_records, SourceType};
    use crate::parsing::gazetteer::GazetteerColumns;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Helper to create a temp file with the given suffix
    fn create_temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut temp_file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_source_type_detection() {
        assert_eq!(SourceType::from_path(Path::new("a.csv")).unwrap(), SourceType::Csv);
        assert_eq!(SourceType::from_path(Path::new("a.JSON")).unwrap(), SourceType::Json);
        assert!(matches!(
            SourceType::from_path(Path::new("Cities_gps.xlsx")),
            Err(GeoError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SourceType::from_path(Path::new("vacancies")),
            Err(GeoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_records_csv_with_checksum() {
        let content = "organization_location_name,location_coordinates\nBerlin,\"52.5,13.4\"\n";
        let file = create_temp_file(".csv", content);

        let loaded = load_records(file.path()).unwrap();
        assert_eq!(loaded.source_type, SourceType::Csv);
        assert_eq!(loaded.records.height(), 1);
        assert_eq!(loaded.checksum, calculate_checksum(content.as_bytes()));
    }

    #[test]
    fn test_load_records_json() {
        let file = create_temp_file(
            ".json",
            r#"[{"organization_location_name": "Bonn", "location_coordinates": "50.7,7.1"}]"#,
        );

        let loaded = load_records(file.path()).unwrap();
        assert_eq!(loaded.source_type, SourceType::Json);
        assert_eq!(
            column_text(&loaded.records, "organization_location_name").unwrap(),
            vec![Some("Bonn".to_string())]
        );
    }

    #[test]
    fn test_load_gazetteer_with_german_columns() {
        let file = create_temp_file(
            ".csv",
            "Stadt,Breitengrad,Längengrad\nBerlin,52.52,13.405\nKöln,50.9375,6.9603\n",
        );
        let columns = GazetteerColumns::new("Stadt", "Breitengrad", "Längengrad");

        let loaded = load_gazetteer(file.path(), &columns).unwrap();
        assert_eq!(loaded.gazetteer.len(), 2);
        assert_eq!(loaded.gazetteer.entries()[1].name, "Köln");
        assert_eq!(loaded.gazetteer.entries()[0].longitude, 13.405);
    }

    #[test]
    fn test_load_gazetteer_json_numbers() {
        let file = create_temp_file(
            ".json",
            r#"[{"name": "Berlin", "latitude": 52.52, "longitude": 13.405}]"#,
        );
        let loaded = load_gazetteer(file.path(), &GazetteerColumns::default()).unwrap();
        assert_eq!(loaded.gazetteer.entries()[0].latitude, 52.52);
    }

    #[test]
    fn test_load_gazetteer_rejects_bad_coordinates() {
        let file = create_temp_file(".csv", "name,latitude,longitude\nBerlin,,13.4\n");
        let err = load_gazetteer(file.path(), &GazetteerColumns::default()).unwrap_err();
        assert!(matches!(err, GeoError::InvalidGazetteerEntry { row: 1, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_records(Path::new("/nonexistent/vacancies.csv")).unwrap_err();
        assert!(matches!(err, GeoError::Io(_)));
    }
}
