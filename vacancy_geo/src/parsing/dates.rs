//! Lenient parsing of posting dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Parse a date or timestamp in one of the common export formats.
///
/// Returns `None` instead of failing, so callers can coerce unparseable
/// values to null.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Render a parsed date the way spreadsheet tools print it: date only when
/// the time is midnight.
pub fn format_date(dt: &NaiveDateTime) -> String {
    if dt.time().num_seconds_from_midnight() == 0 && dt.time().nanosecond() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_iso_formats() {
        let dt = parse_date("2021-03-15").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2021, 3, 15));

        let dt = parse_date("2021-03-15 08:30:00").unwrap();
        assert_eq!(dt.hour(), 8);

        let dt = parse_date("2021-03-15T08:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 6);
    }

    #[test]
    fn test_parse_regional_formats() {
        assert_eq!(parse_date("15.03.2021"), parse_date("2021-03-15"));
        assert_eq!(parse_date("03/15/2021"), parse_date("2021-03-15"));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert!(parse_date("").is_none());
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("2021-13-45").is_none());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&parse_date("2021-03-15").unwrap()), "2021-03-15");
        assert_eq!(
            format_date(&parse_date("2021-03-15 08:30:00").unwrap()),
            "2021-03-15 08:30:00"
        );
    }
}
