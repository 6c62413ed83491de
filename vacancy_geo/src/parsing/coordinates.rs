//! Parser for the `location_coordinates` column.

use crate::core::domain::GeoPoint;
use crate::error::{GeoError, Result};

/// Parse a `"<lat>,<lon>"` string into a point.
///
/// Exactly two comma-separated components are required; each is trimmed and
/// must parse to a finite number. Range checks are left to the distance
/// engine, which reports them as `InvalidCoordinate`.
///
/// # Examples
///
/// ```
/// use vacancy_geo::parsing::coordinates::parse_location_coordinates;
///
/// let point = parse_location_coordinates("52.5, 13.4").unwrap();
/// assert_eq!((point.latitude, point.longitude), (52.5, 13.4));
///
/// assert!(parse_location_coordinates("52.5;13.4").is_err());
/// ```
pub fn parse_location_coordinates(raw: &str) -> Result<GeoPoint> {
    let malformed = || GeoError::MalformedCoordinateString(raw.to_string());

    let mut parts = raw.split(',');
    let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), None) => (lat, lon),
        _ => return Err(malformed()),
    };

    let latitude = parse_component(lat).ok_or_else(malformed)?;
    let longitude = parse_component(lon).ok_or_else(malformed)?;

    Ok(GeoPoint::new(latitude, longitude))
}

fn parse_component(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
