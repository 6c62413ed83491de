//! Geodesic distance on the WGS-84 ellipsoid.
//!
//! Distances are computed with Vincenty's inverse formula, iterated until the
//! longitude on the auxiliary sphere changes by less than 1e-12 rad
//! (sub-millimetre). Vincenty does not converge for nearly antipodal points;
//! those fall back to the great-circle distance on the mean Earth radius,
//! which is within 0.5% of the ellipsoidal value.

use std::f64::consts::PI;

use crate::core::domain::GeoPoint;
use crate::error::Result;

/// WGS-84 semi-major axis in metres
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;
/// WGS-84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
/// WGS-84 semi-minor axis in metres
pub const WGS84_SEMI_MINOR_AXIS_M: f64 = WGS84_SEMI_MAJOR_AXIS_M * (1.0 - WGS84_FLATTENING);
/// IUGG mean Earth radius in kilometres
pub const MEAN_EARTH_RADIUS_KM: f64 = 6_371.008_8;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE_THRESHOLD: f64 = 1e-12;

/// Geodesic surface distance in kilometres between two coordinates in degrees.
///
/// # Errors
///
/// `InvalidCoordinate` when a latitude is outside [-90, 90], a longitude
/// outside [-180, 180], or a value is not finite.
///
/// # Examples
///
/// ```
/// use vacancy_geo::algorithms::geodesy::geodesic_distance_km;
///
/// // Berlin to Munich
/// let d = geodesic_distance_km(52.52, 13.405, 48.1351, 11.582).unwrap();
/// assert!((d - 504.689).abs() < 0.01);
///
/// assert!(geodesic_distance_km(95.0, 0.0, 0.0, 0.0).is_err());
/// ```
pub fn geodesic_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64> {
    distance_km(GeoPoint::new(lat1, lon1), GeoPoint::new(lat2, lon2))
}

/// Geodesic distance in kilometres between two validated points.
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> Result<f64> {
    from.validate()?;
    to.validate()?;

    let (from, to) = (at_pole_meridian(from), at_pole_meridian(to));
    if from == to {
        return Ok(0.0);
    }

    // Evaluate in a canonical order so that d(a, b) == d(b, a) bit for bit
    let (p1, p2) = if (from.latitude, from.longitude) <= (to.latitude, to.longitude) {
        (from, to)
    } else {
        (to, from)
    };

    let km = match vincenty_inverse_m(p1, p2) {
        Some(metres) => metres / 1000.0,
        None => {
            log::debug!(
                "Vincenty did not converge for ({}, {}) -> ({}, {}), using great-circle distance",
                p1.latitude,
                p1.longitude,
                p2.latitude,
                p2.longitude
            );
            great_circle_km(p1, p2)
        }
    };

    Ok(km.max(0.0))
}

/// Every longitude names the same point at a pole; pin it to 0 so coincident
/// polar points compare equal.
fn at_pole_meridian(point: GeoPoint) -> GeoPoint {
    if point.latitude.abs() == 90.0 {
        GeoPoint::new(point.latitude, 0.0)
    } else {
        point
    }
}

/// Haversine distance on a sphere of [`MEAN_EARTH_RADIUS_KM`].
pub fn great_circle_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let d_phi = (to.latitude - from.latitude).to_radians();
    let d_lambda = (to.longitude - from.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Vincenty inverse solution in metres, `None` when the iteration diverges.
fn vincenty_inverse_m(from: GeoPoint, to: GeoPoint) -> Option<f64> {
    let a = WGS84_SEMI_MAJOR_AXIS_M;
    let b = WGS84_SEMI_MINOR_AXIS_M;
    let f = WGS84_FLATTENING;

    let mut l = (to.longitude - from.longitude).to_radians();
    if l > PI {
        l -= 2.0 * PI;
    } else if l < -PI {
        l += 2.0 * PI;
    }
    let u1 = ((1.0 - f) * from.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * to.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        // coincident points
        if sin_sigma == 0.0 {
            return Some(0.0);
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line: cos_sq_alpha == 0
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));

        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if lambda.abs() > PI + CONVERGENCE_THRESHOLD {
            return None;
        }

        if (lambda - lambda_prev).abs() < CONVERGENCE_THRESHOLD {
            let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            return Some(b * big_a * (sigma - delta_sigma));
        }
    }

    None
}
