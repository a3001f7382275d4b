//! Spherical-earth geometry primitives used by the interpolation and
//! offset phases of the geocoding pipeline.
//!
//! Every function here is pure and infallible; none of them ever suspend.

/// Mean earth radius in meters, matching the sphere used throughout the
/// rest of the pipeline for both the haversine distance and the
/// destination-point offset.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two `(lat, lon)` points, in meters.
///
/// Symmetric in its arguments and zero for `a == b`.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Initial great-circle bearing from `(lat1, lon1)` to `(lat2, lon2)`,
/// in degrees clockwise from north, normalised to `[0, 360)`.
///
/// Undefined in the mathematical sense when the two points coincide;
/// this returns `0.0` in that case rather than `NaN`, since `atan2(0, 0)`
/// already evaluates to `0.0`.
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    let bearing = x.atan2(y).to_degrees();
    (bearing + 360.0) % 360.0
}

/// Destination point reached by travelling `distance_m` meters from
/// `(lat, lon)` along great-circle `bearing_deg` (degrees from north).
pub fn destination_point(lat: f64, lon: f64, bearing_deg: f64, distance_m: f64) -> (f64, f64) {
    let delta = distance_m / EARTH_RADIUS_METERS;
    let phi1 = lat.to_radians();
    let lambda1 = lon.to_radians();
    let theta = bearing_deg.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    (phi2.to_degrees(), lambda2.to_degrees())
}

/// Clamps `value` into `[lo, hi]`.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_is_symmetric_and_zero_at_origin() {
        let a = (5.5900, -75.8200);
        let b = (5.5950, -75.8150);
        assert!((haversine_distance(a.0, a.1, a.0, a.1)).abs() < 1e-9);
        let d1 = haversine_distance(a.0, a.1, b.0, b.1);
        let d2 = haversine_distance(b.0, b.1, a.0, a.1);
        assert!((d1 - d2).abs() < 1e-9);
        assert!(d1 > 0.0);
    }

    #[test]
    fn destination_point_round_trips_distance() {
        let (lat, lon) = (5.5900, -75.8200);
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0, 359.0] {
            for distance in [1.0, 10.0, 500.0, 9_000.0] {
                let (lat2, lon2) = destination_point(lat, lon, bearing, distance);
                let measured = haversine_distance(lat, lon, lat2, lon2);
                assert!(
                    (measured - distance).abs() < 0.1,
                    "bearing={bearing} distance={distance} measured={measured}"
                );
            }
        }
    }

    #[test]
    fn destination_point_reverses_with_opposite_bearing() {
        let (lat, lon) = (5.5900, -75.8200);
        let bearing = 37.0;
        let distance = 250.0;
        let (lat2, lon2) = destination_point(lat, lon, bearing, distance);
        let (lat3, lon3) = destination_point(lat2, lon2, (bearing + 180.0) % 360.0, distance);
        assert!((lat3 - lat).abs() < 1e-6);
        assert!((lon3 - lon).abs() < 1e-6);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn bearing_is_undefined_but_finite_at_coincident_points() {
        let bearing = initial_bearing(5.59, -75.82, 5.59, -75.82);
        assert!(bearing.is_finite());
    }
}
