//! Coordinate generator (component H, §4.6).
//!
//! Linear interpolation between a segment's endpoints, followed by a
//! perpendicular offset onto the correct kerb. Pure, never suspends.

use crate::geo::destination_point;
use crate::models::interpolation::Side;
use crate::models::StreetSegment;

/// Planar linear interpolation between `segment`'s endpoints at fraction
/// `p`. Acceptable because segments are street-block scale (§4.6).
pub fn interpolate_linear(segment: &StreetSegment, p: f64) -> (f64, f64) {
    let lat = segment.start.lat + p * (segment.end.lat - segment.start.lat);
    let lon = segment.start.lon + p * (segment.end.lon - segment.start.lon);
    (lat, lon)
}

/// Displaces `(lat, lon)` by `offset_m` metres perpendicular to
/// `segment`'s start→end bearing, on the side given by `side`.
///
/// Bearing is computed from the segment's own endpoints, not from the
/// interpolated point, since a degenerate segment leaves the bearing
/// undefined either way (§4.6: "its result is effectively the
/// interpolated point plus numerical noise").
pub fn offset_perpendicular(
    segment: &StreetSegment,
    lat: f64,
    lon: f64,
    side: Side,
    offset_m: f64,
) -> (f64, f64) {
    let bearing = crate::geo::initial_bearing(
        segment.start.lat,
        segment.start.lon,
        segment.end.lat,
        segment.end.lon,
    );
    let perpendicular = (bearing + side.bearing_offset_deg()).rem_euclid(360.0);
    destination_point(lat, lon, perpendicular, offset_m)
}

/// Centroid of a segment: interpolation at `p = 0.5` (§4.6).
pub fn centroid(segment: &StreetSegment) -> (f64, f64) {
    interpolate_linear(segment, 0.5)
}
