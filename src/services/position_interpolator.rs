//! Position interpolator (component G, §4.5).
//!
//! Maps a target house number and a matched segment to a fractional
//! position along that segment and a side-of-street tag. Pure, never
//! suspends.

use crate::models::interpolation::{InterpolationResult, Side};
use crate::models::StreetSegment;
use crate::parser::concatenated_digits;

/// `p = (t - s) / (e - s)` in concatenated-digit form (§4.1, §4.5).
/// Degenerate segments (`s == e`) always yield `p = 0`. `clamped` records
/// whether the raw fraction actually fell outside `[0,1]` before the
/// clamp, so the caller can downgrade the accuracy tag (§9).
pub fn interpolate(target_number: &str, segment: &StreetSegment) -> InterpolationResult {
    let t = concatenated_digits(target_number);
    let s = concatenated_digits(&segment.start.number);
    let e = concatenated_digits(&segment.end.number);

    let raw_fraction = if s == e { 0.0 } else { (t - s) as f64 / (e - s) as f64 };
    let clamped_fraction = crate::geo::clamp(raw_fraction, 0.0, 1.0);

    // Side/parity is computed from the same concatenated-digit target `t`
    // as the fraction, not the leading-integer form (§4.5, §8).
    let side_number = t;
    let side = Side::for_number(side_number);

    InterpolationResult {
        fraction: clamped_fraction,
        clamped: !(0.0..=1.0).contains(&raw_fraction),
        side,
        is_odd: side_number % 2 != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SegmentPoint;

    fn segment(start_number: &str, end_number: &str) -> StreetSegment {
        StreetSegment {
            street_name: "KR 43".to_string(),
            city: "Jardín".to_string(),
            start: SegmentPoint {
                number: start_number.to_string(),
                lat: 5.59,
                lon: -75.82,
            },
            end: SegmentPoint {
                number: end_number.to_string(),
                lat: 5.60,
                lon: -75.81,
            },
        }
    }

    #[test]
    fn midpoint_interpolates_to_half() {
        let seg = segment("0", "100");
        let result = interpolate("50", &seg);
        assert!((result.fraction - 0.5).abs() < 1e-9);
        assert!(!result.clamped);
    }

    #[test]
    fn degenerate_segment_yields_zero() {
        let seg = segment("50", "50");
        let result = interpolate("50", &seg);
        assert_eq!(result.fraction, 0.0);
        assert!(!result.clamped);
    }

    #[test]
    fn beyond_range_clamps_and_flags() {
        let seg = segment("0", "100");
        let result = interpolate("500", &seg);
        assert_eq!(result.fraction, 1.0);
        assert!(result.clamped);
    }

    #[test]
    fn before_range_clamps_and_flags() {
        let seg = segment("50", "100");
        let result = interpolate("0", &seg);
        assert_eq!(result.fraction, 0.0);
        assert!(result.clamped);
    }

    #[test]
    fn side_follows_parity_independent_of_fraction_sign() {
        let seg = segment("0", "100");
        assert_eq!(interpolate("75", &seg).side, Side::Right);
        assert_eq!(interpolate("74", &seg).side, Side::Left);
    }

    #[test]
    fn side_uses_concatenated_digits_not_leading_integer() {
        // "57-48" as a leading integer is 57 (odd -> Right), but as
        // concatenated digits is 5748 (even -> Left). Side must follow
        // the same concatenated-digit number used for the fraction.
        let seg = segment("0", "10000");
        let result = interpolate("57-48", &seg);
        assert_eq!(result.side, Side::Left);
        assert!(!result.is_odd);
    }

    #[test]
    fn strictly_between_endpoints_is_strictly_interior() {
        let seg = segment("0", "100");
        let result = interpolate("37", &seg);
        assert!(result.fraction > 0.0 && result.fraction < 1.0);
    }
}
