//! Segment matcher (component F, §4.4).
//!
//! Turns a candidate list plus a target house number into a
//! [`StreetSegment`] to interpolate along: an exact hit degenerates to a
//! single point, an enclosing pair becomes the segment directly, and
//! otherwise the nearest candidate plus its neighbour is used.

use crate::models::{Address, SegmentPoint, StreetSegment};
use crate::parser::leading_integer;

/// Matches `target_number` against `candidates` (already filtered to one
/// street/city/region by E). Returns `None` only when `candidates` is
/// empty (§4.4 edge case) — an unparseable target is still matched against
/// the sorted list, just as integer `0` (§7: "treat as 0").
pub fn match_segment(candidates: &[Address], target_number: &str) -> Option<StreetSegment> {
    if candidates.is_empty() {
        return None;
    }

    let street_name = candidates[0].street.clone().unwrap_or_default();
    let city = candidates[0].city.clone().unwrap_or_default();
    let target = leading_integer(target_number);

    let mut sorted: Vec<&Address> = candidates.iter().collect();
    sorted.sort_by_key(|a| leading_integer(a.number.as_deref().unwrap_or("")));

    let points: Vec<(i64, SegmentPoint)> = sorted
        .iter()
        .filter_map(|a| {
            let (lat, lon) = a.coordinates_f64()?;
            Some((
                leading_integer(a.number.as_deref().unwrap_or("")),
                SegmentPoint {
                    number: a.number.clone().unwrap_or_default(),
                    lat,
                    lon,
                },
            ))
        })
        .collect();

    if points.is_empty() {
        return None;
    }

    // Exact hit.
    if let Some((_, point)) = points.iter().find(|(n, _)| *n == target) {
        return Some(StreetSegment::degenerate(street_name, city, point.clone()));
    }

    // Enclosing adjacent pair.
    for window in points.windows(2) {
        let (na, a) = &window[0];
        let (nb, b) = &window[1];
        if *na <= target && target <= *nb {
            return Some(StreetSegment {
                street_name,
                city,
                start: a.clone(),
                end: b.clone(),
            });
        }
    }

    // Nearest fallback. Ties go to the earlier index.
    let (nearest_idx, _) = points
        .iter()
        .enumerate()
        .min_by_key(|(_, (n, _))| (n - target).abs())
        .expect("points is non-empty");

    if points.len() == 1 {
        let (_, point) = &points[nearest_idx];
        return Some(StreetSegment::degenerate(street_name, city, point.clone()));
    }

    let neighbour_idx = if nearest_idx + 1 < points.len() {
        nearest_idx + 1
    } else {
        nearest_idx - 1
    };

    let (_, nearest) = &points[nearest_idx];
    let (_, neighbour) = &points[neighbour_idx];
    let (start, end) = if nearest_idx < neighbour_idx {
        (nearest, neighbour)
    } else {
        (neighbour, nearest)
    };

    Some(StreetSegment {
        street_name,
        city,
        start: start.clone(),
        end: end.clone(),
    })
}
