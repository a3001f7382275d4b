//! The result of component G's position interpolation (§3.4).

/// Which side of the street a house number falls on, per the Colombian
/// convention: odd numbers to the right of the start→end direction, even
/// numbers to the left (§4.5, GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// `Right` for odd `n`, `Left` for even `n` (§8: `side(n) = RIGHT ⇔ n % 2 = 1`).
    pub fn for_number(n: i64) -> Self {
        if n % 2 != 0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    pub fn bearing_offset_deg(self) -> f64 {
        match self {
            Side::Right => 90.0,
            Side::Left => -90.0,
        }
    }
}

/// Output of interpolating a target house number against a [`crate::models::segment::StreetSegment`].
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationResult {
    /// Clamped position along the segment, `0.0` (start) to `1.0` (end).
    pub fraction: f64,
    /// Whether the raw (pre-clamp) fraction actually fell outside `[0,1]`;
    /// when true, the caller downgrades `INTERPOLATED` to `RANGE_MATCH`
    /// (§9, Open Question: "clamping beyond end of range").
    pub clamped: bool,
    pub side: Side,
    pub is_odd: bool,
}
