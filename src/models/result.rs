//! The final output of the geocoding pipeline (§3.5).

use serde::Serialize;

use super::interpolation::Side;
use super::parsed::ParsedAddress;
use super::segment::StreetSegment;

/// The accuracy classification attached to every [`GeocodingResult`].
///
/// Mirrors the state machine of component I (§4.7): each terminal state
/// in the decision graph maps to exactly one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccuracyTag {
    Interpolated,
    RangeMatch,
    StreetCentroid,
    CityCentroid,
    ParseFailed,
    NoStreetMatch,
    NoMatch,
    Error,
}

/// The tagged result returned by [`crate::services::geocoding_service::GeocodingService::geocode`].
///
/// `success` and `accuracy_tag` are the two fields every caller should
/// branch on; the rest are diagnostic detail carried along for the caller
/// that wants to show its work.
#[derive(Debug, Clone, Serialize)]
pub struct GeocodingResult {
    pub success: bool,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub accuracy_tag: AccuracyTag,
    pub side: Option<Side>,
    pub matched_street: Option<String>,
    pub message: String,
    pub parsed_components: Option<ParsedAddress>,
    #[serde(skip)]
    pub segment: Option<StreetSegment>,
}

impl GeocodingResult {
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            lat: None,
            lon: None,
            accuracy_tag: AccuracyTag::ParseFailed,
            side: None,
            matched_street: None,
            message: message.into(),
            parsed_components: None,
            segment: None,
        }
    }

    pub fn no_street_match(message: impl Into<String>, parsed: ParsedAddress) -> Self {
        Self {
            success: false,
            lat: None,
            lon: None,
            accuracy_tag: AccuracyTag::NoStreetMatch,
            side: None,
            matched_street: None,
            message: message.into(),
            parsed_components: Some(parsed),
            segment: None,
        }
    }

    pub fn no_match(message: impl Into<String>, parsed: ParsedAddress) -> Self {
        Self {
            success: false,
            lat: None,
            lon: None,
            accuracy_tag: AccuracyTag::NoMatch,
            side: None,
            matched_street: None,
            message: message.into(),
            parsed_components: Some(parsed),
            segment: None,
        }
    }

    pub fn street_centroid(lat: f64, lon: f64, street: String, parsed: ParsedAddress) -> Self {
        Self {
            success: true,
            lat: Some(lat),
            lon: Some(lon),
            accuracy_tag: AccuracyTag::StreetCentroid,
            side: None,
            matched_street: Some(street),
            message: "Used street centroid (number not found in range)".to_string(),
            parsed_components: Some(parsed),
            segment: None,
        }
    }

    /// The ordinary success path (§4.7 step 4): a segment was found and
    /// interpolation/offset succeeded without the raw fraction needing
    /// a clamp.
    #[allow(clippy::too_many_arguments)]
    pub fn interpolated(
        lat: f64,
        lon: f64,
        side: Side,
        street: String,
        parsed: ParsedAddress,
        segment: StreetSegment,
    ) -> Self {
        Self {
            success: true,
            lat: Some(lat),
            lon: Some(lon),
            accuracy_tag: AccuracyTag::Interpolated,
            side: Some(side),
            matched_street: Some(street),
            message: "Interpolated between known reference points".to_string(),
            parsed_components: Some(parsed),
            segment: Some(segment),
        }
    }

    /// A degraded-confidence success (§9, Open Questions): either the
    /// segment came from the single-candidate nearest fallback, or the
    /// raw interpolation fraction fell outside `[0,1]` and had to be
    /// clamped. Shares `INTERPOLATED`'s fields but downgrades the tag.
    #[allow(clippy::too_many_arguments)]
    pub fn range_match(
        lat: f64,
        lon: f64,
        side: Side,
        street: String,
        parsed: ParsedAddress,
        segment: StreetSegment,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            lat: Some(lat),
            lon: Some(lon),
            accuracy_tag: AccuracyTag::RangeMatch,
            side: Some(side),
            matched_street: Some(street),
            message: message.into(),
            parsed_components: Some(parsed),
            segment: Some(segment),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            lat: None,
            lon: None,
            accuracy_tag: AccuracyTag::Error,
            side: None,
            matched_street: None,
            message: message.into(),
            parsed_components: None,
            segment: None,
        }
    }
}
