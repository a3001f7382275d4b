//! Line-delimited GeoJSON reader (§4.8, §6.2).
//!
//! Each line is either empty (ignored) or a single GeoJSON `Feature`
//! object; the outer `FeatureCollection` framing may be absent. Unicode
//! escapes are handled by `serde_json` natively.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::models::address::blank_to_none;
use crate::models::NewAddress;
use crate::utils::errors::AppError;

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: String,
    #[serde(default)]
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    hash: Option<String>,
    number: Option<String>,
    street: Option<String>,
    unit: Option<String>,
    city: Option<String>,
    district: Option<String>,
    region: Option<String>,
    postcode: Option<String>,
    id: Option<String>,
    accuracy: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

/// Parses one line into a [`NewAddress`]. Returns `Ok(None)` for a blank
/// line or a non-`Feature` object (§4.8: both are silently skipped, not
/// errors). A malformed JSON line is an [`AppError::Json`].
pub fn parse_line(line: &str) -> Result<Option<NewAddress>, AppError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let feature: Feature = serde_json::from_str(trimmed)?;
    if feature.feature_type != "Feature" {
        return Ok(None);
    }

    let (longitude, latitude) = feature
        .geometry
        .as_ref()
        .map(|g| coordinates_from(&g.coordinates))
        .unwrap_or((None, None));

    Ok(Some(NewAddress {
        fingerprint: blank_to_none(feature.properties.hash),
        number: blank_to_none(feature.properties.number),
        street: blank_to_none(feature.properties.street),
        unit: blank_to_none(feature.properties.unit),
        city: blank_to_none(feature.properties.city),
        district: blank_to_none(feature.properties.district),
        region: blank_to_none(feature.properties.region),
        postcode: blank_to_none(feature.properties.postcode),
        external_id: blank_to_none(feature.properties.id),
        accuracy: blank_to_none(feature.properties.accuracy),
        longitude,
        latitude,
    }))
}

/// `coordinates[0]` is longitude, `[1]` is latitude; fewer than two
/// entries leaves both absent (§4.8).
fn coordinates_from(coordinates: &[f64]) -> (Option<Decimal>, Option<Decimal>) {
    if coordinates.len() < 2 {
        return (None, None);
    }
    let lon = Decimal::from_str(&format!("{:.7}", coordinates[0])).ok();
    let lat = Decimal::from_str(&format!("{:.7}", coordinates[1])).ok();
    (lon, lat)
}
