//! The stored reference-address entity (component B's row shape, §3.1).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A reference address as it lives in the `addresses` table.
///
/// `fingerprint` is the upsert key used by the ingester (component C);
/// when present it is unique across the table. Every descriptive field
/// besides `id`/timestamps is optional — an empty string is never stored,
/// it is normalised to `None` at the store boundary (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub id: i64,
    pub fingerprint: Option<String>,
    pub number: Option<String>,
    pub street: Option<String>,
    pub unit: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub external_id: Option<String>,
    pub accuracy: Option<String>,
    pub longitude: Option<Decimal>,
    pub latitude: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// Latitude/longitude as `f64`, for the purely numeric geometry code
    /// downstream. `None` if either coordinate is absent.
    pub fn coordinates_f64(&self) -> Option<(f64, f64)> {
        match (&self.latitude, &self.longitude) {
            (Some(lat), Some(lon)) => Some((
                lat.to_string().parse().ok()?,
                lon.to_string().parse().ok()?,
            )),
            _ => None,
        }
    }
}

/// The fields of an `Address` an upsert can write, keyed by fingerprint.
/// Used by both the ingester (component C) and any direct-write caller;
/// `id`/timestamps are assigned by the store, not supplied here.
#[derive(Debug, Clone, Default)]
pub struct NewAddress {
    pub fingerprint: Option<String>,
    pub number: Option<String>,
    pub street: Option<String>,
    pub unit: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub external_id: Option<String>,
    pub accuracy: Option<String>,
    pub longitude: Option<Decimal>,
    pub latitude: Option<Decimal>,
}

/// Converts a zero-length string into `None`; §3.1's "empty strings are
/// normalised to absent" invariant, applied uniformly at the store
/// boundary (§4.2: "happens at the store boundary, not at the caller").
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|s| if s.is_empty() { None } else { Some(s) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_become_absent() {
        assert_eq!(blank_to_none(Some(String::new())), None);
        assert_eq!(
            blank_to_none(Some("KR 43".to_string())),
            Some("KR 43".to_string())
        );
        assert_eq!(blank_to_none(None), None);
    }
}
