//! Street searcher (component E, §4.3).
//!
//! Two-tier query over the address store: an exact `city`/`street`/`region`
//! match, falling back to a case-insensitive substring match only when the
//! first tier returns nothing. Never crosses a city or region boundary.

use std::sync::Arc;

use tracing::debug;

use crate::models::Address;
use crate::repositories::AddressStore;
use crate::utils::errors::AppError;

const CANDIDATE_CAP: i64 = 100;

pub struct AddressSearchService {
    store: Arc<dyn AddressStore>,
}

impl AddressSearchService {
    pub fn new(store: Arc<dyn AddressStore>) -> Self {
        Self { store }
    }

    /// Tier 1 exact, tier 2 fuzzy-only-if-tier-1-empty (§4.3).
    pub async fn search(
        &self,
        street_name_full: &str,
        city: &str,
        region: &str,
    ) -> Result<Vec<Address>, AppError> {
        let exact = self
            .store
            .search_street_exact(street_name_full, city, region, CANDIDATE_CAP)
            .await?;
        if !exact.is_empty() {
            debug!(street = street_name_full, city, region, count = exact.len(), "exact street match");
            return Ok(exact);
        }

        let escaped = escape_like_pattern(street_name_full);
        let fuzzy = self
            .store
            .search_street_fuzzy(&escaped, city, region, CANDIDATE_CAP)
            .await?;
        debug!(street = street_name_full, city, region, count = fuzzy.len(), "fuzzy street match");
        Ok(fuzzy)
    }

    /// Arithmetic mean of every candidate's coordinates for `street_name_full`
    /// in `city`/`region`, used as the centroid fallback (§4.3, §4.7 step 3).
    pub async fn street_centroid(
        &self,
        street_name_full: &str,
        city: &str,
        region: &str,
    ) -> Result<Option<(f64, f64)>, AppError> {
        let candidates = self.search(street_name_full, city, region).await?;
        centroid_of(&candidates)
    }
}

fn centroid_of(candidates: &[Address]) -> Result<Option<(f64, f64)>, AppError> {
    let points: Vec<(f64, f64)> = candidates
        .iter()
        .filter_map(|a| a.coordinates_f64())
        .collect();
    if points.is_empty() {
        return Ok(None);
    }
    let n = points.len() as f64;
    let (sum_lat, sum_lon) = points
        .iter()
        .fold((0.0, 0.0), |(slat, slon), (lat, lon)| (slat + lat, slon + lon));
    Ok(Some((sum_lat / n, sum_lon / n)))
}

/// Escapes `%` and `_` so a user-provided street name can't widen an
/// `ILIKE` pattern beyond a literal substring match (§9, Design Notes).
pub fn escape_like_pattern(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAddress;
    use crate::repositories::MemoryAddressStore;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn seed(store: &MemoryAddressStore, street: &str, city: &str, region: &str, number: &str, lat: f64, lon: f64) {
        store.seed(NewAddress {
            street: Some(street.to_string()),
            city: Some(city.to_string()),
            region: Some(region.to_string()),
            number: Some(number.to_string()),
            latitude: Some(Decimal::from_str(&lat.to_string()).unwrap()),
            longitude: Some(Decimal::from_str(&lon.to_string()).unwrap()),
            ..Default::default()
        });
    }

    #[tokio::test]
    async fn exact_tier_wins_when_present() {
        let store = MemoryAddressStore::new();
        seed(&store, "KR 43", "Jardín", "ANT", "50", 5.59, -75.82);
        let search = AddressSearchService::new(Arc::new(store));
        let found = search.search("KR 43", "Jardín", "ANT").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn fuzzy_tier_only_runs_when_exact_is_empty() {
        let store = MemoryAddressStore::new();
        seed(&store, "KR 43A", "Jardín", "ANT", "50", 5.59, -75.82);
        let search = AddressSearchService::new(Arc::new(store));
        let found = search.search("KR 43", "Jardín", "ANT").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].street.as_deref(), Some("KR 43A"));
    }

    #[tokio::test]
    async fn never_crosses_city_or_region() {
        let store = MemoryAddressStore::new();
        seed(&store, "KR 43", "Medellín", "ANT", "50", 6.25, -75.56);
        let search = AddressSearchService::new(Arc::new(store));
        let found = search.search("KR 43", "Jardín", "ANT").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn street_centroid_averages_coordinates() {
        let store = MemoryAddressStore::new();
        seed(&store, "KR 43", "Jardín", "ANT", "50", 5.59, -75.82);
        seed(&store, "KR 43", "Jardín", "ANT", "100", 5.60, -75.80);
        let search = AddressSearchService::new(Arc::new(store));
        let (lat, lon) = search
            .street_centroid("KR 43", "Jardín", "ANT")
            .await
            .unwrap()
            .unwrap();
        assert!((lat - 5.595).abs() < 1e-9);
        assert!((lon - (-75.81)).abs() < 1e-9);
    }

    #[test]
    fn escape_like_pattern_neutralises_wildcards() {
        assert_eq!(escape_like_pattern("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like_pattern("KR 43"), "KR 43");
    }
}
