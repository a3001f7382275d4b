//! Geocoding service (component I, §4.7): orchestrates D→E→F→G→H,
//! applies fallbacks, and produces a tagged result.

use std::sync::Arc;

use tracing::{info, warn};

use crate::models::{GeocodingResult, StreetSegment};
use crate::parser;
use crate::repositories::AddressStore;
use crate::services::address_search_service::AddressSearchService;
use crate::services::coordinate_generator::{centroid, interpolate_linear, offset_perpendicular};
use crate::services::position_interpolator::interpolate;
use crate::services::segment_matcher::match_segment;

const DEFAULT_REGION: &str = "ANT";
const DEFAULT_OFFSET_M: f64 = 10.0;

/// One request to [`GeocodingService::geocode`]. `region` and `offset_m`
/// fall back to §6.3's defaults when absent.
#[derive(Debug, Clone)]
pub struct GeocodeRequest {
    pub address: String,
    pub city: String,
    pub region: Option<String>,
    pub offset_m: Option<f64>,
}

impl GeocodeRequest {
    pub fn new(address: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            region: None,
            offset_m: None,
        }
    }
}

pub struct GeocodingService {
    searcher: AddressSearchService,
    /// Whether to fall back to the street centroid when no segment is
    /// found (§4.7 step 3, §7). Always `true` in the public surface
    /// (§6.3 names no flag to disable it); kept as a field so tests can
    /// exercise the `NO_MATCH` branch directly.
    fallbacks_enabled: bool,
}

impl GeocodingService {
    pub fn new(store: Arc<dyn AddressStore>) -> Self {
        Self {
            searcher: AddressSearchService::new(store),
            fallbacks_enabled: true,
        }
    }

    #[cfg(test)]
    fn with_fallbacks_disabled(store: Arc<dyn AddressStore>) -> Self {
        Self {
            searcher: AddressSearchService::new(store),
            fallbacks_enabled: false,
        }
    }

    /// `geocode(address, city, region="ANT", offset_m=10.0) -> GeocodingResult` (§6.3).
    pub async fn geocode(
        &self,
        address: &str,
        city: &str,
        region: Option<&str>,
        offset_m: Option<f64>,
    ) -> GeocodingResult {
        let region = region.unwrap_or(DEFAULT_REGION);
        let offset_m = offset_m.unwrap_or(DEFAULT_OFFSET_M);

        // PARSING
        let parsed = match parser::parse(address) {
            Some(p) => p,
            None => {
                warn!(address, "address failed to parse");
                return GeocodingResult::parse_failed(format!("could not parse address: {address}"));
            }
        };
        let street_name_full = parsed.full_street_name();
        let full_number = parsed.full_number();

        // SEARCHING
        let candidates = match self.searcher.search(&street_name_full, city, region).await {
            Ok(c) => c,
            Err(e) => return GeocodingResult::error(format!("store error during search: {e}")),
        };
        if candidates.is_empty() {
            return GeocodingResult::no_street_match(
                format!("no reference addresses found on {street_name_full} in {city}"),
                parsed,
            );
        }

        // MATCHING
        let segment = match_segment(&candidates, &full_number);
        let segment = match segment {
            Some(seg) => seg,
            None if self.fallbacks_enabled => {
                return match self.searcher.street_centroid(&street_name_full, city, region).await {
                    Ok(Some((lat, lon))) => {
                        info!(street = street_name_full.as_str(), "falling back to street centroid");
                        GeocodingResult::street_centroid(lat, lon, street_name_full, parsed)
                    }
                    Ok(None) => GeocodingResult::no_match(
                        format!("candidates found on {street_name_full} but no coordinates to centre on"),
                        parsed,
                    ),
                    Err(e) => GeocodingResult::error(format!("store error during centroid fallback: {e}")),
                };
            }
            None => {
                return GeocodingResult::no_match(
                    format!("no enclosing or nearby segment for {full_number} on {street_name_full}"),
                    parsed,
                );
            }
        };
        let from_nearest_fallback = segment.is_degenerate() && candidates.len() > 1;

        // INTERPOLATING, GENERATING, OFFSETTING
        let interpolation = interpolate(&full_number, &segment);
        let (lin_lat, lin_lon) = interpolate_linear(&segment, interpolation.fraction);
        let (lat, lon) =
            offset_perpendicular(&segment, lin_lat, lin_lon, interpolation.side, offset_m);

        if interpolation.clamped || from_nearest_fallback {
            let message = if from_nearest_fallback {
                "matched via nearest single-candidate fallback; bearing is not well defined".to_string()
            } else {
                "target number clamped to segment range".to_string()
            };
            return GeocodingResult::range_match(
                lat,
                lon,
                interpolation.side,
                street_name_full,
                parsed,
                segment,
                message,
            );
        }

        GeocodingResult::interpolated(lat, lon, interpolation.side, street_name_full, parsed, segment)
    }

    /// `geocode(req)` convenience overload taking a [`GeocodeRequest`].
    pub async fn geocode_request(&self, request: &GeocodeRequest) -> GeocodingResult {
        self.geocode(
            &request.address,
            &request.city,
            request.region.as_deref(),
            request.offset_m,
        )
        .await
    }

    /// `geocode_many(requests)` — results in input order, 1:1, no early
    /// termination (§4.7).
    pub async fn geocode_many(&self, requests: &[GeocodeRequest]) -> Vec<GeocodingResult> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.geocode_request(request).await);
        }
        results
    }

    /// Centroid of an already-matched segment, exposed for callers that
    /// already hold one (e.g. diagnostics tooling); not part of §6.3's
    /// contract but a thin pass-through to (H).
    pub fn segment_centroid(&self, segment: &StreetSegment) -> (f64, f64) {
        centroid(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccuracyTag, NewAddress, Side};
    use crate::repositories::MemoryAddressStore;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(value: f64) -> Decimal {
        Decimal::from_str(&value.to_string()).unwrap()
    }

    fn seed_default_store() -> MemoryAddressStore {
        let store = MemoryAddressStore::new();
        store.seed(NewAddress {
            street: Some("KR 43".to_string()),
            city: Some("Jardín".to_string()),
            region: Some("ANT".to_string()),
            number: Some("50".to_string()),
            latitude: Some(dec(5.5900)),
            longitude: Some(dec(-75.8200)),
            ..Default::default()
        });
        store.seed(NewAddress {
            street: Some("KR 43".to_string()),
            city: Some("Jardín".to_string()),
            region: Some("ANT".to_string()),
            number: Some("100".to_string()),
            latitude: Some(dec(5.5950)),
            longitude: Some(dec(-75.8150)),
            ..Default::default()
        });
        store
    }

    #[tokio::test]
    async fn scenario_1_interpolates_and_picks_right_side() {
        let service = GeocodingService::new(Arc::new(seed_default_store()));
        let result = service.geocode("KR 43 # 75", "Jardín", Some("ANT"), None).await;
        assert!(result.success);
        assert_eq!(result.accuracy_tag, AccuracyTag::Interpolated);
        assert_eq!(result.side, Some(Side::Right));
        assert_eq!(result.matched_street.as_deref(), Some("KR 43"));
        let lat = result.lat.unwrap();
        let lon = result.lon.unwrap();
        assert!(lat > 5.5900 && lat < 5.5950);
        assert!(lon > -75.8200 && lon < -75.8150);
    }

    #[tokio::test]
    async fn scenario_2_even_number_picks_left_side() {
        let service = GeocodingService::new(Arc::new(seed_default_store()));
        let result = service.geocode("KR 43 # 74", "Jardín", Some("ANT"), None).await;
        assert_eq!(result.side, Some(Side::Left));
    }

    #[tokio::test]
    async fn scenario_3_exact_endpoint_still_interpolates() {
        let service = GeocodingService::new(Arc::new(seed_default_store()));
        let result = service.geocode("KR 43 # 50", "Jardín", Some("ANT"), None).await;
        assert!(result.success);
        assert_eq!(result.accuracy_tag, AccuracyTag::Interpolated);
        let distance = crate::geo::haversine_distance(
            5.5900,
            -75.8200,
            result.lat.unwrap(),
            result.lon.unwrap(),
        );
        assert!(distance < 15.0);
    }

    #[tokio::test]
    async fn scenario_4_unknown_street_is_no_street_match() {
        let service = GeocodingService::new(Arc::new(seed_default_store()));
        let result = service.geocode("KR 999 # 50", "Jardín", Some("ANT"), None).await;
        assert!(!result.success);
        assert_eq!(result.accuracy_tag, AccuracyTag::NoStreetMatch);
    }

    #[tokio::test]
    async fn scenario_5_unparseable_address_is_parse_failed() {
        let service = GeocodingService::new(Arc::new(seed_default_store()));
        let result = service.geocode("Invalid Address 123", "Jardín", Some("ANT"), None).await;
        assert!(!result.success);
        assert_eq!(result.accuracy_tag, AccuracyTag::ParseFailed);
    }

    #[tokio::test]
    async fn scenario_6_empty_store_is_no_street_match() {
        let service = GeocodingService::new(Arc::new(MemoryAddressStore::new()));
        let result = service.geocode("KR 43 # 75", "Jardín", Some("ANT"), None).await;
        assert_eq!(result.accuracy_tag, AccuracyTag::NoStreetMatch);
    }

    #[tokio::test]
    async fn single_candidate_nearest_fallback_is_range_match() {
        let store = MemoryAddressStore::new();
        store.seed(NewAddress {
            street: Some("KR 43".to_string()),
            city: Some("Jardín".to_string()),
            region: Some("ANT".to_string()),
            number: Some("50".to_string()),
            latitude: Some(dec(5.5900)),
            longitude: Some(dec(-75.8200)),
            ..Default::default()
        });
        let service = GeocodingService::new(Arc::new(store));
        let result = service.geocode("KR 43 # 999", "Jardín", Some("ANT"), None).await;
        assert!(result.success);
        assert_eq!(result.accuracy_tag, AccuracyTag::RangeMatch);
        assert!(result.side.is_some());
    }

    #[tokio::test]
    async fn clamped_interpolation_is_downgraded_to_range_match() {
        let service = GeocodingService::new(Arc::new(seed_default_store()));
        let result = service.geocode("KR 43 # 500", "Jardín", Some("ANT"), None).await;
        assert!(result.success);
        assert_eq!(result.accuracy_tag, AccuracyTag::RangeMatch);
    }

    #[tokio::test]
    async fn fallbacks_disabled_flag_leaves_earlier_stages_unaffected() {
        let service = GeocodingService::with_fallbacks_disabled(Arc::new(MemoryAddressStore::new()));
        let result = service.geocode("KR 43 # 75", "Jardín", Some("ANT"), None).await;
        assert_eq!(result.accuracy_tag, AccuracyTag::NoStreetMatch);
    }

    #[tokio::test]
    async fn geocode_many_preserves_order_and_does_not_short_circuit() {
        let service = GeocodingService::new(Arc::new(seed_default_store()));
        let requests = vec![
            GeocodeRequest::new("KR 43 # 75", "Jardín"),
            GeocodeRequest::new("Invalid Address 123", "Jardín"),
            GeocodeRequest::new("KR 43 # 74", "Jardín"),
        ];
        let results = service.geocode_many(&requests).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].accuracy_tag, AccuracyTag::Interpolated);
        assert_eq!(results[1].accuracy_tag, AccuracyTag::ParseFailed);
        assert_eq!(results[2].accuracy_tag, AccuracyTag::Interpolated);
    }
}
