//! Pipeline services: street search (E), segment matching (F), position
//! interpolation (G), coordinate generation (H), and the orchestrator (I).

pub mod address_search_service;
pub mod coordinate_generator;
pub mod geocoding_service;
pub mod position_interpolator;
pub mod segment_matcher;

pub use address_search_service::AddressSearchService;
pub use geocoding_service::{GeocodeRequest, GeocodingService};
