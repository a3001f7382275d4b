//! Street-address geocoder for Colombian addresses.
//!
//! The public surface is [`services::GeocodingService`] (parse → search →
//! match → interpolate → generate → offset) and [`ingest::GeoJsonIngester`]
//! (bulk reference-address loading). Everything else is implementation
//! detail reachable through these two entry points and the
//! [`repositories::AddressStore`] trait a caller supplies.

pub mod config;
pub mod database;
pub mod geo;
pub mod ingest;
pub mod models;
pub mod parser;
pub mod repositories;
pub mod services;
pub mod utils;

pub use config::Config;
pub use ingest::{GeoJsonIngester, IngestOptions, IngestStats};
pub use models::{AccuracyTag, Address, GeocodingResult, NewAddress, Side};
pub use repositories::{AddressStore, MemoryAddressStore, PgAddressStore};
pub use services::{GeocodeRequest, GeocodingService};
pub use utils::errors::AppError;
