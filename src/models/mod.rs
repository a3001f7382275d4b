//! Data model
//!
//! The stored entity (component B), the in-memory types that flow
//! between pipeline phases (components D/F/G), and the final tagged
//! result (component I) all live here, each in its own module.

pub mod address;
pub mod interpolation;
pub mod parsed;
pub mod result;
pub mod segment;

pub use address::{blank_to_none, Address, NewAddress};
pub use interpolation::{InterpolationResult, Side};
pub use parsed::ParsedAddress;
pub use result::{AccuracyTag, GeocodingResult};
pub use segment::{SegmentPoint, StreetSegment};
