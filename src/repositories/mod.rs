//! Address storage (component B).

pub mod address_repository;

pub use address_repository::{AddressStore, MemoryAddressStore, PgAddressStore};
