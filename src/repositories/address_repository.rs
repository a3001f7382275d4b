//! Address store (component B, §3.1, §4.2): keyed upsert by fingerprint
//! plus the named lookups §4.2 requires cheap access to.
//!
//! [`AddressStore`] is the contract; [`PgAddressStore`] is the only
//! production implementation (backed by `sqlx::PgPool`); [`MemoryAddressStore`]
//! is an in-memory test double used by the pipeline's unit and
//! integration tests so they don't need a live Postgres instance.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::address::blank_to_none;
use crate::models::{Address, NewAddress};
use crate::utils::errors::AppError;

/// The address-store contract consumed by the rest of the pipeline.
///
/// Every method may suspend (§5: "search, centroid fetch, and any
/// ingester batch write" are the pipeline's only suspension points).
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Insert-or-update keyed on `fingerprint`, updating every value
    /// column on conflict (§4.8). When `fingerprint` is absent the row
    /// is always inserted fresh — there is no key to conflict on.
    async fn upsert(&self, new: NewAddress) -> Result<Address, AppError>;

    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<Address>, AppError>;
    async fn find_by_city(&self, city: &str) -> Result<Vec<Address>, AppError>;
    async fn find_by_street(&self, street: &str) -> Result<Vec<Address>, AppError>;
    async fn find_by_region(&self, region: &str) -> Result<Vec<Address>, AppError>;
    async fn find_by_city_street_number(
        &self,
        city: &str,
        street: &str,
        number: &str,
    ) -> Result<Vec<Address>, AppError>;
    async fn find_by_coordinates(
        &self,
        longitude: Decimal,
        latitude: Decimal,
    ) -> Result<Vec<Address>, AppError>;

    /// Tier 1 of the street searcher (§4.3): exact `city`/`street`/`region`
    /// match, coordinates present, ordered by `number` ascending
    /// (lexicographically — the index's natural order; callers re-sort
    /// numerically), capped at `limit`.
    async fn search_street_exact(
        &self,
        street: &str,
        city: &str,
        region: &str,
        limit: i64,
    ) -> Result<Vec<Address>, AppError>;

    /// Tier 2 of the street searcher (§4.3): `street ILIKE "%{pattern}%"`.
    /// `escaped_pattern` must already have `%`/`_` escaped by the caller
    /// (§9, Design Notes: sanitize before this reaches SQL).
    async fn search_street_fuzzy(
        &self,
        escaped_pattern: &str,
        city: &str,
        region: &str,
        limit: i64,
    ) -> Result<Vec<Address>, AppError>;

    /// Upserts every row in `batch` as a single transaction (§4.8): either
    /// the whole batch lands or none of it does. Returns the row count
    /// written. Used by the ingester (component C) so a single bad row
    /// doesn't half-commit a batch.
    async fn upsert_batch(&self, batch: Vec<NewAddress>) -> Result<usize, AppError>;
}

/// Postgres-backed [`AddressStore`].
pub struct PgAddressStore {
    pool: PgPool,
}

impl PgAddressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressStore for PgAddressStore {
    async fn upsert(&self, new: NewAddress) -> Result<Address, AppError> {
        let number = blank_to_none(new.number);
        let street = blank_to_none(new.street);
        let unit = blank_to_none(new.unit);
        let city = blank_to_none(new.city);
        let district = blank_to_none(new.district);
        let region = blank_to_none(new.region);
        let postcode = blank_to_none(new.postcode);
        let external_id = blank_to_none(new.external_id);
        let accuracy = blank_to_none(new.accuracy);
        let fingerprint = blank_to_none(new.fingerprint);

        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses
                (fingerprint, number, street, unit, city, district, region,
                 postcode, external_id, accuracy, longitude, latitude,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, now(), now())
            ON CONFLICT (fingerprint) DO UPDATE SET
                number = excluded.number,
                street = excluded.street,
                unit = excluded.unit,
                city = excluded.city,
                district = excluded.district,
                region = excluded.region,
                postcode = excluded.postcode,
                external_id = excluded.external_id,
                accuracy = excluded.accuracy,
                longitude = excluded.longitude,
                latitude = excluded.latitude,
                updated_at = now()
            RETURNING id, fingerprint, number, street, unit, city, district, region,
                      postcode, external_id, accuracy, longitude, latitude,
                      created_at, updated_at
            "#,
        )
        .bind(fingerprint)
        .bind(number)
        .bind(street)
        .bind(unit)
        .bind(city)
        .bind(district)
        .bind(region)
        .bind(postcode)
        .bind(external_id)
        .bind(accuracy)
        .bind(new.longitude)
        .bind(new.latitude)
        .fetch_one(&self.pool)
        .await?;

        Ok(address)
    }

    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<Address>, AppError> {
        let address =
            sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE fingerprint = $1")
                .bind(fingerprint)
                .fetch_optional(&self.pool)
                .await?;
        Ok(address)
    }

    async fn find_by_city(&self, city: &str) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE city = $1")
            .bind(city)
            .fetch_all(&self.pool)
            .await?;
        Ok(addresses)
    }

    async fn find_by_street(&self, street: &str) -> Result<Vec<Address>, AppError> {
        let addresses =
            sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE street = $1")
                .bind(street)
                .fetch_all(&self.pool)
                .await?;
        Ok(addresses)
    }

    async fn find_by_region(&self, region: &str) -> Result<Vec<Address>, AppError> {
        let addresses =
            sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE region = $1")
                .bind(region)
                .fetch_all(&self.pool)
                .await?;
        Ok(addresses)
    }

    async fn find_by_city_street_number(
        &self,
        city: &str,
        street: &str,
        number: &str,
    ) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE city = $1 AND street = $2 AND number = $3",
        )
        .bind(city)
        .bind(street)
        .bind(number)
        .fetch_all(&self.pool)
        .await?;
        Ok(addresses)
    }

    async fn find_by_coordinates(
        &self,
        longitude: Decimal,
        latitude: Decimal,
    ) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE longitude = $1 AND latitude = $2",
        )
        .bind(longitude)
        .bind(latitude)
        .fetch_all(&self.pool)
        .await?;
        Ok(addresses)
    }

    async fn search_street_exact(
        &self,
        street: &str,
        city: &str,
        region: &str,
        limit: i64,
    ) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>(
            r#"
            SELECT * FROM addresses
            WHERE city = $1 AND street = $2 AND region = $3
              AND longitude IS NOT NULL AND latitude IS NOT NULL
            ORDER BY number
            LIMIT $4
            "#,
        )
        .bind(city)
        .bind(street)
        .bind(region)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(addresses)
    }

    async fn search_street_fuzzy(
        &self,
        escaped_pattern: &str,
        city: &str,
        region: &str,
        limit: i64,
    ) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>(
            r#"
            SELECT * FROM addresses
            WHERE city = $1 AND street ILIKE $2 ESCAPE '\' AND region = $3
              AND longitude IS NOT NULL AND latitude IS NOT NULL
            ORDER BY number
            LIMIT $4
            "#,
        )
        .bind(city)
        .bind(format!("%{}%", escaped_pattern))
        .bind(region)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(addresses)
    }

    async fn upsert_batch(&self, batch: Vec<NewAddress>) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0usize;

        for new in batch {
            let number = blank_to_none(new.number);
            let street = blank_to_none(new.street);
            let unit = blank_to_none(new.unit);
            let city = blank_to_none(new.city);
            let district = blank_to_none(new.district);
            let region = blank_to_none(new.region);
            let postcode = blank_to_none(new.postcode);
            let external_id = blank_to_none(new.external_id);
            let accuracy = blank_to_none(new.accuracy);
            let fingerprint = blank_to_none(new.fingerprint);

            sqlx::query(
                r#"
                INSERT INTO addresses
                    (fingerprint, number, street, unit, city, district, region,
                     postcode, external_id, accuracy, longitude, latitude,
                     created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, now(), now())
                ON CONFLICT (fingerprint) DO UPDATE SET
                    number = excluded.number,
                    street = excluded.street,
                    unit = excluded.unit,
                    city = excluded.city,
                    district = excluded.district,
                    region = excluded.region,
                    postcode = excluded.postcode,
                    external_id = excluded.external_id,
                    accuracy = excluded.accuracy,
                    longitude = excluded.longitude,
                    latitude = excluded.latitude,
                    updated_at = now()
                "#,
            )
            .bind(fingerprint)
            .bind(number)
            .bind(street)
            .bind(unit)
            .bind(city)
            .bind(district)
            .bind(region)
            .bind(postcode)
            .bind(external_id)
            .bind(accuracy)
            .bind(new.longitude)
            .bind(new.latitude)
            .execute(&mut *tx)
            .await?;

            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }
}

/// In-memory [`AddressStore`] test double. Mirrors the Postgres semantics
/// closely enough to exercise the pipeline end to end (§8 scenarios)
/// without a live database.
pub mod memory {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryAddressStore {
        rows: Mutex<Vec<Address>>,
        next_id: Mutex<i64>,
    }

    impl MemoryAddressStore {
        pub fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                next_id: Mutex::new(1),
            }
        }

        /// Test/seed helper: insert a row directly, bypassing upsert
        /// semantics, for building fixtures.
        pub fn seed(&self, new: NewAddress) -> Address {
            let mut id_guard = self.next_id.lock().unwrap();
            let id = *id_guard;
            *id_guard += 1;
            let now = Utc::now();
            let address = Address {
                id,
                fingerprint: blank_to_none(new.fingerprint),
                number: blank_to_none(new.number),
                street: blank_to_none(new.street),
                unit: blank_to_none(new.unit),
                city: blank_to_none(new.city),
                district: blank_to_none(new.district),
                region: blank_to_none(new.region),
                postcode: blank_to_none(new.postcode),
                external_id: blank_to_none(new.external_id),
                accuracy: blank_to_none(new.accuracy),
                longitude: new.longitude,
                latitude: new.latitude,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(address.clone());
            address
        }
    }

    #[async_trait]
    impl AddressStore for MemoryAddressStore {
        async fn upsert(&self, new: NewAddress) -> Result<Address, AppError> {
            let fingerprint = blank_to_none(new.fingerprint.clone());
            if let Some(fp) = &fingerprint {
                let mut rows = self.rows.lock().unwrap();
                if let Some(existing) = rows.iter_mut().find(|r| r.fingerprint.as_deref() == Some(fp.as_str())) {
                    existing.number = blank_to_none(new.number);
                    existing.street = blank_to_none(new.street);
                    existing.unit = blank_to_none(new.unit);
                    existing.city = blank_to_none(new.city);
                    existing.district = blank_to_none(new.district);
                    existing.region = blank_to_none(new.region);
                    existing.postcode = blank_to_none(new.postcode);
                    existing.external_id = blank_to_none(new.external_id);
                    existing.accuracy = blank_to_none(new.accuracy);
                    existing.longitude = new.longitude;
                    existing.latitude = new.latitude;
                    existing.updated_at = Utc::now();
                    return Ok(existing.clone());
                }
            }
            Ok(self.seed(new))
        }

        async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<Address>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.fingerprint.as_deref() == Some(fingerprint))
                .cloned())
        }

        async fn find_by_city(&self, city: &str) -> Result<Vec<Address>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.city.as_deref() == Some(city))
                .cloned()
                .collect())
        }

        async fn find_by_street(&self, street: &str) -> Result<Vec<Address>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.street.as_deref() == Some(street))
                .cloned()
                .collect())
        }

        async fn find_by_region(&self, region: &str) -> Result<Vec<Address>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.region.as_deref() == Some(region))
                .cloned()
                .collect())
        }

        async fn find_by_city_street_number(
            &self,
            city: &str,
            street: &str,
            number: &str,
        ) -> Result<Vec<Address>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.city.as_deref() == Some(city)
                        && r.street.as_deref() == Some(street)
                        && r.number.as_deref() == Some(number)
                })
                .cloned()
                .collect())
        }

        async fn find_by_coordinates(
            &self,
            longitude: Decimal,
            latitude: Decimal,
        ) -> Result<Vec<Address>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.longitude == Some(longitude) && r.latitude == Some(latitude))
                .cloned()
                .collect())
        }

        async fn search_street_exact(
            &self,
            street: &str,
            city: &str,
            region: &str,
            limit: i64,
        ) -> Result<Vec<Address>, AppError> {
            let mut matches: Vec<Address> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.city.as_deref() == Some(city)
                        && r.street.as_deref() == Some(street)
                        && r.region.as_deref() == Some(region)
                        && r.longitude.is_some()
                        && r.latitude.is_some()
                })
                .cloned()
                .collect();
            matches.sort_by(|a, b| a.number.cmp(&b.number));
            matches.truncate(limit as usize);
            Ok(matches)
        }

        async fn search_street_fuzzy(
            &self,
            escaped_pattern: &str,
            city: &str,
            region: &str,
            limit: i64,
        ) -> Result<Vec<Address>, AppError> {
            let needle = escaped_pattern.replace("\\%", "%").replace("\\_", "_").to_uppercase();
            let mut matches: Vec<Address> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.city.as_deref() == Some(city)
                        && r.region.as_deref() == Some(region)
                        && r.longitude.is_some()
                        && r.latitude.is_some()
                        && r
                            .street
                            .as_deref()
                            .map(|s| s.to_uppercase().contains(&needle))
                            .unwrap_or(false)
                })
                .cloned()
                .collect();
            matches.sort_by(|a, b| a.number.cmp(&b.number));
            matches.truncate(limit as usize);
            Ok(matches)
        }

        async fn upsert_batch(&self, batch: Vec<NewAddress>) -> Result<usize, AppError> {
            let mut written = 0usize;
            for new in batch {
                self.upsert(new).await?;
                written += 1;
            }
            Ok(written)
        }
    }
}

pub use memory::MemoryAddressStore;
