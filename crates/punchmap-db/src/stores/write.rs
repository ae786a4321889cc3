//! Write operations for the `stores` table.

use punchmap_core::EnrichmentStatus;
use sqlx::PgPool;

use super::types::{AddressUpdate, NewStore};

/// Insert a store unless one already exists with the same
/// `(name, latitude, longitude)` identity. Returns `true` if a row was
/// inserted, `false` if the identity was already present.
///
/// Ingestion calls this once per candidate; re-ingesting the same POI is a
/// no-op, which is what makes repeated searches over overlapping ground safe.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the insert fails.
pub async fn insert_store_if_absent(pool: &PgPool, store: &NewStore) -> Result<bool, sqlx::Error> {
    let rows_affected = sqlx::query(
        "INSERT INTO stores (name, address, latitude, longitude, status, enrichment_status) \
         VALUES ($1, $2, $3, $4, 'pending', 'unchanged') \
         ON CONFLICT (name, latitude, longitude) DO NOTHING",
    )
    .bind(&store.name)
    .bind(&store.address)
    .bind(store.latitude)
    .bind(store.longitude)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected == 1)
}

/// Write geocoded coordinates and advance the store to `geocoded`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the update fails.
pub async fn set_coordinates(
    pool: &PgPool,
    store_id: i64,
    latitude: f64,
    longitude: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE stores \
         SET latitude = $2, longitude = $3, \
             enrichment_status = $4, enrichment_attempted_at = NOW(), updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(store_id)
    .bind(latitude)
    .bind(longitude)
    .bind(EnrichmentStatus::Geocoded.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Write a full reverse-geocoded address and advance the store to
/// `reverse_geocoded`.
///
/// This is the "address completely absent" path, so every address column is
/// overwritten with what the geocoder returned (including NULLs for parts it
/// did not report).
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the update fails.
pub async fn set_address(
    pool: &PgPool,
    store_id: i64,
    update: &AddressUpdate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE stores \
         SET address = $2, addr_housenumber = $3, addr_street = $4, addr_city = $5, \
             addr_state = $6, addr_country = $7, addr_postcode = $8, \
             enrichment_status = $9, enrichment_attempted_at = NOW(), updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(store_id)
    .bind(&update.address)
    .bind(&update.addr_housenumber)
    .bind(&update.addr_street)
    .bind(&update.addr_city)
    .bind(&update.addr_state)
    .bind(&update.addr_country)
    .bind(&update.addr_postcode)
    .bind(EnrichmentStatus::ReverseGeocoded.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Fill only the MISSING address columns and advance the store to
/// `address_completed`.
///
/// Present fields are never overwritten, even when the geocoder disagrees
/// with them; the free-text address is replaced only while it is NULL or the
/// `"unknown"` sentinel. The COALESCE direction matters: the existing column
/// value wins over the incoming one.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the update fails.
pub async fn complete_address(
    pool: &PgPool,
    store_id: i64,
    update: &AddressUpdate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE stores \
         SET address = CASE \
                 WHEN address IS NULL OR address = 'unknown' THEN COALESCE($2, address) \
                 ELSE address \
             END, \
             addr_housenumber = COALESCE(addr_housenumber, $3), \
             addr_street      = COALESCE(addr_street, $4), \
             addr_city        = COALESCE(addr_city, $5), \
             addr_state       = COALESCE(addr_state, $6), \
             addr_country     = COALESCE(addr_country, $7), \
             addr_postcode    = COALESCE(addr_postcode, $8), \
             enrichment_status = $9, enrichment_attempted_at = NOW(), updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(store_id)
    .bind(&update.address)
    .bind(&update.addr_housenumber)
    .bind(&update.addr_street)
    .bind(&update.addr_city)
    .bind(&update.addr_state)
    .bind(&update.addr_country)
    .bind(&update.addr_postcode)
    .bind(EnrichmentStatus::AddressCompleted.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Mark a store's enrichment attempt as failed.
///
/// `failed` is terminal for the worker; only the backfill reset brings a
/// store back into rotation.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the update fails.
pub async fn mark_enrichment_failed(pool: &PgPool, store_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE stores \
         SET enrichment_status = $2, enrichment_attempted_at = NOW(), updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(store_id)
    .bind(EnrichmentStatus::Failed.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Reset previously-enriched stores that still lack a state or country code
/// back to `unchanged`, so the background worker re-processes them.
///
/// Targets stores with coordinates whose enrichment predates the
/// name-to-code conversion tables. Returns the number of rows reset. This is
/// the only sanctioned way back into the state machine.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the update fails.
pub async fn reset_enrichment_for_backfill(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let rows_affected = sqlx::query(
        "UPDATE stores \
         SET enrichment_status = 'unchanged', updated_at = NOW() \
         WHERE latitude IS NOT NULL AND longitude IS NOT NULL \
           AND enrichment_status IN ('geocoded', 'reverse_geocoded', 'address_completed') \
           AND (addr_state IS NULL OR addr_country IS NULL)",
    )
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected)
}
