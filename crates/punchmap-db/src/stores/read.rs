//! Read operations for the `stores` table.

use sqlx::PgPool;

use super::types::StoreRow;

const STORE_COLUMNS: &str = "id, public_id, name, address, \
     addr_housenumber, addr_street, addr_city, addr_state, addr_country, addr_postcode, \
     latitude, longitude, status, enrichment_status, enrichment_attempted_at, \
     created_at, updated_at";

/// Pick the next store the enrichment worker should process, or `None` when
/// nothing qualifies.
///
/// Only stores in `enrichment_status = 'unchanged'` are eligible. Three
/// priority classes are probed in order, first match wins:
///
/// 1. has coordinates, address completely absent (reverse geocode);
/// 2. has some address signal, a coordinate missing (forward geocode);
/// 3. has coordinates, any structured address field missing (completion).
///
/// Within a class the lowest id wins, so repeated polls are deterministic.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if a query fails.
pub async fn next_enrichment_candidate(pool: &PgPool) -> Result<Option<StoreRow>, sqlx::Error> {
    let missing_address = sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores \
         WHERE enrichment_status = 'unchanged' \
           AND latitude IS NOT NULL AND longitude IS NOT NULL \
           AND (address IS NULL OR address = 'unknown' \
                OR (addr_city IS NULL AND addr_street IS NULL AND addr_housenumber IS NULL)) \
         ORDER BY id \
         LIMIT 1",
    ))
    .fetch_optional(pool)
    .await?;

    if missing_address.is_some() {
        return Ok(missing_address);
    }

    let missing_coordinates = sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores \
         WHERE enrichment_status = 'unchanged' \
           AND (latitude IS NULL OR longitude IS NULL) \
           AND ((address IS NOT NULL AND address <> 'unknown') \
                OR addr_street IS NOT NULL OR addr_city IS NOT NULL \
                OR addr_housenumber IS NOT NULL) \
         ORDER BY id \
         LIMIT 1",
    ))
    .fetch_optional(pool)
    .await?;

    if missing_coordinates.is_some() {
        return Ok(missing_coordinates);
    }

    sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores \
         WHERE enrichment_status = 'unchanged' \
           AND latitude IS NOT NULL AND longitude IS NOT NULL \
           AND (addr_housenumber IS NULL OR addr_street IS NULL OR addr_city IS NULL \
                OR addr_state IS NULL OR addr_postcode IS NULL OR addr_country IS NULL) \
         ORDER BY id \
         LIMIT 1",
    ))
    .fetch_optional(pool)
    .await
}

/// List stores whose coordinates fall inside the given bounding box,
/// oldest first.
///
/// Serves the "nearby stores" read after a discovery pass; stores without
/// coordinates are excluded by construction.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_stores_in_box(
    pool: &PgPool,
    min_lat: f64,
    min_lng: f64,
    max_lat: f64,
    max_lng: f64,
) -> Result<Vec<StoreRow>, sqlx::Error> {
    sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores \
         WHERE latitude BETWEEN $1 AND $3 \
           AND longitude BETWEEN $2 AND $4 \
         ORDER BY id",
    ))
    .bind(min_lat)
    .bind(min_lng)
    .bind(max_lat)
    .bind(max_lng)
    .fetch_all(pool)
    .await
}
