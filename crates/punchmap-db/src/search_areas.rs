//! The append-only ledger of every bounding box ever searched.
//!
//! Rows are written once per search request and never updated or deleted;
//! together they describe the ground already covered, so each new request
//! only queries the provider for the uncovered remainder.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// A row from the `search_areas` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchAreaRow {
    pub id: i64,
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
    pub searched_at: DateTime<Utc>,
}

/// Load every searched bounding box, oldest first.
///
/// The full set is needed on each search request; the table grows by one row
/// per request, so this stays small relative to the store catalog.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_search_areas(pool: &PgPool) -> Result<Vec<SearchAreaRow>, sqlx::Error> {
    sqlx::query_as::<_, SearchAreaRow>(
        "SELECT id, min_lat, min_lng, max_lat, max_lng, searched_at \
         FROM search_areas \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

/// Record a searched bounding box. Returns the new row id.
///
/// The caller passes the FULL requested box, not the remainder fragments, so
/// future subtractions run against the complete historical footprint.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the insert fails.
pub async fn insert_search_area(
    pool: &PgPool,
    min_lat: f64,
    min_lng: f64,
    max_lat: f64,
    max_lng: f64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO search_areas (min_lat, min_lng, max_lat, max_lng) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(min_lat)
    .bind(min_lng)
    .bind(max_lat)
    .bind(max_lng)
    .fetch_one(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time smoke test: confirm that [`SearchAreaRow`] has all expected
    /// fields with the correct types. No database required.
    #[test]
    fn search_area_row_has_expected_fields() {
        let row = SearchAreaRow {
            id: 1_i64,
            min_lat: -1.0,
            min_lng: -1.0,
            max_lat: 1.0,
            max_lng: 1.0,
            searched_at: Utc::now(),
        };

        assert_eq!(row.id, 1);
        assert!(row.min_lat < row.max_lat);
        assert!(row.min_lng < row.max_lng);
    }
}
