//! The incremental search orchestration.
//!
//! Each "find stores near here" request is reduced to the ground not yet
//! covered by any previous request, and only that remainder is sent to the
//! POI provider. The requested box is recorded in the ledger up front, before
//! the provider calls — a failed call therefore still counts as searched,
//! which bounds retries and guarantees forward progress at the cost of
//! possibly missing that box's POIs until a wider search covers it again.

use sqlx::PgPool;
use thiserror::Error;

use punchmap_db::NewStore;
use punchmap_overpass::{extract_candidates, OverpassClient};

use crate::boxmath::{bounding_square, subtract, Rectangle};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("radius must be positive")]
    InvalidRadius,

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// What one discovery pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// Remainder boxes sent to the provider (zero when fully covered).
    pub boxes_queried: usize,
    /// Remainder boxes whose provider call failed and was skipped.
    pub boxes_failed: usize,
    /// Raw elements returned across all boxes, before filtering.
    pub pois_found: usize,
    /// New store rows actually inserted (dedup skips the rest).
    pub stores_added: usize,
}

/// Search for stores around a center point, ingesting anything new.
///
/// Computes the bounding square, subtracts every previously-searched box,
/// records the full requested box in the ledger, then queries the provider
/// for each remainder sequentially — remainder counts are small (typically
/// 0–4), and the provider prefers unhurried clients.
///
/// Provider failures are absorbed per box: the box is logged and counted in
/// [`DiscoveryStats::boxes_failed`], and the remaining boxes still run.
///
/// # Errors
///
/// - [`SearchError::InvalidRadius`] if `radius_km` is not positive.
/// - [`SearchError::Db`] if the ledger or catalog cannot be read or written.
pub async fn discover(
    pool: &PgPool,
    provider: &OverpassClient,
    center_lat: f64,
    center_lng: f64,
    radius_km: f64,
) -> Result<DiscoveryStats, SearchError> {
    let target = bounding_square(center_lat, center_lng, radius_km)
        .ok_or(SearchError::InvalidRadius)?;

    let covered: Vec<Rectangle> = punchmap_db::list_search_areas(pool)
        .await?
        .into_iter()
        .map(|row| Rectangle::new(row.min_lat, row.min_lng, row.max_lat, row.max_lng))
        .collect();

    let remainders = subtract(&covered, target);

    // Record the FULL requested box, not the remainders, so future searches
    // subtract against the complete historical footprint.
    punchmap_db::insert_search_area(
        pool,
        target.min_lat,
        target.min_lng,
        target.max_lat,
        target.max_lng,
    )
    .await?;

    tracing::info!(
        center_lat,
        center_lng,
        radius_km,
        previously_covered = covered.len(),
        remainder_boxes = remainders.len(),
        "discovery: searching uncovered remainder"
    );

    let mut stats = DiscoveryStats::default();

    for remainder in &remainders {
        stats.boxes_queried += 1;

        let response = match provider
            .query_box(
                remainder.min_lat,
                remainder.min_lng,
                remainder.max_lat,
                remainder.max_lng,
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                // The box stays recorded as searched; see the module doc for
                // why this failure is not retried.
                tracing::warn!(
                    min_lat = remainder.min_lat,
                    min_lng = remainder.min_lng,
                    max_lat = remainder.max_lat,
                    max_lng = remainder.max_lng,
                    error = %e,
                    "discovery: provider query failed, skipping box"
                );
                stats.boxes_failed += 1;
                continue;
            }
        };

        stats.pois_found += response.elements.len();

        for candidate in extract_candidates(&response) {
            let inserted = punchmap_db::insert_store_if_absent(
                pool,
                &NewStore {
                    name: candidate.name,
                    address: Some(candidate.address),
                    latitude: Some(candidate.latitude),
                    longitude: Some(candidate.longitude),
                },
            )
            .await?;

            if inserted {
                stats.stores_added += 1;
            }
        }
    }

    tracing::info!(
        boxes_queried = stats.boxes_queried,
        boxes_failed = stats.boxes_failed,
        pois_found = stats.pois_found,
        stores_added = stats.stores_added,
        "discovery: pass complete"
    );

    Ok(stats)
}
