//! One enrichment unit of work: pick a store, call the geocoder, transition.
//!
//! A store in `unchanged` falls into exactly one of three cases — reverse
//! geocode, forward geocode, or address completion — or, when it matches
//! none, is marked `failed` so it cannot be selected forever. Geocoder
//! failures of any kind (no result, timeout, HTTP error, bad payload) end in
//! the same `failed` state; they are logged here and never propagate.

use sqlx::PgPool;

use punchmap_db::{AddressUpdate, StoreRow};
use punchmap_geocode::{AddressParts, GeocodeClient, ResolvedAddress};

/// Which transition applies to a selected store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EnrichmentAction {
    /// Coordinates present, address completely absent.
    ReverseGeocode,
    /// Address present, a coordinate missing.
    Geocode,
    /// Coordinates present, some structured address fields missing.
    CompleteAddress,
    /// None of the above; data-integrity fallback.
    MarkFailed,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TickOutcome {
    /// No store needed enrichment.
    Idle,
    /// One store was processed (successfully or to `failed`).
    Processed,
}

/// Decide which enrichment case a store falls into.
///
/// Mirrors the candidate selection queries; a store those queries return
/// should never reach [`EnrichmentAction::MarkFailed`], but the fallback
/// keeps a surprising row from being re-selected every tick forever.
pub(super) fn classify(store: &StoreRow) -> EnrichmentAction {
    let has_coords = store.has_coordinates();
    let has_address = store.has_any_address();

    if has_coords && !has_address {
        EnrichmentAction::ReverseGeocode
    } else if has_address && !has_coords {
        EnrichmentAction::Geocode
    } else if has_coords && store.address_incomplete() {
        EnrichmentAction::CompleteAddress
    } else {
        EnrichmentAction::MarkFailed
    }
}

/// Select and process at most one store.
///
/// # Errors
///
/// Returns [`sqlx::Error`] only for database failures; geocoder failures are
/// absorbed into the store's `failed` state.
pub(super) async fn process_next_store(
    pool: &PgPool,
    geocoder: &GeocodeClient,
) -> Result<TickOutcome, sqlx::Error> {
    let Some(store) = punchmap_db::next_enrichment_candidate(pool).await? else {
        return Ok(TickOutcome::Idle);
    };

    let action = classify(&store);
    tracing::info!(
        store_id = store.id,
        name = %store.name,
        ?action,
        "enrichment: processing store"
    );

    match action {
        EnrichmentAction::ReverseGeocode => reverse_geocode_store(pool, geocoder, &store).await?,
        EnrichmentAction::Geocode => geocode_store(pool, geocoder, &store).await?,
        EnrichmentAction::CompleteAddress => complete_store_address(pool, geocoder, &store).await?,
        EnrichmentAction::MarkFailed => {
            tracing::warn!(
                store_id = store.id,
                "enrichment: store matches no enrichment case, marking failed"
            );
            punchmap_db::mark_enrichment_failed(pool, store.id).await?;
        }
    }

    Ok(TickOutcome::Processed)
}

/// Forward geocode: address → coordinates, `unchanged` → `geocoded`.
async fn geocode_store(
    pool: &PgPool,
    geocoder: &GeocodeClient,
    store: &StoreRow,
) -> Result<(), sqlx::Error> {
    let parts = address_parts(store);

    match geocoder.geocode(&parts).await {
        Ok(Some(coords)) => {
            punchmap_db::set_coordinates(pool, store.id, coords.latitude, coords.longitude)
                .await?;
            tracing::info!(store_id = store.id, "enrichment: store geocoded");
        }
        Ok(None) => {
            tracing::warn!(store_id = store.id, "enrichment: geocoding found nothing");
            punchmap_db::mark_enrichment_failed(pool, store.id).await?;
        }
        Err(e) => {
            tracing::warn!(store_id = store.id, error = %e, "enrichment: geocoding failed");
            punchmap_db::mark_enrichment_failed(pool, store.id).await?;
        }
    }
    Ok(())
}

/// Reverse geocode: coordinates → full address, `unchanged` → `reverse_geocoded`.
async fn reverse_geocode_store(
    pool: &PgPool,
    geocoder: &GeocodeClient,
    store: &StoreRow,
) -> Result<(), sqlx::Error> {
    match lookup_reverse(geocoder, store).await {
        Some(resolved) => {
            punchmap_db::set_address(pool, store.id, &address_update(resolved)).await?;
            tracing::info!(store_id = store.id, "enrichment: store reverse geocoded");
        }
        None => {
            punchmap_db::mark_enrichment_failed(pool, store.id).await?;
        }
    }
    Ok(())
}

/// Address completion: fill the gaps only, `unchanged` → `address_completed`.
async fn complete_store_address(
    pool: &PgPool,
    geocoder: &GeocodeClient,
    store: &StoreRow,
) -> Result<(), sqlx::Error> {
    match lookup_reverse(geocoder, store).await {
        Some(resolved) => {
            punchmap_db::complete_address(pool, store.id, &address_update(resolved)).await?;
            tracing::info!(store_id = store.id, "enrichment: store address completed");
        }
        None => {
            punchmap_db::mark_enrichment_failed(pool, store.id).await?;
        }
    }
    Ok(())
}

/// Run the reverse lookup, folding every failure mode into `None`.
async fn lookup_reverse(geocoder: &GeocodeClient, store: &StoreRow) -> Option<ResolvedAddress> {
    let (Some(latitude), Some(longitude)) = (store.latitude, store.longitude) else {
        // Selection guarantees coordinates; guard defensively.
        return None;
    };

    match geocoder.reverse(latitude, longitude).await {
        Ok(Some(resolved)) => Some(resolved),
        Ok(None) => {
            tracing::warn!(
                store_id = store.id,
                "enrichment: reverse geocoding found nothing"
            );
            None
        }
        Err(e) => {
            tracing::warn!(
                store_id = store.id,
                error = %e,
                "enrichment: reverse geocoding failed"
            );
            None
        }
    }
}

fn address_parts(store: &StoreRow) -> AddressParts {
    AddressParts {
        housenumber: store.addr_housenumber.clone(),
        street: store.addr_street.clone(),
        city: store.addr_city.clone(),
        state: store.addr_state.clone(),
        postcode: store.addr_postcode.clone(),
        country: store.addr_country.clone(),
    }
}

fn address_update(resolved: ResolvedAddress) -> AddressUpdate {
    AddressUpdate {
        address: Some(resolved.address),
        addr_housenumber: resolved.housenumber,
        addr_street: resolved.street,
        addr_city: resolved.city,
        addr_state: resolved.state,
        addr_country: resolved.country,
        addr_postcode: resolved.postcode,
    }
}
