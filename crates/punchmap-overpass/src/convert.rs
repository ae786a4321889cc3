//! Raw elements → ingestible store candidates.

use crate::types::{OverpassElement, OverpassResponse};

/// Sentinel free-text address for elements missing any address part.
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// A POI reduced to what ingestion needs: a name, coordinates, and a
/// best-effort address string.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCandidate {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Keep the usable elements of a response: named, with coordinates.
///
/// The address string is assembled only when every part (house number,
/// street, city, state, postcode) is tagged; anything less gets the
/// `"unknown"` sentinel and is left for the enrichment worker. Unusable
/// elements are skipped silently — the provider is best-effort.
#[must_use]
pub fn extract_candidates(response: &OverpassResponse) -> Vec<StoreCandidate> {
    response
        .elements
        .iter()
        .filter_map(candidate_from_element)
        .collect()
}

fn candidate_from_element(element: &OverpassElement) -> Option<StoreCandidate> {
    let name = element.tags.name.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }
    let (latitude, longitude) = element.coordinates()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }

    Some(StoreCandidate {
        name: name.to_string(),
        address: format_address(element),
        latitude,
        longitude,
    })
}

fn format_address(element: &OverpassElement) -> String {
    let tags = &element.tags;
    match (
        &tags.housenumber,
        &tags.street,
        &tags.city,
        &tags.state,
        &tags.postcode,
    ) {
        (Some(housenumber), Some(street), Some(city), Some(state), Some(postcode)) => {
            format!("{housenumber} {street}, {city}, {state} {postcode}")
        }
        _ => UNKNOWN_ADDRESS.to_string(),
    }
}
