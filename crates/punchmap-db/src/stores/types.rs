//! Row types for the `stores` table.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Input record for ingesting a discovered store.
///
/// Ingestion only carries what the POI provider reliably gives us: a name,
/// coordinates, and a best-effort free-text address. The structured `addr_*`
/// columns start NULL and are filled by the enrichment worker.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    /// Free-text address; `"unknown"` is a sentinel for "nothing usable".
    pub address: Option<String>,
    pub addr_housenumber: Option<String>,
    pub addr_street: Option<String>,
    pub addr_city: Option<String>,
    /// 2-letter state/province code, or NULL.
    pub addr_state: Option<String>,
    /// ISO 3166-1 alpha-2 country code, or NULL.
    pub addr_country: Option<String>,
    pub addr_postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub enrichment_status: String,
    pub enrichment_attempted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoreRow {
    /// Both coordinates present.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Any usable address signal: free text that isn't the `"unknown"`
    /// sentinel, or any of street/city/house number.
    #[must_use]
    pub fn has_any_address(&self) -> bool {
        self.address.as_deref().is_some_and(|a| a != "unknown")
            || self.addr_street.is_some()
            || self.addr_city.is_some()
            || self.addr_housenumber.is_some()
    }

    /// Any of the six structured address fields missing.
    #[must_use]
    pub fn address_incomplete(&self) -> bool {
        self.addr_housenumber.is_none()
            || self.addr_street.is_none()
            || self.addr_city.is_none()
            || self.addr_state.is_none()
            || self.addr_postcode.is_none()
            || self.addr_country.is_none()
    }
}

/// Address fields produced by a reverse-geocode lookup, applied to a store
/// either wholesale ([`super::set_address`]) or fill-in-the-blanks
/// ([`super::complete_address`]).
#[derive(Debug, Clone, Default)]
pub struct AddressUpdate {
    pub address: Option<String>,
    pub addr_housenumber: Option<String>,
    pub addr_street: Option<String>,
    pub addr_city: Option<String>,
    pub addr_state: Option<String>,
    pub addr_country: Option<String>,
    pub addr_postcode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_row() -> StoreRow {
        StoreRow {
            id: 1,
            public_id: Uuid::new_v4(),
            name: "Corner Deli".to_string(),
            address: None,
            addr_housenumber: None,
            addr_street: None,
            addr_city: None,
            addr_state: None,
            addr_country: None,
            addr_postcode: None,
            latitude: None,
            longitude: None,
            status: "pending".to_string(),
            enrichment_status: "unchanged".to_string(),
            enrichment_attempted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unknown_sentinel_is_not_an_address() {
        let mut row = bare_row();
        row.address = Some("unknown".to_string());
        assert!(!row.has_any_address());
    }

    #[test]
    fn any_structured_field_counts_as_address() {
        let mut row = bare_row();
        row.addr_city = Some("Trenton".to_string());
        assert!(row.has_any_address());
    }

    #[test]
    fn coordinates_require_both_axes() {
        let mut row = bare_row();
        row.latitude = Some(40.0);
        assert!(!row.has_coordinates());
        row.longitude = Some(-74.0);
        assert!(row.has_coordinates());
    }

    #[test]
    fn complete_address_needs_all_six_fields() {
        let mut row = bare_row();
        row.addr_housenumber = Some("12".to_string());
        row.addr_street = Some("Main St".to_string());
        row.addr_city = Some("Trenton".to_string());
        row.addr_state = Some("NJ".to_string());
        row.addr_country = Some("US".to_string());
        assert!(row.address_incomplete());
        row.addr_postcode = Some("08601".to_string());
        assert!(!row.address_incomplete());
    }
}
