//! Enrichment lifecycle states for catalog stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a store sits in the enrichment lifecycle.
///
/// `Unchanged` is the only state the background worker selects from. The
/// other four are terminal for the worker; `backfill` is the one sanctioned
/// path back to `Unchanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    Unchanged,
    Geocoded,
    ReverseGeocoded,
    AddressCompleted,
    Failed,
}

impl EnrichmentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EnrichmentStatus::Unchanged => "unchanged",
            EnrichmentStatus::Geocoded => "geocoded",
            EnrichmentStatus::ReverseGeocoded => "reverse_geocoded",
            EnrichmentStatus::AddressCompleted => "address_completed",
            EnrichmentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for EnrichmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("invalid enrichment status: {0}")]
pub struct InvalidEnrichmentStatus(String);

impl FromStr for EnrichmentStatus {
    type Err = InvalidEnrichmentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unchanged" => Ok(EnrichmentStatus::Unchanged),
            "geocoded" => Ok(EnrichmentStatus::Geocoded),
            "reverse_geocoded" => Ok(EnrichmentStatus::ReverseGeocoded),
            "address_completed" => Ok(EnrichmentStatus::AddressCompleted),
            "failed" => Ok(EnrichmentStatus::Failed),
            other => Err(InvalidEnrichmentStatus(other.to_string())),
        }
    }
}
