//! Persistence for the `stores` table: dedup ingestion, enrichment candidate
//! selection, and enrichment state transitions.

mod read;
mod types;
mod write;

pub use read::{list_stores_in_box, next_enrichment_candidate};
pub use types::{AddressUpdate, NewStore, StoreRow};
pub use write::{
    complete_address, insert_store_if_absent, mark_enrichment_failed,
    reset_enrichment_for_backfill, set_address, set_coordinates,
};
