//! Listing service client.
//!
//! Search (paginated LIST view and one-shot MAP view), typeahead location
//! lookup, and fetch-by-ids against the remote listing service.

mod client;
mod error;
mod query;
mod types;

pub use client::{
    BY_IDS_CAP, LIST_RESULT_CAP, LOOKUP_LIMIT, ListingClient, ListingConfig, ListingSource,
    MAP_RESULT_CAP, detail_url,
};
pub use error::ListingError;
pub use query::{
    Channel, DontShow, FurnishType, LocationId, MustHave, PropertyType, SearchQuery, SortOrder,
    ViewType,
};
pub use types::{ListingPin, LocationMatch};
