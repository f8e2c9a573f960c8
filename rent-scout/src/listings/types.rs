//! Wire DTOs for the listing service.
//!
//! Raw response shapes, decoded with serde and immediately converted into
//! domain types. Nothing outside the client layer sees these.

use serde::Deserialize;

use crate::domain::{Coordinate, Frequency, Listing, Price};

use super::error::ListingError;

/// One page of LIST-view search results.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchPage {
    pub properties: Vec<PropertyDto>,
    /// Total match count; a string with thousands separators.
    pub result_count: String,
    #[serde(default)]
    pub pagination: Option<PaginationDto>,
}

/// Pagination block of a LIST-view response. MAP-view responses never carry
/// one.
#[derive(Debug, Deserialize)]
pub(crate) struct PaginationDto {
    #[serde(default)]
    pub next: Option<String>,
}

/// A MAP-view response: coordinate pins only, single page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MapPage {
    pub properties: Vec<PinDto>,
    pub result_count: String,
}

/// A by-ids response: same per-listing shape as search, no count.
#[derive(Debug, Deserialize)]
pub(crate) struct ByIdsPage {
    pub properties: Vec<PropertyDto>,
}

/// A typeahead lookup response.
#[derive(Debug, Deserialize)]
pub(crate) struct LookupPage {
    #[serde(default)]
    pub matches: Vec<LocationMatch>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PropertyDto {
    pub id: u64,
    pub display_address: String,
    #[serde(default)]
    pub price: Option<PriceDto>,
    pub location: PointDto,
    #[serde(default)]
    pub property_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PriceDto {
    pub amount: i64,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct PointDto {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PinDto {
    pub id: u64,
    pub location: PointDto,
}

/// One matched location from the typeahead lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMatch {
    /// Location identifier in wire form, e.g. `STATION^9491`.
    pub id: String,
    pub display_name: String,
}

/// A coordinate-only listing pin from the MAP view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingPin {
    pub id: u64,
    pub location: Coordinate,
}

impl From<PropertyDto> for Listing {
    fn from(dto: PropertyDto) -> Self {
        Listing {
            id: dto.id,
            display_address: dto.display_address,
            price: dto.price.map(|price| Price {
                amount: price.amount,
                frequency: price.frequency,
            }),
            location: Coordinate::new(dto.location.latitude, dto.location.longitude),
            detail_path: dto.property_url,
        }
    }
}

impl From<PinDto> for ListingPin {
    fn from(dto: PinDto) -> Self {
        ListingPin {
            id: dto.id,
            location: Coordinate::new(dto.location.latitude, dto.location.longitude),
        }
    }
}

/// Parse the service's `resultCount` field, e.g. `"1,204"`.
pub(crate) fn parse_result_count(raw: &str) -> Result<u32, ListingError> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    digits.trim().parse().map_err(|_| ListingError::Json {
        message: format!("unparseable resultCount: {raw:?}"),
    })
}
