//! Search query types.
//!
//! `SearchQuery` is an immutable value object describing one search; the
//! enumerated option sets are closed variant types with the service's stable
//! wire encodings (string values, or integer codes for sort orders). The
//! pagination cursor is never part of the query — it is threaded as a
//! separate request parameter by the client.

use std::fmt;

/// Where a search is anchored.
///
/// The wire encoding is `KIND^value`. Station identifiers get a commute
/// precheck in the discovery pass; area-style identifiers do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationId {
    /// A transit station, e.g. `STATION^9491`.
    Station(String),
    /// A named region, e.g. `REGION^87490`.
    Region(String),
    /// A postcode outcode, e.g. `OUTCODE^2317`.
    OutCode(String),
    /// A user-drawn polygon, carried as an already-encoded polyline string.
    UserDefinedArea(String),
}

impl LocationId {
    /// True for transit-station identifiers.
    pub fn is_station(&self) -> bool {
        matches!(self, LocationId::Station(_))
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationId::Station(id) => write!(f, "STATION^{id}"),
            LocationId::Region(id) => write!(f, "REGION^{id}"),
            LocationId::OutCode(id) => write!(f, "OUTCODE^{id}"),
            LocationId::UserDefinedArea(polyline) => {
                write!(f, "USERDEFINEDAREA^{{\"polylines\":\"{polyline}\"}}")
            }
        }
    }
}

/// Sort order for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    LowestPrice,
    HighestPrice,
    NearestFirst,
    MostRecent,
    OldestListed,
}

impl SortOrder {
    /// The service's integer code for this sort order.
    pub fn code(&self) -> u8 {
        match self {
            SortOrder::LowestPrice => 1,
            SortOrder::HighestPrice => 2,
            SortOrder::NearestFirst => 4,
            SortOrder::MostRecent => 6,
            SortOrder::OldestListed => 10,
        }
    }
}

/// Features a listing must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MustHave {
    Garden,
    Parking,
}

impl MustHave {
    pub fn as_str(&self) -> &'static str {
        match self {
            MustHave::Garden => "garden",
            MustHave::Parking => "parking",
        }
    }
}

/// Listing categories to exclude from results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DontShow {
    HouseShare,
    Retirement,
    Student,
}

impl DontShow {
    pub fn as_str(&self) -> &'static str {
        match self {
            DontShow::HouseShare => "houseShare",
            DontShow::Retirement => "retirement",
            DontShow::Student => "student",
        }
    }
}

/// Furnishing states to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FurnishType {
    Furnished,
    PartFurnished,
    Unfurnished,
}

impl FurnishType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FurnishType::Furnished => "furnished",
            FurnishType::PartFurnished => "partFurnished",
            FurnishType::Unfurnished => "unfurnished",
        }
    }
}

/// Property types to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Flat,
    Land,
    ParkHome,
    PrivateHalls,
    Detached,
    SemiDetached,
    Terraced,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Flat => "flat",
            PropertyType::Land => "land",
            PropertyType::ParkHome => "park-home",
            PropertyType::PrivateHalls => "private-halls",
            PropertyType::Detached => "detached",
            PropertyType::SemiDetached => "semi-detached",
            PropertyType::Terraced => "terraced",
        }
    }
}

/// Search channel: rentals or sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Rent,
    Buy,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Rent => "RENT",
            Channel::Buy => "BUY",
        }
    }
}

/// Response shape selector: LIST supports pagination up to 1000 results,
/// MAP is a single bounded response of coordinate pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    List,
    Map,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::List => "LIST",
            ViewType::Map => "MAP",
        }
    }
}

/// Parameters for one listing search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub location: LocationId,
    pub min_bedrooms: u32,
    pub max_bedrooms: u32,
    pub min_price: i64,
    pub max_price: Option<i64>,
    pub min_bathrooms: u32,
    pub max_bathrooms: u32,
    /// Results per page; the service accepts 1..=25.
    pub per_page: u32,
    /// Search radius in miles; 0 restricts to the location itself.
    pub radius_miles: f64,
    pub sort: SortOrder,
    pub must_have: Vec<MustHave>,
    pub dont_show: Vec<DontShow>,
    pub furnish_types: Vec<FurnishType>,
    pub property_types: Vec<PropertyType>,
    pub include_let_agreed: bool,
    pub max_days_since_added: Option<u32>,
    pub channel: Channel,
}

impl SearchQuery {
    /// A query with the service defaults for the given location.
    pub fn new(location: LocationId) -> Self {
        Self {
            location,
            min_bedrooms: 1,
            max_bedrooms: 10,
            min_price: 0,
            max_price: None,
            min_bathrooms: 1,
            max_bathrooms: 5,
            per_page: 24,
            radius_miles: 0.0,
            sort: SortOrder::NearestFirst,
            must_have: Vec::new(),
            dont_show: vec![DontShow::HouseShare, DontShow::Retirement, DontShow::Student],
            furnish_types: vec![
                FurnishType::Furnished,
                FurnishType::PartFurnished,
                FurnishType::Unfurnished,
            ],
            property_types: vec![
                PropertyType::Flat,
                PropertyType::Detached,
                PropertyType::SemiDetached,
                PropertyType::Terraced,
            ],
            include_let_agreed: false,
            max_days_since_added: None,
            channel: Channel::Rent,
        }
    }

    /// Encode the query as request parameters for the given view.
    ///
    /// `index` is the pagination cursor taken from the previous response;
    /// `None` requests the first page. Zero/empty bounds are omitted, as the
    /// service treats an absent parameter as "no constraint".
    pub(crate) fn params(&self, view: ViewType, index: Option<u32>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("locationIdentifier", self.location.to_string()),
            ("numberOfPropertiesPerPage", self.per_page.to_string()),
            ("radius", self.radius_miles.to_string()),
            ("sortType", self.sort.code().to_string()),
            ("includeLetAgreed", self.include_let_agreed.to_string()),
            ("viewType", view.as_str().to_string()),
            ("channel", self.channel.as_str().to_string()),
            ("areaSizeUnit", "sqm".to_string()),
            ("currencyCode", "GBP".to_string()),
            ("isFetching", "true".to_string()),
        ];
        if self.min_price > 0 {
            params.push(("minPrice", self.min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            params.push(("maxPrice", max_price.to_string()));
        }
        if !self.dont_show.is_empty() {
            params.push(("dontShow", comma_joined(&self.dont_show, DontShow::as_str)));
        }
        if !self.furnish_types.is_empty() {
            params.push((
                "furnishTypes",
                comma_joined(&self.furnish_types, FurnishType::as_str),
            ));
        }
        if !self.must_have.is_empty() {
            params.push(("mustHave", comma_joined(&self.must_have, MustHave::as_str)));
        }
        if !self.property_types.is_empty() {
            params.push((
                "propertyTypes",
                comma_joined(&self.property_types, PropertyType::as_str),
            ));
        }
        if self.include_let_agreed {
            params.push(("_includeLetAgreed", "on".to_string()));
        }
        if let Some(days) = self.max_days_since_added {
            params.push(("maxDaysSinceAdded", days.to_string()));
        }
        if self.min_bedrooms > 0 {
            params.push(("minBedrooms", self.min_bedrooms.to_string()));
        }
        if self.max_bedrooms > 0 {
            params.push(("maxBedrooms", self.max_bedrooms.to_string()));
        }
        if self.min_bathrooms > 0 {
            params.push(("minBathrooms", self.min_bathrooms.to_string()));
        }
        if self.max_bathrooms > 0 {
            params.push(("maxBathrooms", self.max_bathrooms.to_string()));
        }
        if let Some(index) = index {
            params.push(("index", index.to_string()));
        }
        params
    }
}

fn comma_joined<T: Copy>(items: &[T], as_str: impl Fn(&T) -> &'static str) -> String {
    items
        .iter()
        .map(|item| as_str(item))
        .collect::<Vec<_>>()
        .join(",")
}
