//! Listing types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Recurrence of an advertised rental price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

/// The advertised price of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: i64,
    pub frequency: Frequency,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.frequency)
    }
}

/// One rental listing, decoded from a search response.
///
/// The id is stable across fetches and is the key under which a listing is
/// recorded in the dedup cache. A missing price means the listing is skipped
/// by the commute check (but still recorded); a missing `detail_path` means
/// the listing has no detail page to open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub display_address: String,
    pub price: Option<Price>,
    pub location: Coordinate,
    pub detail_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            id: 131_405_182,
            display_address: "Baker Street, Marylebone, NW1".to_string(),
            price: Some(Price {
                amount: 1850,
                frequency: Frequency::Monthly,
            }),
            location: Coordinate::new(51.5226, -0.1571),
            detail_path: Some("/properties/131405182".to_string()),
        }
    }

    #[test]
    fn frequency_wire_strings() {
        assert_eq!(
            serde_json::to_string(&Frequency::Monthly).unwrap(),
            "\"monthly\""
        );
        let parsed: Frequency = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(parsed, Frequency::Weekly);
    }

    #[test]
    fn price_display() {
        let price = Price {
            amount: 425,
            frequency: Frequency::Weekly,
        };
        assert_eq!(price.to_string(), "425 weekly");
    }

    #[test]
    fn listing_serde_roundtrip() {
        let original = listing();
        let json = serde_json::to_string(&original).unwrap();
        let back: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn listing_without_price_roundtrips() {
        let mut l = listing();
        l.price = None;
        l.detail_path = None;
        let json = serde_json::to_string(&l).unwrap();
        let back: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(back.price, None);
        assert_eq!(back.detail_path, None);
    }
}
