//! Geographic coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair.
///
/// Both remote services accept coordinates as `"lat,lon"` decimal strings,
/// which is exactly what `Display` produces.
///
/// # Examples
///
/// ```
/// use rent_scout::domain::Coordinate;
///
/// let here = Coordinate::new(51.5033, -0.1196);
/// assert_eq!(here.to_string(), "51.5033,-0.1196");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
