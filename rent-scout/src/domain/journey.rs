//! Journey type.

use chrono::{DateTime, Duration, Utc};

use super::Mode;

/// One candidate journey between an origin and a destination.
///
/// Derived from a single raw routing-service journey record: the primary
/// mode is ranked across the journey's legs (rail-like beats bus beats
/// walking) and the route label joins the legs' route names, falling back to
/// `"walking"` for an all-walking journey.
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    /// Total journey time as reported by the service.
    pub duration: Duration,
    /// Departure instant.
    pub departure: DateTime<Utc>,
    /// Arrival instant.
    pub arrival: DateTime<Utc>,
    /// Primary transport mode across the journey's legs.
    pub mode: Mode,
    /// Human-readable route label, e.g. `"Victoria->68"`.
    pub route: String,
}

impl Journey {
    /// Absolute distance between this journey's departure and a deadline.
    ///
    /// Used to pick the candidate whose departure sits closest to the
    /// deadline out of many returned options.
    pub fn departure_distance(&self, deadline: DateTime<Utc>) -> Duration {
        (deadline - self.departure).abs()
    }

    /// Margin between departing on this journey and the deadline.
    ///
    /// Positive when the journey departs before the deadline; this is the
    /// time a traveller must budget to arrive on time.
    pub fn slack_before(&self, deadline: DateTime<Utc>) -> Duration {
        deadline - self.departure
    }
}
