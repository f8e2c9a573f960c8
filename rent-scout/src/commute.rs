//! Commute feasibility evaluation.
//!
//! Decides whether an origin can reach every required destination before a
//! deadline. The deadline is "the next working day at a fixed clock time";
//! per destination, the candidate journey departing closest to the deadline
//! is judged and must leave no earlier than the allowed travel time before
//! it.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};

use crate::domain::Coordinate;
use crate::journeys::{JourneyError, JourneySource, Origin};

/// A named destination that must be reachable.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub name: String,
    pub coordinate: Coordinate,
}

impl Destination {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}

/// The commute requirements a location must satisfy.
#[derive(Debug, Clone)]
pub struct CommuteCheck {
    /// Destinations, checked in declared order.
    pub destinations: Vec<Destination>,
    /// Maximum acceptable gap between a journey's departure and the
    /// deadline.
    pub max_travel: Duration,
}

impl CommuteCheck {
    pub fn new(destinations: Vec<Destination>, max_travel: Duration) -> Self {
        Self {
            destinations,
            max_travel,
        }
    }

    /// True when every destination is reachable in time from `origin`.
    ///
    /// Destinations are checked in declared order and the first failure
    /// short-circuits — later destinations are not queried. A destination
    /// with zero candidate journeys is unreachable. Otherwise the candidate
    /// whose departure sits closest to the deadline is judged: its slack
    /// (deadline minus departure) must not exceed `max_travel`.
    pub async fn is_feasible<J: JourneySource>(
        &self,
        journeys: &J,
        origin: &Origin,
        deadline: DateTime<Utc>,
    ) -> Result<bool, JourneyError> {
        for destination in &self.destinations {
            let options = journeys
                .journeys(origin, destination.coordinate, Some(deadline))
                .await?;
            tracing::debug!(
                destination = %destination.name,
                options = options.len(),
                "fetched journey options"
            );

            let Some(best) = options
                .iter()
                .min_by_key(|journey| journey.departure_distance(deadline))
            else {
                tracing::info!(destination = %destination.name, "no journey, unreachable");
                return Ok(false);
            };

            let slack = best.slack_before(deadline);
            if slack > self.max_travel {
                tracing::info!(
                    destination = %destination.name,
                    slack_minutes = slack.num_minutes(),
                    "unacceptable journey"
                );
                return Ok(false);
            }

            tracing::info!(
                destination = %destination.name,
                mode = %best.mode,
                route = %best.route,
                slack_minutes = slack.num_minutes(),
                "acceptable journey"
            );
        }
        Ok(true)
    }
}

/// The next instant at `at` o'clock on the next working day after `now`.
///
/// If tomorrow is a weekend day, advances one day at a time until a weekday
/// is reached. The timezone travels with `now`; there is no process-wide
/// default.
pub fn next_weekday_at<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let mut day = now.date_naive().succ_opt().expect("date overflow");
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day = day.succ_opt().expect("date overflow");
    }
    now.timezone()
        .from_local_datetime(&day.and_time(at))
        .earliest()
        .expect("deadline clock time does not exist in this timezone")
}
