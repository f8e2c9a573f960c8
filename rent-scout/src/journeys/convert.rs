//! Conversion from journey service DTOs to domain types.
//!
//! Raw journey records carry naive instants, per-leg mode ids and optional
//! route names; this module normalizes them into [`Journey`] values and
//! defines the candidate ordering the rest of the pipeline relies on.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::domain::{Journey, Mode};

use super::error::JourneyError;
use super::types::{JourneyDto, LegDto};

/// Convert one raw journey record.
pub(crate) fn convert_journey(dto: &JourneyDto) -> Result<Journey, JourneyError> {
    let leg_modes: Vec<Mode> = dto
        .legs
        .iter()
        .filter_map(|leg| Mode::parse(&leg.mode.id))
        .collect();

    Ok(Journey {
        duration: Duration::minutes(dto.duration),
        departure: parse_instant(&dto.start_date_time)?,
        arrival: parse_instant(&dto.arrival_date_time)?,
        mode: Mode::primary(&leg_modes),
        route: route_label(&dto.legs),
    })
}

/// The service reports instants as naive local-free timestamps; they are
/// interpreted as UTC.
fn parse_instant(raw: &str) -> Result<DateTime<Utc>, JourneyError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| JourneyError::Json {
            message: format!("unparseable instant: {raw:?}"),
        })
}

/// Route label: the first route-option name of each leg that has one,
/// joined with `->`; `"walking"` when no leg names a route.
fn route_label(legs: &[LegDto]) -> String {
    let names: Vec<&str> = legs
        .iter()
        .filter_map(|leg| leg.route_options.first())
        .map(|option| option.name.as_str())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        "walking".to_string()
    } else {
        names.join("->")
    }
}

/// Order candidate journeys.
///
/// With an arrival deadline, ascending by absolute distance between the
/// deadline and each journey's departure (closest match first); without one,
/// ascending by arrival.
pub(crate) fn sort_journeys(journeys: &mut [Journey], arrive_by: Option<DateTime<Utc>>) {
    match arrive_by {
        Some(deadline) => journeys.sort_by_key(|journey| journey.departure_distance(deadline)),
        None => journeys.sort_by_key(|journey| journey.arrival),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::super::types::JourneysDto;
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "journeys": [
            {
                "duration": 34,
                "startDateTime": "2026-03-02T08:31:00",
                "arrivalDateTime": "2026-03-02T09:05:00",
                "legs": [
                    {"mode": {"id": "walking"}, "routeOptions": [{"name": ""}]},
                    {"mode": {"id": "bus"}, "routeOptions": [{"name": "68"}]},
                    {"mode": {"id": "tube"}, "routeOptions": [{"name": "Victoria"}]}
                ]
            },
            {
                "duration": 12,
                "startDateTime": "2026-03-02T08:50:00",
                "arrivalDateTime": "2026-03-02T09:02:00",
                "legs": [
                    {"mode": {"id": "walking"}}
                ]
            }
        ]
    }"#;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
    }

    fn journey_departing(departure: DateTime<Utc>) -> Journey {
        Journey {
            duration: Duration::minutes(20),
            departure,
            arrival: departure + Duration::minutes(20),
            mode: Mode::Tube,
            route: "Victoria".to_string(),
        }
    }

    #[test]
    fn converts_a_mixed_mode_journey() {
        let dto: JourneysDto = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let journey = convert_journey(&dto.journeys[0]).unwrap();

        assert_eq!(journey.duration, Duration::minutes(34));
        assert_eq!(journey.departure, at(8, 31));
        assert_eq!(journey.arrival, at(9, 5));
        // First rail-like leg wins even though bus appears earlier
        assert_eq!(journey.mode, Mode::Tube);
        // Empty leg names are dropped from the label
        assert_eq!(journey.route, "68->Victoria");
    }

    #[test]
    fn walk_only_journey_is_labelled_walking() {
        let dto: JourneysDto = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let journey = convert_journey(&dto.journeys[1]).unwrap();

        assert_eq!(journey.mode, Mode::Walking);
        assert_eq!(journey.route, "walking");
    }

    #[test]
    fn bad_instant_is_a_json_error() {
        let json = r#"{
            "duration": 10,
            "startDateTime": "yesterday",
            "arrivalDateTime": "2026-03-02T09:05:00",
            "legs": []
        }"#;
        let dto: JourneyDto = serde_json::from_str(json).unwrap();

        assert!(matches!(
            convert_journey(&dto),
            Err(JourneyError::Json { .. })
        ));
    }

    #[test]
    fn deadline_sort_picks_closest_departure_first() {
        let deadline = at(9, 0);
        // Departures at -5min, +2min and -1min relative to the deadline
        let mut journeys = vec![
            journey_departing(at(8, 55)),
            journey_departing(at(9, 2)),
            journey_departing(at(8, 59)),
        ];

        sort_journeys(&mut journeys, Some(deadline));

        assert_eq!(journeys[0].departure, at(8, 59));
        assert_eq!(journeys[1].departure, at(9, 2));
        assert_eq!(journeys[2].departure, at(8, 55));
    }

    #[test]
    fn no_deadline_sorts_by_arrival() {
        let mut journeys = vec![
            journey_departing(at(9, 30)),
            journey_departing(at(8, 10)),
            journey_departing(at(8, 45)),
        ];

        sort_journeys(&mut journeys, None);

        let arrivals: Vec<_> = journeys.iter().map(|j| j.arrival).collect();
        assert!(arrivals.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn missing_journeys_key_decodes_as_empty() {
        let dto: JourneysDto = serde_json::from_str("{}").unwrap();
        assert!(dto.journeys.is_empty());
    }
}
