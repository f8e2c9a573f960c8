//! Wire DTOs for the journey service.

use serde::Deserialize;

/// Top-level journey query response.
#[derive(Debug, Deserialize)]
pub(crate) struct JourneysDto {
    #[serde(default)]
    pub journeys: Vec<JourneyDto>,
}

/// One raw journey record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JourneyDto {
    /// Total journey time in minutes.
    pub duration: i64,
    /// Departure instant, naive `%Y-%m-%dT%H:%M:%S`.
    pub start_date_time: String,
    /// Arrival instant, same format.
    pub arrival_date_time: String,
    #[serde(default)]
    pub legs: Vec<LegDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LegDto {
    pub mode: LegModeDto,
    #[serde(default)]
    pub route_options: Vec<RouteOptionDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LegModeDto {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteOptionDto {
    #[serde(default)]
    pub name: String,
}

/// Error body shape, used to tell "no journey found" apart from a real
/// lookup miss on a 404.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageDto {
    #[serde(default)]
    pub message: String,
}
