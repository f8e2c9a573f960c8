//! Journey service client.
//!
//! Queries candidate journeys between an origin and a destination for a
//! target arrival time, and normalizes the results for the commute
//! feasibility check.

mod client;
mod convert;
mod error;
mod types;

pub use client::{JourneyClient, JourneyConfig, JourneySource, Origin};
pub use error::JourneyError;
