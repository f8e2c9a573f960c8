//! Rental listing discovery pipeline.
//!
//! Finds newly listed rentals matching price and location criteria, filters
//! out listings seen on earlier runs, and keeps only those with a workable
//! commute to a configured set of destinations.

pub mod cache;
pub mod commute;
pub mod discovery;
pub mod domain;
pub mod journeys;
pub mod listings;
pub mod retry;
