//! Domain types for the rental discovery pipeline.
//!
//! This module contains the core value types shared by the remote-service
//! clients and the discovery pipeline. Everything here is immutable after
//! construction; the clients decode wire payloads into these types once and
//! the rest of the pipeline never touches raw JSON.

mod coordinate;
mod journey;
mod listing;
mod mode;

pub use coordinate::Coordinate;
pub use journey::Journey;
pub use listing::{Frequency, Listing, Price};
pub use mode::Mode;
