//! Test fixtures for itinerary-planner.
//!
//! Provides realistic test data: real Paris locations (from
//! OpenStreetMap) grouped by walkable neighbourhood.

pub mod paris_locations;

pub use paris_locations::*;
