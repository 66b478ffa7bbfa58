//! itinerary-planner core engine
//!
//! Planning logic for interactive travel itineraries: walkability
//! clustering, minimal-detour insertion, reversible schedule edits, and
//! optimistic-sync reconciliation. Rendering, map APIs, and persistence
//! transport live behind the traits module.

pub mod geo;
pub mod model;
pub mod solver;
pub mod cluster;
pub mod history;
pub mod engine;
pub mod sync;
pub mod traits;
pub mod geocode;
pub mod error;
