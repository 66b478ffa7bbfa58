//! Provider traits for the planner's external collaborators.
//!
//! These are intentionally minimal. Place lookup, persistence transport, and
//! reverse geocoding all live outside the engine; concrete apps implement
//! them for their own backends.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cluster::Cluster;
use crate::geo::Coordinate;
use crate::model::{Place, TripPlan};

/// Errors crossing the provider boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Everything a store persists for one plan: the schedule plus its derived
/// cluster layer, serialized as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlan {
    pub plan: TripPlan,
    /// Clusters keyed by city, each list in creation order.
    pub clusters: HashMap<String, Vec<Cluster>>,
}

/// Place lookup (search box results, AI suggestions). The engine only
/// relies on the id, coordinate, and duration of whatever comes back.
pub trait PlaceSource {
    fn search(&self, query: &str) -> Result<Vec<Place>, ProviderError>;
}

/// Opaque plan persistence. The engine hands over snapshots and never
/// cares where they land.
pub trait PlanStore {
    fn load_plan(&self, plan_id: &str) -> Result<Option<SavedPlan>, ProviderError>;
    fn save_plan(&self, plan_id: &str, saved: &SavedPlan) -> Result<(), ProviderError>;
}

/// Reverse-geocoding naming service for cluster display names.
///
/// `None` on any failure: the caller's provisional name simply stands.
pub trait AreaNamer {
    fn area_name(&self, coordinate: Coordinate) -> Option<String>;
}
