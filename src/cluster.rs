//! Walkability clustering.
//!
//! Groups planned places into clusters a visitor can comfortably cover on
//! foot. Membership is decided by walking time to cluster centers, visiting
//! order inside a cluster by a greedy nearest-neighbor pass. The ordering is
//! a heuristic: good enough for a handful of stops, not an optimal tour.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::{self, Coordinate};
use crate::model::Place;

/// Walking time beyond which a place no longer "belongs" to a cluster.
const DEFAULT_PROXIMITY_THRESHOLD_MIN: i32 = 15;

#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Maximum walking time (minutes) from a cluster center for membership.
    pub proximity_threshold_min: i32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_min: DEFAULT_PROXIMITY_THRESHOLD_MIN,
        }
    }
}

/// Derived per-cluster figures, recomputed on every membership change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStats {
    /// Sum of member visit durations in minutes.
    pub total_duration_minutes: i32,
    /// Worst-case walk between any two members in minutes.
    pub max_walk_minutes: i32,
}

/// The clustering view of one planned place: just the fields the math needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterItem {
    pub place_id: String,
    pub coordinate: Coordinate,
    pub duration_minutes: i32,
}

impl ClusterItem {
    pub fn of(place: &Place) -> Self {
        Self {
            place_id: place.id.clone(),
            coordinate: place.coordinate,
            duration_minutes: place.duration_minutes,
        }
    }
}

/// A named group of walkably-close places within one city.
///
/// Members are place ids in visiting order, never copies of the places.
/// The id is generated client-side; a server id only ever enriches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    /// True while the name is a local placeholder awaiting reverse-geocoding.
    pub provisional_name: bool,
    pub remote_id: Option<String>,
    pub center: Coordinate,
    pub member_ids: Vec<String>,
    pub stats: ClusterStats,
    /// Creation sequence within the plan; ties between equally close
    /// clusters resolve to the earliest.
    pub created_seq: u64,
}

impl Cluster {
    pub fn spawn(name: impl Into<String>, center: Coordinate, created_seq: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            provisional_name: true,
            remote_id: None,
            center,
            member_ids: Vec::new(),
            stats: ClusterStats::default(),
            created_seq,
        }
    }

    pub fn contains(&self, place_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == place_id)
    }

    /// Refresh visiting order, center, and stats from the members' current
    /// data. An emptied cluster keeps its last center and name.
    pub fn recompute(&mut self, items: &[ClusterItem], anchor: Option<Coordinate>) {
        let ordered = order_items_optimally(items.to_vec(), anchor);
        self.member_ids = ordered.iter().map(|item| item.place_id.clone()).collect();
        if let Some(center) = centroid(&ordered) {
            self.center = center;
        }
        self.stats = compute_cluster_stats(&ordered);
    }
}

/// Outcome of the merge-or-spawn decision for a newly planned place.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterDecision {
    /// Existing cluster to join, if any.
    pub cluster_id: Option<String>,
    pub should_create_new: bool,
    /// Placeholder name when spawning, refined later by reverse-geocoding.
    pub suggested_name: Option<String>,
}

/// Decide where a newly added place belongs among a city's clusters.
///
/// The closest center within the proximity threshold wins; ties resolve to
/// the smallest walking time, then cluster creation order. Nothing within
/// range means a new cluster seeded at the place itself.
pub fn find_best_cluster(
    clusters: &[Cluster],
    candidate: &Place,
    config: &ClusterConfig,
) -> ClusterDecision {
    let mut best: Option<(&Cluster, i32)> = None;

    for cluster in clusters {
        let minutes = geo::walking_time_minutes(candidate.coordinate, cluster.center);
        if minutes > config.proximity_threshold_min {
            continue;
        }

        let closer = match best {
            None => true,
            Some((incumbent, best_minutes)) => {
                minutes < best_minutes
                    || (minutes == best_minutes && cluster.created_seq < incumbent.created_seq)
            }
        };
        if closer {
            best = Some((cluster, minutes));
        }
    }

    match best {
        Some((cluster, _)) => ClusterDecision {
            cluster_id: Some(cluster.id.clone()),
            should_create_new: false,
            suggested_name: None,
        },
        None => ClusterDecision {
            cluster_id: None,
            should_create_new: true,
            suggested_name: Some(format!("Near {}", candidate.name)),
        },
    }
}

/// Order items for walking with a greedy nearest-neighbor pass.
///
/// Seeded from the supplied anchor (e.g. the last stop of the previous slot)
/// or, without one, from the first item as given. Ties on walking time keep
/// the original input order, so the result is deterministic.
pub fn order_items_optimally(
    items: Vec<ClusterItem>,
    anchor: Option<Coordinate>,
) -> Vec<ClusterItem> {
    let mut remaining = items;
    let mut ordered = Vec::with_capacity(remaining.len());
    if remaining.is_empty() {
        return ordered;
    }

    let mut current = match anchor {
        Some(coordinate) => coordinate,
        None => {
            let seed = remaining.remove(0);
            let coordinate = seed.coordinate;
            ordered.push(seed);
            coordinate
        }
    };

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_minutes = i32::MAX;
        for (index, item) in remaining.iter().enumerate() {
            let minutes = geo::walking_time_minutes(current, item.coordinate);
            if minutes < best_minutes {
                best_minutes = minutes;
                best_index = index;
            }
        }

        let next = remaining.remove(best_index);
        current = next.coordinate;
        ordered.push(next);
    }

    ordered
}

/// Total visit duration plus the worst pairwise walk, over all member pairs.
pub fn compute_cluster_stats(items: &[ClusterItem]) -> ClusterStats {
    let total_duration_minutes = items.iter().map(|item| item.duration_minutes).sum();

    let mut max_walk_minutes = 0;
    for (index, from) in items.iter().enumerate() {
        for to in &items[index + 1..] {
            let minutes = geo::walking_time_minutes(from.coordinate, to.coordinate);
            max_walk_minutes = max_walk_minutes.max(minutes);
        }
    }

    ClusterStats {
        total_duration_minutes,
        max_walk_minutes,
    }
}

/// Arithmetic mean of member coordinates. Fine at walkable scale.
pub fn centroid(items: &[ClusterItem]) -> Option<Coordinate> {
    if items.is_empty() {
        return None;
    }
    let n = items.len() as f64;
    let lat = items.iter().map(|item| item.coordinate.lat).sum::<f64>() / n;
    let lng = items.iter().map(|item| item.coordinate.lng).sum::<f64>() / n;
    Some(Coordinate::new(lat, lng))
}

/// Refresh every cluster from current member data in one parallel pass.
///
/// `resolve` maps a member place id to its clustering view; ids it cannot
/// resolve drop out of the cluster.
pub fn recompute_all<F>(clusters: &mut [Cluster], resolve: F)
where
    F: Fn(&str) -> Option<ClusterItem> + Sync,
{
    clusters.par_iter_mut().for_each(|cluster| {
        let items: Vec<ClusterItem> = cluster
            .member_ids
            .iter()
            .filter_map(|id| resolve(id))
            .collect();
        cluster.recompute(&items, None);
    });
}
