//! Minimal-detour insertion solver.
//!
//! Finds the splice position for a new waypoint that keeps an ordered route
//! shortest. Routes here are slot-sized (tens of stops at most), so the
//! full evaluate-every-position search is the simplest correct choice.

use crate::geo::{self, Coordinate};

/// Result of an insertion search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    /// Splice index into the route, `0..=len`.
    pub index: usize,
    /// How much longer the route becomes, in kilometers.
    pub added_distance_km: f64,
}

/// Total length of a route as the sum of consecutive-pair distances.
pub fn route_length_km(route: &[Coordinate]) -> f64 {
    route
        .windows(2)
        .map(|pair| geo::distance_km(pair[0], pair[1]))
        .sum()
}

/// Find the insertion position that minimizes total route length.
///
/// Every position in `0..=len` is evaluated by splicing the candidate in and
/// re-summing the whole route; on an exact tie the lowest index wins, so the
/// result is deterministic. An empty route yields index 0 at zero cost; a
/// single-waypoint route evaluates both endpoints.
pub fn best_insertion_index(route: &[Coordinate], candidate: Coordinate) -> Insertion {
    if route.is_empty() {
        return Insertion {
            index: 0,
            added_distance_km: 0.0,
        };
    }

    let base = route_length_km(route);
    let mut best_index = 0;
    let mut best_total = f64::INFINITY;

    for position in 0..=route.len() {
        let mut spliced = route.to_vec();
        spliced.insert(position, candidate);

        let total = route_length_km(&spliced);
        if total < best_total {
            best_total = total;
            best_index = position;
        }
    }

    Insertion {
        index: best_index,
        added_distance_km: best_total - base,
    }
}

/// Extra distance from visiting `candidate` between two fixed neighbors:
/// `d(prev, c) + d(c, next) - d(prev, next)`.
pub fn detour_km(prev: Coordinate, candidate: Coordinate, next: Coordinate) -> f64 {
    geo::distance_km(prev, candidate) + geo::distance_km(candidate, next)
        - geo::distance_km(prev, next)
}
