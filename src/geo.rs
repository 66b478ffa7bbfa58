//! Geodesic distance and walking-time estimation.
//!
//! Uses great-circle distance over a spherical earth. Accurate to well under
//! a percent at neighbourhood scale, which is all the planner needs.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Walking pace in minutes per kilometer (~5 km/h).
const WALK_PACE_MIN_PER_KM: f64 = 12.0;

/// Street networks are not straight lines; inflate the crow-flies estimate.
const PATH_WINDING_FACTOR: f64 = 1.2;

/// A WGS84 point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Haversine great-circle distance between two points in kilometers.
///
/// NaN coordinates propagate NaN; callers are expected to feed real
/// geometry.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimated walking time between two points in whole minutes.
///
/// Straight-line distance at a 12 min/km pace, inflated by a winding-path
/// factor and rounded to the nearest minute. A deliberate approximation, not
/// a routed query.
pub fn walking_time_minutes(from: Coordinate, to: Coordinate) -> i32 {
    (distance_km(from, to) * WALK_PACE_MIN_PER_KM * PATH_WINDING_FACTOR).round() as i32
}
