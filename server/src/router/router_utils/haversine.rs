//! Implementation of the Haversine formula for calculating the distance
//! between two points on a sphere.
//!
//! See [Wikipedia](https://en.wikipedia.org/wiki/Haversine_formula) for
//! more.
//!
//! **Distance is returned in kilometers**.

use crate::router::router_types::coordinate::Coordinate;

/// Mean radius of the earth in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the great-circle distance between two coordinates.
///
/// Symmetric, zero for identical inputs and never negative. The earth is
/// treated as a sphere; expect up to ~0.5% deviation from an ellipsoidal
/// model.
pub fn distance(start: &Coordinate, end: &Coordinate) -> f64 {
    let d_lat = (end.latitude() - start.latitude()).to_radians();
    let d_lon = (end.longitude() - start.longitude()).to_radians();
    let lat1 = start.latitude().to_radians();
    let lat2 = end.latitude().to_radians();

    // computed once as a product so swapping start and end rounds the same
    let cos_product = lat1.cos() * lat2.cos();
    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * cos_product;

    // rounding can push `a` a hair past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
