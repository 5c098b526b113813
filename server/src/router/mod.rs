//! Router module
//!
//! Coordinates, great-circle distances and visiting-order suggestions for
//! a set of venues.

#[macro_use]
pub mod macros;
pub mod router_types;
pub mod router_utils;

pub use router_types::coordinate::Coordinate;
pub use router_types::route_stop::RouteStop;
pub use router_utils::haversine;
pub use router_utils::nearest_neighbor::{optimize_route, total_distance};
