//! Struct definition for [`RouteStop`].

use super::coordinate::Coordinate;

/// One destination in a suggested visiting order.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RouteStop {
    /// The destination, as supplied by the caller
    pub destination: Coordinate,

    /// Kilometers from the previous stop (or from the start for the first
    /// stop)
    pub distance_from_previous: f64,

    /// 1-based position in the route
    pub order: u32,
}
