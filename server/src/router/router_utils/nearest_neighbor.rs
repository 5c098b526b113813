//! Greedy nearest-neighbor ordering of destinations.
//!
//! The result is a heuristic, not an optimal tour: from the current
//! position the closest remaining destination is always visited next.
//! Runs in O(n²) for n destinations.

use crate::router::router_types::{coordinate::Coordinate, route_stop::RouteStop};
use crate::router::router_utils::haversine;

/// Orders `destinations` by repeatedly visiting the closest unvisited one,
/// starting from `start`.
///
/// Every destination appears exactly once in the output, duplicates
/// included. On equal distances the candidate that comes first in the
/// remaining list wins, so the output is a pure function of the input.
pub fn optimize_route(start: Coordinate, destinations: &[Coordinate]) -> Vec<RouteStop> {
    router_debug!(
        "(optimize_route) ordering {} destinations from {}.",
        destinations.len(),
        start
    );

    let mut remaining: Vec<Coordinate> = destinations.to_vec();
    let mut route: Vec<RouteStop> = Vec::with_capacity(remaining.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut nearest_index = 0;
        let mut nearest_distance = haversine::distance(&current, &remaining[0]);

        for (index, candidate) in remaining.iter().enumerate().skip(1) {
            let distance = haversine::distance(&current, candidate);
            if distance < nearest_distance {
                nearest_index = index;
                nearest_distance = distance;
            }
        }

        // `remove` keeps the relative order of the rest for tie-breaking
        let next = remaining.remove(nearest_index);
        route.push(RouteStop {
            destination: next,
            distance_from_previous: nearest_distance,
            order: route.len() as u32 + 1,
        });
        current = next;
    }

    router_debug!(
        "(optimize_route) route of {} stops, {:.3} km.",
        route.len(),
        total_distance(&route)
    );

    route
}

/// Sum of all legs of a route, in kilometers
pub fn total_distance(route: &[RouteStop]) -> f64 {
    route.iter().map(|stop| stop.distance_from_previous).sum()
}
