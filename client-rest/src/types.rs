//! Types used for the REST API of the geolocation service.
//!
//! All coordinates are WGS84 decimal degrees, all distances are kilometers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request to resolve a free-text address.
///
/// Used as JSON body for `POST /geocode` and as query string for
/// `GET /geocode?address=...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeRequest {
    /// The address, used as supplied (case-sensitive)
    pub address: String,
}

/// Request to resolve a coordinate pair to a place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocodeRequest {
    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,

    /// Longitude in degrees, [-180, 180]
    pub longitude: f64,
}

/// A resolved place, returned by both geocode endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    /// Latitude of the resolved place
    pub latitude: f64,

    /// Longitude of the resolved place
    pub longitude: f64,

    /// Human readable name as reported by the provider
    pub display_name: String,

    /// Address components (road, city, postcode, country, ...)
    #[serde(default)]
    pub address: HashMap<String, String>,

    /// When the provider resolved this place. Cached answers keep the
    /// original timestamp.
    pub resolved_at: DateTime<Utc>,
}

/// A bare coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,
}

/// Request a visiting order for a set of destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRouteRequest {
    /// Where the tour starts
    pub start: Point,

    /// Destinations to visit, in any order
    pub destinations: Vec<Point>,
}

/// One leg of a suggested route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Latitude of the destination
    pub latitude: f64,

    /// Longitude of the destination
    pub longitude: f64,

    /// Great-circle distance from the previous stop (or the start)
    pub distance_from_previous: f64,

    /// 1-based position in the route
    pub order: u32,
}

/// Suggested route for an [`OptimizeRouteRequest`].
///
/// The route is a nearest-neighbor approximation, not a guaranteed
/// shortest tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRouteResponse {
    /// Stops in visiting order, empty if no destinations were given
    pub route: Vec<RouteStop>,

    /// Sum of all `distance_from_previous` values
    pub total_distance: f64,
}

/// Request the great-circle distance between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceRequest {
    /// First point
    pub from: Point,

    /// Second point
    pub to: Point,
}

/// Distance between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceResponse {
    /// Haversine distance in kilometers
    pub distance_km: f64,
}

/// Returned by `GET /health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// true when the service is available
    pub ready: bool,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable reason
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_stop_field_names() {
        let stop = RouteStop {
            latitude: 52.38,
            longitude: 4.85,
            distance_from_previous: 3.5,
            order: 1,
        };

        let value = serde_json::to_value(stop).unwrap();
        assert_eq!(
            value,
            json!({
                "latitude": 52.38,
                "longitude": 4.85,
                "distance_from_previous": 3.5,
                "order": 1
            })
        );
    }

    #[test]
    fn test_optimize_route_request_from_json() {
        let request: OptimizeRouteRequest = serde_json::from_value(json!({
            "start": { "latitude": 52.37, "longitude": 4.90 },
            "destinations": [
                { "latitude": 52.38, "longitude": 4.85 },
                { "latitude": 52.35, "longitude": 4.95 }
            ]
        }))
        .unwrap();

        assert_eq!(request.start.latitude, 52.37);
        assert_eq!(request.destinations.len(), 2);
        assert_eq!(request.destinations[1].longitude, 4.95);
    }

    #[test]
    fn test_geocode_response_without_address() {
        let response: GeocodeResponse = serde_json::from_value(json!({
            "latitude": 52.3676,
            "longitude": 4.9041,
            "display_name": "Amsterdam, Noord-Holland, Nederland",
            "resolved_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();

        assert!(response.address.is_empty());
        assert_eq!(response.display_name, "Amsterdam, Noord-Holland, Nederland");
    }

    #[test]
    fn test_missing_address_is_rejected() {
        let result = serde_json::from_value::<GeocodeRequest>(json!({ "street": "Dam 1" }));
        assert!(result.is_err());
    }
}
