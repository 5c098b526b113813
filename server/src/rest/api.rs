//! Handlers for the REST endpoints

pub use svc_geolocation_client_rest::types::*;

use crate::cache::GeocodeResult;
use crate::error::GeoError;
use crate::router;
use crate::service::GeolocationService;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

/// Shared handler state
pub type AppState = Arc<GeolocationService>;

impl IntoResponse for GeoError {
    fn into_response(self) -> Response {
        let status = match self {
            GeoError::InvalidCoordinate { .. } | GeoError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GeoError::NotFound => StatusCode::NOT_FOUND,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for GeoError {
    fn from(rejection: JsonRejection) -> Self {
        GeoError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for GeoError {
    fn from(rejection: QueryRejection) -> Self {
        GeoError::InvalidRequest(rejection.body_text())
    }
}

impl From<GeocodeResult> for GeocodeResponse {
    fn from(result: GeocodeResult) -> Self {
        GeocodeResponse {
            latitude: result.coordinate.latitude(),
            longitude: result.coordinate.longitude(),
            display_name: result.display_name,
            address: result.address_components,
            resolved_at: result.resolved_at,
        }
    }
}

impl From<router::RouteStop> for RouteStop {
    fn from(stop: router::RouteStop) -> Self {
        RouteStop {
            latitude: stop.destination.latitude(),
            longitude: stop.destination.longitude(),
            distance_from_previous: stop.distance_from_previous,
            order: stop.order,
        }
    }
}

fn pair(point: &Point) -> (f64, f64) {
    (point.latitude, point.longitude)
}

fn log_failure(function: &str, error: &GeoError) {
    match error {
        GeoError::NotFound => rest_info!("({}) {}", function, error),
        _ => rest_warn!("({}) rejected request: {}", function, error),
    }
}

/// Returns ready:true when service is available
pub async fn health_check() -> Json<ReadyResponse> {
    rest_debug!("(health_check) entry.");
    Json(ReadyResponse { ready: true })
}

/// Resolves `?address=` to a place
pub async fn geocode_query(
    State(service): State<AppState>,
    request: Result<Query<GeocodeRequest>, QueryRejection>,
) -> Result<Json<GeocodeResponse>, GeoError> {
    let Query(request) = request?;
    geocode(&service, &request.address).await
}

/// Resolves the `address` of a JSON body to a place
pub async fn geocode_body(
    State(service): State<AppState>,
    request: Result<Json<GeocodeRequest>, JsonRejection>,
) -> Result<Json<GeocodeResponse>, GeoError> {
    let Json(request) = request?;
    geocode(&service, &request.address).await
}

async fn geocode(
    service: &GeolocationService,
    address: &str,
) -> Result<Json<GeocodeResponse>, GeoError> {
    rest_debug!("(geocode) address [{}].", address);
    match service.geocode(address).await {
        Ok(result) => Ok(Json(result.into())),
        Err(e) => {
            log_failure("geocode", &e);
            Err(e)
        }
    }
}

/// Resolves a coordinate to a place
pub async fn reverse_geocode(
    State(service): State<AppState>,
    request: Result<Json<ReverseGeocodeRequest>, JsonRejection>,
) -> Result<Json<GeocodeResponse>, GeoError> {
    let Json(request) = request?;
    rest_debug!(
        "(reverse_geocode) ({}, {}).",
        request.latitude,
        request.longitude
    );

    service
        .reverse_geocode(request.latitude, request.longitude)
        .await
        .map(|result| Json(result.into()))
        .map_err(|e| {
            log_failure("reverse_geocode", &e);
            e
        })
}

/// Suggests a visiting order for the given destinations
pub async fn optimize_route(
    State(service): State<AppState>,
    request: Result<Json<OptimizeRouteRequest>, JsonRejection>,
) -> Result<Json<OptimizeRouteResponse>, GeoError> {
    let Json(request) = request?;
    rest_debug!(
        "(optimize_route) {} destinations.",
        request.destinations.len()
    );

    let destinations: Vec<(f64, f64)> = request.destinations.iter().map(pair).collect();
    let route = service
        .optimize_route(pair(&request.start), &destinations)
        .map_err(|e| {
            log_failure("optimize_route", &e);
            e
        })?;

    let total_distance = router::total_distance(&route);
    Ok(Json(OptimizeRouteResponse {
        route: route.into_iter().map(RouteStop::from).collect(),
        total_distance,
    }))
}

/// Great-circle distance between two points
pub async fn distance(
    State(service): State<AppState>,
    request: Result<Json<DistanceRequest>, JsonRejection>,
) -> Result<Json<DistanceResponse>, GeoError> {
    let Json(request) = request?;

    service
        .distance(pair(&request.from), pair(&request.to))
        .map(|distance_km| Json(DistanceResponse { distance_km }))
        .map_err(|e| {
            log_failure("distance", &e);
            e
        })
}
