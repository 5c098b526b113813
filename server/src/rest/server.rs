//! REST server implementation

use super::api;
use crate::config::Config;
use crate::service::GeolocationService;
use crate::shutdown_signal;
use axum::http::{header::CONTENT_TYPE, Method};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Builds the application router around a shared service
pub fn router(service: Arc<GeolocationService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(api::health_check))
        .route("/geocode", get(api::geocode_query).post(api::geocode_body))
        .route("/reverse-geocode", post(api::reverse_geocode))
        .route("/optimize-route", post(api::optimize_route))
        .route("/distance", post(api::distance))
        .layer(cors)
        .with_state(service)
}

/// Starts the REST API server for this microservice
///
/// Runs until Ctrl+C is pressed or, when given, `shutdown_rx` fires.
///
/// # Errors
/// Fails if the configured port can not be bound or the server stops
/// unexpectedly.
pub async fn rest_server(
    config: Config,
    service: Arc<GeolocationService>,
    shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
) -> anyhow::Result<()> {
    rest_info!("(rest_server) entry.");
    let address = SocketAddr::from(([0, 0, 0, 0], config.docker_port_rest));

    let listener = tokio::net::TcpListener::bind(address).await.map_err(|e| {
        rest_error!("(rest_server) could not bind {}: {}", address, e);
        e
    })?;

    rest_info!("(rest_server) hosted at {}.", address);
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal("rest", shutdown_rx))
        .await?;

    rest_info!("(rest_server) stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::clock::SystemClock;
    use crate::provider::stub::{place, StubProvider};
    use crate::provider::ProviderError;
    use crate::rest::api::*;
    use crate::service::{CachePolicy, DEFAULT_MAX_ROUTE_DESTINATIONS};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn app() -> Router {
        let stub = StubProvider::new()
            .with_search("Dam 1, Amsterdam", place(52.3730796, 4.8924534, "Dam, Amsterdam"))
            .with_search(
                "down",
                Err(ProviderError::Unavailable(String::from("status 503"))),
            );

        router(Arc::new(GeolocationService::new(
            Arc::new(stub),
            Arc::new(MemoryStore::new(10)),
            Arc::new(SystemClock),
            CachePolicy::default(),
        )))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_uri(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn call<T: DeserializeOwned>(request: Request<Body>) -> (StatusCode, T) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        crate::get_log_handle().await;
        ut_info!("(test_health) Start.");

        let (status, body): (_, ReadyResponse) = call(get_uri("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.ready);

        ut_info!("(test_health) Success.");
    }

    #[tokio::test]
    async fn test_geocode() {
        crate::get_log_handle().await;
        ut_info!("(test_geocode) Start.");

        let (status, body): (_, GeocodeResponse) = call(post_json(
            "/geocode",
            serde_json::json!({ "address": "Dam 1, Amsterdam" }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.latitude, 52.3730796);
        assert_eq!(body.display_name, "Dam, Amsterdam");
        assert_eq!(body.address.get("city").unwrap(), "Amsterdam");

        let (status, body): (_, GeocodeResponse) =
            call(get_uri("/geocode?address=Dam%201%2C%20Amsterdam")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.longitude, 4.8924534);

        ut_info!("(test_geocode) Success.");
    }

    #[tokio::test]
    async fn test_geocode_not_found() {
        crate::get_log_handle().await;
        ut_info!("(test_geocode_not_found) Start.");

        for address in ["Nowhere", "down"] {
            let (status, body): (_, ErrorResponse) = call(post_json(
                "/geocode",
                serde_json::json!({ "address": address }),
            ))
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body.error, "Location not found.");
        }

        ut_info!("(test_geocode_not_found) Success.");
    }

    #[tokio::test]
    async fn test_bad_requests() {
        crate::get_log_handle().await;
        ut_info!("(test_bad_requests) Start.");

        let (status, body): (_, ErrorResponse) =
            call(post_json("/geocode", serde_json::json!({ "street": "Dam" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.starts_with("Invalid request"));

        let (status, _): (_, ErrorResponse) =
            call(post_json("/geocode", serde_json::json!({ "address": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _): (_, ErrorResponse) = call(get_uri("/geocode")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/reverse-geocode")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _): (_, ErrorResponse) = call(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/distance")
            .body(Body::from("{}"))
            .unwrap();
        let (status, _): (_, ErrorResponse) = call(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        ut_info!("(test_bad_requests) Success.");
    }

    #[tokio::test]
    async fn test_reverse_geocode() {
        crate::get_log_handle().await;
        ut_info!("(test_reverse_geocode) Start.");

        let (status, body): (_, GeocodeResponse) = call(post_json(
            "/reverse-geocode",
            serde_json::json!({ "latitude": 52.37, "longitude": 4.9 }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.latitude, 52.37);

        let (status, body): (_, ErrorResponse) = call(post_json(
            "/reverse-geocode",
            serde_json::json!({ "latitude": 95.0, "longitude": 4.9 }),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.starts_with("Invalid coordinate"));

        ut_info!("(test_reverse_geocode) Success.");
    }

    #[tokio::test]
    async fn test_optimize_route() {
        crate::get_log_handle().await;
        ut_info!("(test_optimize_route) Start.");

        let (status, body): (_, OptimizeRouteResponse) = call(post_json(
            "/optimize-route",
            serde_json::json!({
                "start": { "latitude": 52.37, "longitude": 4.90 },
                "destinations": [
                    { "latitude": 52.38, "longitude": 4.85 },
                    { "latitude": 52.35, "longitude": 4.95 },
                    { "latitude": 52.40, "longitude": 4.80 }
                ]
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);

        let order: Vec<(f64, f64)> = body
            .route
            .iter()
            .map(|stop| (stop.latitude, stop.longitude))
            .collect();
        assert_eq!(order, vec![(52.38, 4.85), (52.40, 4.80), (52.35, 4.95)]);
        assert_eq!(
            body.route.iter().map(|stop| stop.order).collect::<Vec<u32>>(),
            vec![1, 2, 3]
        );
        let sum: f64 = body.route.iter().map(|stop| stop.distance_from_previous).sum();
        assert!((body.total_distance - sum).abs() < 1e-9);

        let (status, body): (_, OptimizeRouteResponse) = call(post_json(
            "/optimize-route",
            serde_json::json!({
                "start": { "latitude": 52.37, "longitude": 4.90 },
                "destinations": []
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.route.is_empty());
        assert_eq!(body.total_distance, 0.0);

        let (status, _): (_, ErrorResponse) = call(post_json(
            "/optimize-route",
            serde_json::json!({
                "start": { "latitude": 52.37, "longitude": 4.90 },
                "destinations": [{ "latitude": 52.38, "longitude": 190.0 }]
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let point = serde_json::json!({ "latitude": 52.38, "longitude": 4.85 });
        let too_many = vec![point; DEFAULT_MAX_ROUTE_DESTINATIONS + 1];
        let (status, body): (_, ErrorResponse) = call(post_json(
            "/optimize-route",
            serde_json::json!({
                "start": { "latitude": 52.37, "longitude": 4.90 },
                "destinations": too_many
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.starts_with("Invalid request"));

        ut_info!("(test_optimize_route) Success.");
    }

    #[tokio::test]
    async fn test_distance() {
        crate::get_log_handle().await;
        ut_info!("(test_distance) Start.");

        let (status, body): (_, DistanceResponse) = call(post_json(
            "/distance",
            serde_json::json!({
                "from": { "latitude": 52.3676, "longitude": 4.9041 },
                "to": { "latitude": 51.9244, "longitude": 4.4777 }
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!((body.distance_km - 57.2).abs() < 0.1);

        ut_info!("(test_distance) Success.");
    }

    #[tokio::test]
    async fn test_server_shutdown() {
        crate::get_log_handle().await;
        ut_info!("(test_server_shutdown) Start.");

        // any free port
        let config = Config {
            docker_port_rest: 0,
            ..Config::new()
        };
        let service = Arc::new(GeolocationService::new(
            Arc::new(StubProvider::new()),
            Arc::new(MemoryStore::new(10)),
            Arc::new(SystemClock),
            CachePolicy::default(),
        ));

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(rest_server(config, service, Some(shutdown_rx)));
        shutdown_tx.send(()).unwrap();

        let result = handle.await.unwrap();
        assert!(result.is_ok());

        ut_info!("(test_server_shutdown) Success.");
    }
}
