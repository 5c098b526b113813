//! REST client example

use reqwest::Client;
use svc_geolocation_client_rest::types::*;

/// Example geocoding a venue address
async fn geocode_example(client: &Client, url: &str) -> Option<GeocodeResponse> {
    let request = GeocodeRequest {
        address: String::from("Dam 1, Amsterdam"),
    };

    let response = match client
        .post(format!("{url}/geocode"))
        .json(&request)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            println!("(geocode_example) ERROR={:?}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        let error = response.json::<ErrorResponse>().await.ok();
        println!("(geocode_example) ERROR={:?}", error);
        return None;
    }

    let place = response.json::<GeocodeResponse>().await.ok();
    println!("(geocode_example) RESPONSE={:?}", place);
    place
}

/// Example reverse geocoding a coordinate
async fn reverse_geocode_example(client: &Client, url: &str) -> Option<GeocodeResponse> {
    let request = ReverseGeocodeRequest {
        latitude: 52.3731,
        longitude: 4.8926,
    };

    let response = client
        .post(format!("{url}/reverse-geocode"))
        .json(&request)
        .send()
        .await
        .ok()?;

    let place = response.json::<GeocodeResponse>().await.ok();
    println!("(reverse_geocode_example) RESPONSE={:?}", place);
    place
}

/// Example asking for a visiting order of three venues
async fn optimize_route_example(client: &Client, url: &str) -> Option<OptimizeRouteResponse> {
    let request = OptimizeRouteRequest {
        start: Point {
            latitude: 52.37,
            longitude: 4.90,
        },
        destinations: vec![
            Point {
                latitude: 52.38,
                longitude: 4.85,
            },
            Point {
                latitude: 52.35,
                longitude: 4.95,
            },
            Point {
                latitude: 52.40,
                longitude: 4.80,
            },
        ],
    };

    let response = client
        .post(format!("{url}/optimize-route"))
        .json(&request)
        .send()
        .await
        .ok()?;

    let route = response.json::<OptimizeRouteResponse>().await.ok();
    println!("(optimize_route_example) RESPONSE={:?}", route);
    route
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let host = std::env::var("SERVER_HOSTNAME").unwrap_or_else(|_| String::from("localhost"));
    let port = std::env::var("SERVER_PORT_REST").unwrap_or_else(|_| String::from("8000"));
    let url = format!("http://{host}:{port}");
    println!("(main) Rest endpoint set to [{url}].");

    let client = Client::new();

    let ready = client
        .get(format!("{url}/health"))
        .send()
        .await?
        .json::<ReadyResponse>()
        .await?;
    println!("(main) READY={:?}", ready);

    geocode_example(&client, &url).await;
    reverse_geocode_example(&client, &url).await;
    optimize_route_example(&client, &url).await;

    Ok(())
}
