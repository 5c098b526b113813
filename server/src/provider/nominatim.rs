//! Client for Nominatim compatible `search`/`reverse` APIs.

use super::{GeocodingProvider, ProviderError};
use crate::cache::GeocodeResult;
use crate::router::Coordinate;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// A place as returned by the provider. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,

    #[serde(default)]
    address: HashMap<String, serde_json::Value>,
}

/// `reverse` answers with either a place or an error object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    Place(Place),
    Error { error: String },
}

impl Place {
    fn into_geocode_result(self) -> Result<GeocodeResult, ProviderError> {
        let latitude: f64 = self.lat.trim().parse().map_err(|e| {
            ProviderError::InvalidResponse(format!("latitude [{}]: {}", self.lat, e))
        })?;
        let longitude: f64 = self.lon.trim().parse().map_err(|e| {
            ProviderError::InvalidResponse(format!("longitude [{}]: {}", self.lon, e))
        })?;
        let coordinate = Coordinate::new(latitude, longitude)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        // address parts are strings in practice; anything else is kept as JSON text
        let address_components = self
            .address
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(text) => (key, text),
                other => (key, other.to_string()),
            })
            .collect();

        Ok(GeocodeResult {
            coordinate,
            display_name: self.display_name,
            address_components,
            resolved_at: Utc::now(),
        })
    }
}

/// HTTP geocoding provider.
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    client: Client,
    base_url: String,
}

impl NominatimProvider {
    /// Builds a client for `base_url` that identifies itself with
    /// `user_agent` and gives up on any request after `timeout`.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base url requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a GET request and returns the body of a successful response.
    async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);
        provider_debug!("(get_text) GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Unavailable(format!("request to {} timed out", url))
                } else {
                    ProviderError::Unavailable(format!("request to {} failed: {}", url, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!(
                "{} answered with status {}",
                url, status
            )));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Unavailable(format!("reading body from {} timed out", url))
            } else {
                ProviderError::Unavailable(format!("reading body from {} failed: {}", url, e))
            }
        })
    }
}

/// Most bytes of a provider body that end up in a log line
const LOGGED_BODY_LIMIT: usize = 512;

/// Cuts `body` down to at most [`LOGGED_BODY_LIMIT`] bytes on a char boundary.
fn excerpt(body: &str) -> &str {
    let mut end = body.len().min(LOGGED_BODY_LIMIT);
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| {
        provider_error!(
            "(decode) could not decode provider body of {} bytes [{}]: {}",
            body.len(),
            excerpt(body),
            e
        );
        ProviderError::InvalidResponse(e.to_string())
    })
}

#[async_trait::async_trait]
impl GeocodingProvider for NominatimProvider {
    async fn search(&self, address: &str) -> Result<GeocodeResult, ProviderError> {
        let query = [
            ("q", address.to_string()),
            ("format", String::from("json")),
            ("limit", String::from("1")),
            ("addressdetails", String::from("1")),
        ];

        let body = self.get_text("search", &query).await?;
        let places: Vec<Place> = decode(&body)?;
        match places.into_iter().next() {
            Some(place) => place.into_geocode_result(),
            None => Err(ProviderError::NoResults),
        }
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<GeocodeResult, ProviderError> {
        let query = [
            ("lat", coordinate.latitude().to_string()),
            ("lon", coordinate.longitude().to_string()),
            ("format", String::from("json")),
            ("addressdetails", String::from("1")),
        ];

        let body = self.get_text("reverse", &query).await?;
        match decode::<ReverseResponse>(&body)? {
            ReverseResponse::Place(place) => place.into_geocode_result(),
            ReverseResponse::Error { error } => {
                provider_debug!("(reverse) provider has no place at {}: {}", coordinate, error);
                Err(ProviderError::NoResults)
            }
        }
    }
}
