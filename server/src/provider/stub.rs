//! Scripted geocoding provider for tests and local runs without network.

use super::{GeocodingProvider, ProviderError};
use crate::cache::GeocodeResult;
use crate::router::Coordinate;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Provider answering from in-memory scripts.
///
/// Unknown addresses yield [`ProviderError::NoResults`]. Unknown coordinates
/// resolve to a generated place at that coordinate, unless a reverse
/// outcome has been scripted for them.
#[derive(Debug, Default)]
pub struct StubProvider {
    search_outcomes: Mutex<HashMap<String, Result<GeocodeResult, ProviderError>>>,
    reverse_outcomes: Mutex<HashMap<Coordinate, Result<GeocodeResult, ProviderError>>>,
    delay: Option<Duration>,
    search_calls: AtomicUsize,
    reverse_calls: AtomicUsize,
}

/// Builds a place record the way a provider would
pub fn place(
    latitude: f64,
    longitude: f64,
    display_name: &str,
) -> Result<GeocodeResult, ProviderError> {
    let coordinate = Coordinate::new(latitude, longitude)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
    let mut address_components = HashMap::new();
    if let Some(city) = display_name.split(", ").nth(1) {
        address_components.insert(String::from("city"), city.to_string());
    }

    Ok(GeocodeResult {
        coordinate,
        display_name: display_name.to_string(),
        address_components,
        resolved_at: Utc::now(),
    })
}

impl StubProvider {
    /// An empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// A script with a few well known venues, used by the stubbed binary
    pub fn with_sample_places() -> Self {
        let samples = [
            (
                "Dam 1, Amsterdam",
                52.3730796,
                4.8924534,
                "Dam, Amsterdam, Nederland",
            ),
            (
                "Coolsingel 40, Rotterdam",
                51.9225,
                4.47917,
                "Stadhuis, Rotterdam, Nederland",
            ),
            (
                "Museumplein 6, Amsterdam",
                52.3579946,
                4.8686484,
                "Van Gogh Museum, Amsterdam, Nederland",
            ),
        ];

        samples
            .into_iter()
            .fold(Self::new(), |stub, (address, latitude, longitude, name)| {
                stub.with_search(address, place(latitude, longitude, name))
            })
    }

    /// Scripts the outcome of `search(address)`
    pub fn with_search(
        mut self,
        address: &str,
        outcome: Result<GeocodeResult, ProviderError>,
    ) -> Self {
        self.search_outcomes
            .get_mut()
            .insert(address.to_string(), outcome);
        self
    }

    /// Scripts the outcome of `reverse(coordinate)`
    pub fn with_reverse(
        mut self,
        coordinate: Coordinate,
        outcome: Result<GeocodeResult, ProviderError>,
    ) -> Self {
        self.reverse_outcomes.get_mut().insert(coordinate, outcome);
        self
    }

    /// Makes every call wait before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replaces the outcome of `search(address)` on a shared stub
    pub async fn set_search(&self, address: &str, outcome: Result<GeocodeResult, ProviderError>) {
        self.search_outcomes
            .lock()
            .await
            .insert(address.to_string(), outcome);
    }

    /// Number of `search` calls so far
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of `reverse` calls so far
    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait::async_trait]
impl GeocodingProvider for StubProvider {
    async fn search(&self, address: &str) -> Result<GeocodeResult, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        provider_debug!("(search) stub lookup for [{}].", address);
        self.pause().await;

        self.search_outcomes
            .lock()
            .await
            .get(address)
            .cloned()
            .unwrap_or(Err(ProviderError::NoResults))
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<GeocodeResult, ProviderError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        provider_debug!("(reverse) stub lookup for {}.", coordinate);
        self.pause().await;

        let scripted = self.reverse_outcomes.lock().await.get(&coordinate).cloned();
        match scripted {
            Some(outcome) => outcome,
            None => place(
                coordinate.latitude(),
                coordinate.longitude(),
                &format!("Stub place, {}", coordinate.cache_key()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_search() {
        crate::get_log_handle().await;
        ut_info!("(test_scripted_search) Start.");

        let stub = StubProvider::with_sample_places()
            .with_search("down", Err(ProviderError::Unavailable(String::from("503"))));

        let result = stub.search("Dam 1, Amsterdam").await.unwrap();
        assert_eq!(result.display_name, "Dam, Amsterdam, Nederland");
        assert_eq!(result.address_components.get("city").unwrap(), "Amsterdam");

        assert_eq!(stub.search("Nowhere").await, Err(ProviderError::NoResults));
        assert!(stub.search("down").await.unwrap_err().is_unavailable());
        assert_eq!(stub.search_calls(), 3);
        assert_eq!(stub.reverse_calls(), 0);

        ut_info!("(test_scripted_search) Success.");
    }

    #[tokio::test]
    async fn test_reverse_defaults_to_generated_place() {
        crate::get_log_handle().await;
        ut_info!("(test_reverse_defaults_to_generated_place) Start.");

        let scripted = Coordinate::new(0.0, -30.0).unwrap();
        let stub = StubProvider::new().with_reverse(scripted, Err(ProviderError::NoResults));

        let coordinate = Coordinate::new(52.37, 4.9).unwrap();
        let result = stub.reverse(coordinate).await.unwrap();
        assert_eq!(result.coordinate, coordinate);
        assert_eq!(result.display_name, "Stub place, 52.370000,4.900000");

        assert_eq!(stub.reverse(scripted).await, Err(ProviderError::NoResults));
        assert_eq!(stub.reverse_calls(), 2);

        ut_info!("(test_reverse_defaults_to_generated_place) Success.");
    }
}
