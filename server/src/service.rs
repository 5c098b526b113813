//! Geolocation facade
//!
//! Validates caller input, serves geocoding lookups through the cache and
//! hands route requests to the optimizer. Built once at start-up and shared
//! by handle.

use crate::cache::{CachedLookup, GeocodeResult, GeocodeStore, MemoryStore};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::GeoError;
use crate::provider::{GeocodingProvider, ProviderError};
use crate::router::{self, haversine, Coordinate, RouteStop};
use anyhow::anyhow;
use chrono::Duration;
use std::future::Future;
use std::sync::Arc;

/// Most destinations [`GeolocationService::optimize_route`] accepts unless
/// configured otherwise
pub const DEFAULT_MAX_ROUTE_DESTINATIONS: usize = 1000;

/// How long lookups are remembered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachePolicy {
    /// Lifetime of a successful lookup
    pub ttl: Duration,

    /// Lifetime of a "no results" answer; `None` disables negative caching
    pub negative_ttl: Option<Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(600),
            negative_ttl: None,
        }
    }
}

impl CachePolicy {
    /// Reads the policy from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let negative_ttl = match config.negative_cache_ttl_s {
            0 => None,
            seconds => Some(seconds_to_duration(seconds)?),
        };

        Ok(Self {
            ttl: seconds_to_duration(config.cache_ttl_s)?,
            negative_ttl,
        })
    }
}

fn seconds_to_duration(seconds: u64) -> anyhow::Result<Duration> {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| anyhow!("{} seconds is out of range", seconds))
}

cfg_if::cfg_if! {
    if #[cfg(feature = "stub_backends")] {
        fn default_provider(_config: &Config) -> anyhow::Result<Arc<dyn GeocodingProvider>> {
            log::warn!("(default_provider) using the stub geocoding provider.");
            let provider: Arc<dyn GeocodingProvider> =
                Arc::new(crate::provider::stub::StubProvider::with_sample_places());
            Ok(provider)
        }
    } else {
        fn default_provider(config: &Config) -> anyhow::Result<Arc<dyn GeocodingProvider>> {
            log::info!("(default_provider) using geocoding provider at {}.", config.provider_url);
            let provider = crate::provider::NominatimProvider::new(
                &config.provider_url,
                &config.provider_user_agent,
                std::time::Duration::from_millis(config.provider_timeout_ms),
            )?;
            let provider: Arc<dyn GeocodingProvider> = Arc::new(provider);
            Ok(provider)
        }
    }
}

/// Geocoding and routing operations exposed to callers.
pub struct GeolocationService {
    provider: Arc<dyn GeocodingProvider>,
    store: Arc<dyn GeocodeStore>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    max_route_destinations: usize,
}

impl std::fmt::Debug for GeolocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeolocationService")
            .field("policy", &self.policy)
            .field("max_route_destinations", &self.max_route_destinations)
            .finish_non_exhaustive()
    }
}

impl GeolocationService {
    /// Assembles a service from its collaborators
    pub fn new(
        provider: Arc<dyn GeocodingProvider>,
        store: Arc<dyn GeocodeStore>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            provider,
            store,
            clock,
            policy,
            max_route_destinations: DEFAULT_MAX_ROUTE_DESTINATIONS,
        }
    }

    /// Caps the number of destinations a route request may carry
    pub fn with_max_route_destinations(mut self, max_route_destinations: usize) -> Self {
        self.max_route_destinations = max_route_destinations;
        self
    }

    /// Builds the service described by `config`: an in-memory cache, the
    /// wall clock, and either the HTTP provider or, with the
    /// `stub_backends` feature, the scripted stub.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let policy = CachePolicy::from_config(config)?;
        let store: Arc<dyn GeocodeStore> =
            Arc::new(MemoryStore::new(usize::try_from(config.cache_capacity)?));
        let provider = default_provider(config)?;
        let max_route_destinations = usize::try_from(config.max_route_destinations)?;

        Ok(Self::new(provider, store, Arc::new(SystemClock), policy)
            .with_max_route_destinations(max_route_destinations))
    }

    /// The cache store, e.g. for the sweeper
    pub fn store(&self) -> Arc<dyn GeocodeStore> {
        Arc::clone(&self.store)
    }

    /// The time source the cache is expired against
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// The active cache policy
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Resolves a free-text address.
    ///
    /// The address is used verbatim (case and spacing included) as the
    /// cache key.
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeoError> {
        if address.trim().is_empty() {
            return Err(GeoError::InvalidRequest(String::from(
                "address must not be empty",
            )));
        }

        let key = format!("search:{}", address);
        self.lookup(&key, || self.provider.search(address)).await
    }

    /// Resolves a coordinate to a place.
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GeocodeResult, GeoError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let key = format!("reverse:{}", coordinate.cache_key());
        self.lookup(&key, || self.provider.reverse(coordinate)).await
    }

    /// Suggests a visiting order for `destinations` starting at `start`.
    ///
    /// Points are `(latitude, longitude)` pairs. Nothing is computed unless
    /// every point is valid and there are at most `max_route_destinations`
    /// destinations.
    pub fn optimize_route(
        &self,
        start: (f64, f64),
        destinations: &[(f64, f64)],
    ) -> Result<Vec<RouteStop>, GeoError> {
        if destinations.len() > self.max_route_destinations {
            return Err(GeoError::InvalidRequest(format!(
                "{} destinations given, at most {} are allowed",
                destinations.len(),
                self.max_route_destinations
            )));
        }

        let start = Coordinate::new(start.0, start.1)?;
        let destinations = destinations
            .iter()
            .map(|(latitude, longitude)| Coordinate::new(*latitude, *longitude))
            .collect::<Result<Vec<Coordinate>, GeoError>>()?;

        Ok(router::optimize_route(start, &destinations))
    }

    /// Great-circle distance in kilometers between two
    /// `(latitude, longitude)` pairs.
    pub fn distance(&self, from: (f64, f64), to: (f64, f64)) -> Result<f64, GeoError> {
        let from = Coordinate::new(from.0, from.1)?;
        let to = Coordinate::new(to.0, to.1)?;
        Ok(haversine::distance(&from, &to))
    }

    /// Serves `key` from the cache, or asks the provider through `fetch`.
    ///
    /// No lock is held while the provider is called, so concurrent misses
    /// on one key may each reach the provider.
    async fn lookup<F, Fut>(&self, key: &str, fetch: F) -> Result<GeocodeResult, GeoError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<GeocodeResult, ProviderError>>,
    {
        match self.store.get(key, self.clock.now()).await {
            Some(CachedLookup::Found(result)) => {
                cache_debug!("(lookup) cache hit for [{}].", key);
                return Ok(result);
            }
            Some(CachedLookup::Missing) => {
                cache_debug!("(lookup) cached miss for [{}].", key);
                return Err(GeoError::NotFound);
            }
            None => cache_debug!("(lookup) cache miss for [{}].", key),
        }

        match fetch().await {
            Ok(result) => {
                self.store
                    .insert(
                        key,
                        CachedLookup::Found(result.clone()),
                        self.policy.ttl,
                        self.clock.now(),
                    )
                    .await;
                Ok(result)
            }
            Err(e) => {
                match &e {
                    ProviderError::NoResults => {
                        provider_info!("(lookup) no results for [{}].", key);
                        if let Some(negative_ttl) = self.policy.negative_ttl {
                            self.store
                                .insert(key, CachedLookup::Missing, negative_ttl, self.clock.now())
                                .await;
                        }
                    }
                    ProviderError::Unavailable(_) => {
                        provider_warn!("(lookup) provider unavailable for [{}]: {}", key, e);
                    }
                    ProviderError::InvalidResponse(_) => {
                        provider_error!("(lookup) bad provider response for [{}]: {}", key, e);
                    }
                }

                Err(GeoError::NotFound)
            }
        }
    }
}
