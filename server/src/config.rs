//! # Config
//!
//! Define and implement config options for module

use config::{ConfigError, Environment};
use dotenv::dotenv;
use serde::Deserialize;

/// struct holding configuration options
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// port to be used for the REST server
    pub docker_port_rest: u16,

    /// base url of the geocoding provider (search/reverse API)
    pub provider_url: String,

    /// user agent sent to the geocoding provider
    pub provider_user_agent: String,

    /// timeout for a single provider request, in milliseconds
    pub provider_timeout_ms: u64,

    /// how long a successful lookup stays cached, in seconds
    pub cache_ttl_s: u64,

    /// maximum number of cached lookups
    pub cache_capacity: u64,

    /// interval between cache sweeps, in seconds
    pub cache_sweep_interval_s: u64,

    /// how long a "no results" answer stays cached, in seconds. 0 disables
    /// negative caching.
    pub negative_cache_ttl_s: u64,

    /// most destinations accepted by a single route request
    pub max_route_destinations: u64,

    /// path to log configuration YAML file
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        log::warn!("(default) Creating Config object with default values.");
        Self::new()
    }
}

impl Config {
    /// Default values for Config
    pub fn new() -> Self {
        Config {
            docker_port_rest: 8000,
            provider_url: String::from("https://nominatim.openstreetmap.org"),
            provider_user_agent: format!("svc-geolocation/{}", env!("CARGO_PKG_VERSION")),
            provider_timeout_ms: 10_000,
            cache_ttl_s: 600,
            cache_capacity: 1000,
            cache_sweep_interval_s: 120,
            negative_cache_ttl_s: 0,
            max_route_destinations: 1000,
            log_config: String::from("log4rs.yaml"),
        }
    }

    /// Create a new `Config` object using environment variables
    pub fn try_from_env() -> Result<Self, ConfigError> {
        // read .env file if present
        dotenv().ok();
        let default_config = Config::default();

        config::Config::builder()
            .set_default("docker_port_rest", default_config.docker_port_rest)?
            .set_default("provider_url", default_config.provider_url)?
            .set_default("provider_user_agent", default_config.provider_user_agent)?
            .set_default("provider_timeout_ms", default_config.provider_timeout_ms)?
            .set_default("cache_ttl_s", default_config.cache_ttl_s)?
            .set_default("cache_capacity", default_config.cache_capacity)?
            .set_default(
                "cache_sweep_interval_s",
                default_config.cache_sweep_interval_s,
            )?
            .set_default("negative_cache_ttl_s", default_config.negative_cache_ttl_s)?
            .set_default(
                "max_route_destinations",
                default_config.max_route_destinations,
            )?
            .set_default("log_config", default_config.log_config)?
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
