//! External geocoding provider
//!
//! The service only sees the [`GeocodingProvider`] trait. The production
//! implementation talks to a Nominatim compatible HTTP API; a scripted stub
//! is available for tests and local runs.

#[macro_use]
pub mod macros;
pub mod nominatim;

#[cfg(any(test, feature = "stub_backends"))]
pub mod stub;

pub use nominatim::NominatimProvider;

use crate::cache::GeocodeResult;
use crate::router::Coordinate;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Ways a provider lookup can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The provider answered, but knows no such place
    NoResults,

    /// The provider could not be reached, timed out, or returned an
    /// error status
    Unavailable(String),

    /// The provider answered with something that could not be understood
    InvalidResponse(String),
}

impl ProviderError {
    /// True for infrastructure failures, as opposed to "no such place"
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProviderError::Unavailable(_))
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            ProviderError::NoResults => write!(f, "No results."),
            ProviderError::Unavailable(reason) => write!(f, "Provider unavailable: {}", reason),
            ProviderError::InvalidResponse(reason) => {
                write!(f, "Invalid provider response: {}", reason)
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Forward and reverse geocoding backend.
#[async_trait::async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Resolves a free-text address to its best matching place
    async fn search(&self, address: &str) -> Result<GeocodeResult, ProviderError>;

    /// Resolves a coordinate to the place at that position
    async fn reverse(&self, coordinate: Coordinate) -> Result<GeocodeResult, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unavailable() {
        assert!(ProviderError::Unavailable(String::from("timeout")).is_unavailable());
        assert!(!ProviderError::NoResults.is_unavailable());
        assert!(!ProviderError::InvalidResponse(String::from("bad json")).is_unavailable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ProviderError::Unavailable(String::from("status 503")).to_string(),
            "Provider unavailable: status 503"
        );
        assert_eq!(ProviderError::NoResults.to_string(), "No results.");
    }
}
