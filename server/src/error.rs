//! Errors returned to callers of the geolocation service.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Error taxonomy of the geolocation facade.
///
/// Provider and network failures never appear here directly: they are
/// logged where they happen and reported as [`GeoError::NotFound`].
#[derive(Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180]
    InvalidCoordinate {
        /// The rejected latitude
        latitude: f64,
        /// The rejected longitude
        longitude: f64,
    },

    /// Malformed or missing request fields
    InvalidRequest(String),

    /// The provider had no answer, failed, or could not be reached
    NotFound,
}

impl Display for GeoError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            GeoError::InvalidCoordinate {
                latitude,
                longitude,
            } => write!(
                f,
                "Invalid coordinate ({}, {}): latitude must be within [-90, 90] and longitude within [-180, 180].",
                latitude, longitude
            ),
            GeoError::InvalidRequest(reason) => write!(f, "Invalid request: {}", reason),
            GeoError::NotFound => write!(f, "Location not found."),
        }
    }
}

impl std::error::Error for GeoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = GeoError::InvalidCoordinate {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert!(error.to_string().starts_with("Invalid coordinate (91, 0)"));

        let error = GeoError::InvalidRequest(String::from("address must not be empty"));
        assert_eq!(
            error.to_string(),
            "Invalid request: address must not be empty"
        );

        assert_eq!(GeoError::NotFound.to_string(), "Location not found.");
    }
}
