//! Struct definitions and implementations for [`Coordinate`].

use crate::error::GeoError;
use ordered_float::OrderedFloat;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::RangeInclusive;

/// Valid latitudes in degrees
pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitudes in degrees
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Number of decimals kept when a coordinate is used as a cache key.
/// Six decimals narrow a key to roughly 0.1 meter.
pub const CACHE_KEY_PRECISION: usize = 6;

/// A [`Coordinate`] is a validated latitude/longitude pair.
///
/// The fields are private: the only way to build one is through
/// [`Coordinate::new`], so every `Coordinate` in the service is known to
/// be in range. Ordered floats make the type usable as a map key.
#[derive(Debug, PartialEq, Hash, Eq, Copy, Clone)]
pub struct Coordinate {
    latitude: OrderedFloat<f64>,
    longitude: OrderedFloat<f64>,
}

impl Coordinate {
    /// Validates and builds a coordinate.
    ///
    /// # Errors
    /// [`GeoError::InvalidCoordinate`] if the latitude is outside
    /// [-90, 90], the longitude is outside [-180, 180], or either value is
    /// not a number.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !LATITUDE_RANGE.contains(&latitude) || !LONGITUDE_RANGE.contains(&longitude) {
            return Err(GeoError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude: OrderedFloat(latitude),
            longitude: OrderedFloat(longitude),
        })
    }

    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude.into_inner()
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude.into_inner()
    }

    /// Renders the coordinate with a fixed precision, e.g.
    /// `"52.370000,4.900000"`.
    pub fn cache_key(&self) -> String {
        // adding 0.0 turns -0.0 into 0.0
        format!(
            "{:.prec$},{:.prec$}",
            self.latitude() + 0.0,
            self.longitude() + 0.0,
            prec = CACHE_KEY_PRECISION
        )
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "({}, {})", self.latitude(), self.longitude())
    }
}

impl From<Coordinate> for geo::Point {
    fn from(coordinate: Coordinate) -> Self {
        geo::Point::new(coordinate.longitude(), coordinate.latitude())
    }
}
