// src/geopoint.rs

use crate::error::FoodTruckError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default search radius in kilometres.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 5.0;

/// Represents a geographical point.
///
/// Deserialization goes through [`Coordinate::new`], so out-of-range input is rejected.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new `Coordinate`.
    ///
    /// # Errors
    /// Returns `FoodTruckError::InvalidInput` if latitude is not between -90 and 90,
    /// or longitude is not between -180 and 180. NaN is rejected by both checks.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, FoodTruckError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(FoodTruckError::InvalidInput(format!(
                "Latitude must be between -90 and 90 degrees, got {}.",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(FoodTruckError::InvalidInput(format!(
                "Longitude must be between -180 and 180 degrees, got {}.",
                longitude
            )));
        }
        Ok(Coordinate {
            latitude,
            longitude,
        })
    }

    /// Map widgets take `[longitude, latitude]` pairs.
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = FoodTruckError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

/// Serde `deserialize_with` helper for a bare latitude field.
pub(crate) fn deserialize_latitude<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let latitude = f64::deserialize(deserializer)?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(serde::de::Error::custom(format!(
            "latitude must be between -90 and 90 degrees, got {}",
            latitude
        )));
    }
    Ok(latitude)
}

/// Serde `deserialize_with` helper for a bare longitude field.
pub(crate) fn deserialize_longitude<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let longitude = f64::deserialize(deserializer)?;
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(serde::de::Error::custom(format!(
            "longitude must be between -180 and 180 degrees, got {}",
            longitude
        )));
    }
    Ok(longitude)
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Maximum distance, in kilometres, of results returned by the backend.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct SearchRadius(f64);

impl SearchRadius {
    /// Creates a new `SearchRadius`. The radius must be a positive, finite number.
    pub fn new(km: f64) -> Result<Self, FoodTruckError> {
        if !km.is_finite() || km <= 0.0 {
            return Err(FoodTruckError::InvalidInput(format!(
                "Search radius must be a positive number, got {}.",
                km
            )));
        }
        Ok(SearchRadius(km))
    }

    pub fn km(&self) -> f64 {
        self.0
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        SearchRadius(DEFAULT_SEARCH_RADIUS_KM)
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
