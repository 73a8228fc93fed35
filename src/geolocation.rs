// src/geolocation.rs

use crate::error::FoodTruckError;
use crate::geopoint::Coordinate;

/// A one-shot source for the device's current position.
#[allow(async_fn_in_trait)]
pub trait Geolocator {
    async fn current_position(&self) -> Result<Coordinate, FoodTruckError>;
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedGeolocator(pub Coordinate);

impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinate, FoodTruckError> {
        Ok(self.0)
    }
}

/// Stands in for a host with no location API at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedGeolocator;

impl Geolocator for UnsupportedGeolocator {
    async fn current_position(&self) -> Result<Coordinate, FoodTruckError> {
        Err(FoodTruckError::GeolocationUnavailable(
            "Geolocation is not supported on this host.".to_string(),
        ))
    }
}

/// Reads the device position from `DEVICE_LATITUDE` / `DEVICE_LONGITUDE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvGeolocator;

impl EnvGeolocator {
    pub(crate) fn position_from_lookup<F>(lookup: F) -> Result<Coordinate, FoodTruckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| -> Result<f64, FoodTruckError> {
            let raw = lookup(key).ok_or_else(|| {
                FoodTruckError::GeolocationUnavailable(format!("{} is not set.", key))
            })?;
            raw.trim().parse::<f64>().map_err(|e| {
                FoodTruckError::GeolocationUnavailable(format!(
                    "{} is not a number ('{}'): {}",
                    key, raw, e
                ))
            })
        };
        let latitude = read("DEVICE_LATITUDE")?;
        let longitude = read("DEVICE_LONGITUDE")?;
        Coordinate::new(latitude, longitude)
    }
}

impl Geolocator for EnvGeolocator {
    async fn current_position(&self) -> Result<Coordinate, FoodTruckError> {
        Self::position_from_lookup(|key| std::env::var(key).ok())
    }
}

/// Asks `geolocator` for the device position, falling back to `fallback` on any failure.
///
/// The fallback sets both latitude and longitude.
pub async fn resolve_initial_position<G: Geolocator>(
    geolocator: &G,
    fallback: Coordinate,
) -> Coordinate {
    match geolocator.current_position().await {
        Ok(position) => {
            log::debug!("Device position resolved to {}", position);
            position
        }
        Err(e) => {
            log::warn!(
                "Error getting geolocation: {}. Falling back to {}",
                e,
                fallback
            );
            fallback
        }
    }
}
