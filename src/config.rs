use crate::error::FoodTruckError;
use crate::geopoint::{Coordinate, SearchRadius, DEFAULT_SEARCH_RADIUS_KM};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "http://127.0.0.1:8000/api";

/// Palo Alto, used when the device position cannot be determined.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: 37.83593,
    longitude: -122.2503,
};

/// Application configuration, resolved once at startup and handed to the
/// [`FoodTruckClient`](crate::FoodTruckClient) and [`SearchView`](crate::SearchView).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the search backend, e.g. `http://127.0.0.1:8000/api`.
    pub api_host: String,
    /// Access token for the map provider. Passed through untouched to whatever renders the map.
    pub map_access_token: Option<String>,
    pub default_center: Coordinate,
    pub default_search_radius: SearchRadius,
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_host: DEFAULT_API_HOST.to_string(),
            map_access_token: None,
            default_center: DEFAULT_CENTER,
            default_search_radius: SearchRadius::default(),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn new(api_host: impl Into<String>) -> Self {
        AppConfig {
            api_host: api_host.into(),
            ..Default::default()
        }
    }

    pub fn with_map_access_token(mut self, token: impl Into<String>) -> Self {
        self.map_access_token = Some(token.into());
        self
    }

    pub fn with_default_center(mut self, center: Coordinate) -> Self {
        self.default_center = center;
        self
    }

    pub fn with_default_search_radius(mut self, radius: SearchRadius) -> Self {
        self.default_search_radius = radius;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Loads the configuration from the process environment, reading a `.env` file first if one exists.
    ///
    /// Recognised variables: `API_HOST`, `MAPBOX_API_KEY`, `DEFAULT_CENTER_LATITUDE`,
    /// `DEFAULT_CENTER_LONGITUDE`, `DEFAULT_SEARCH_RADIUS` and `REQUEST_TIMEOUT_SECS`.
    /// Unset variables take their defaults; malformed ones are a `ConfigError`.
    pub fn from_env() -> Result<Self, FoodTruckError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FoodTruckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                log::info!("API_HOST not set, using default: {}", DEFAULT_API_HOST);
                DEFAULT_API_HOST.to_string()
            });

        let map_access_token = lookup("MAPBOX_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if map_access_token.is_none() {
            log::warn!("MAPBOX_API_KEY not set, map tiles will not load");
        }

        let latitude = parse_or(&lookup, "DEFAULT_CENTER_LATITUDE", DEFAULT_CENTER.latitude)?;
        let longitude = parse_or(&lookup, "DEFAULT_CENTER_LONGITUDE", DEFAULT_CENTER.longitude)?;
        let default_center = Coordinate::new(latitude, longitude)
            .map_err(|e| FoodTruckError::ConfigError(format!("Invalid default center: {}", e)))?;

        let radius = parse_or(&lookup, "DEFAULT_SEARCH_RADIUS", DEFAULT_SEARCH_RADIUS_KM)?;
        let default_search_radius = SearchRadius::new(radius).map_err(|e| {
            FoodTruckError::ConfigError(format!("Invalid DEFAULT_SEARCH_RADIUS: {}", e))
        })?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_value::<u64>(
                "REQUEST_TIMEOUT_SECS",
                &raw,
            )?)),
            None => None,
        };

        Ok(AppConfig {
            api_host,
            map_access_token,
            default_center,
            default_search_radius,
            request_timeout,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, FoodTruckError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => {
            log::debug!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, FoodTruckError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| {
        log::warn!("Invalid {} value '{}': {}", key, raw, e);
        FoodTruckError::ConfigError(format!("Invalid {} value '{}': {}", key, raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_host, "http://127.0.0.1:8000/api");
        assert_eq!(config.default_search_radius.km(), 5.0);
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("API_HOST", " https://trucks.example.com/api "),
            ("MAPBOX_API_KEY", "pk.test"),
            ("DEFAULT_CENTER_LATITUDE", "37.7749"),
            ("DEFAULT_CENTER_LONGITUDE", "-122.4194"),
            ("DEFAULT_SEARCH_RADIUS", "2.5"),
            ("REQUEST_TIMEOUT_SECS", "10"),
        ]))
        .unwrap();

        assert_eq!(config.api_host, "https://trucks.example.com/api");
        assert_eq!(config.map_access_token.as_deref(), Some("pk.test"));
        assert_eq!(config.default_center, Coordinate::new(37.7749, -122.4194).unwrap());
        assert_eq!(config.default_search_radius.km(), 2.5);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let bad_radius = AppConfig::from_lookup(lookup_from(&[("DEFAULT_SEARCH_RADIUS", "-1")]));
        assert!(matches!(bad_radius, Err(FoodTruckError::ConfigError(_))));

        let bad_lat = AppConfig::from_lookup(lookup_from(&[("DEFAULT_CENTER_LATITUDE", "north")]));
        assert!(matches!(bad_lat, Err(FoodTruckError::ConfigError(_))));

        let out_of_range =
            AppConfig::from_lookup(lookup_from(&[("DEFAULT_CENTER_LONGITUDE", "200")]));
        assert!(matches!(out_of_range, Err(FoodTruckError::ConfigError(_))));
    }
}
