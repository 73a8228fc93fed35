// src/error.rs
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoodTruckError {
    #[error("HTTP request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("URL parsing failed: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON deserialization failed: {0}")]
    JsonDeserializationFailed(String),

    #[error("Search API error (HTTP {status}): {error}")]
    ApiError { status: u16, error: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Geolocation unavailable: {0}")]
    GeolocationUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SDK error: {0}")]
    SdkError(String),
}

impl FoodTruckError {
    /// Creates an `ApiError` from an HTTP status code and a JSON response body.
    ///
    /// The search backend reports failures as `{"error": "..."}`; anything else
    /// falls back to a generic message carrying the status.
    pub(crate) fn from_response(status_code: u16, response_body: Value) -> Self {
        let error_message = response_body
            .get("error")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("HTTP Error {}", status_code));

        FoodTruckError::ApiError {
            status: status_code,
            error: error_message,
        }
    }
}
