// src/client.rs

use crate::config::AppConfig;
use crate::error::FoodTruckError;
use crate::food_truck::{FoodTruckRecord, SearchResponse};
use crate::geopoint::{Coordinate, SearchRadius};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// Anything that can answer a nearby-food-truck search.
///
/// [`FoodTruckClient`] is the HTTP implementation; [`SearchView`](crate::SearchView) is generic
/// over this trait so the view can be driven by a fake in tests or by an alternative transport.
#[allow(async_fn_in_trait)]
pub trait SearchBackend {
    /// Returns the food trucks within `radius` of `coordinate`, nearest first.
    async fn search(
        &self,
        coordinate: Coordinate,
        radius: SearchRadius,
    ) -> Result<Vec<FoodTruckRecord>, FoodTruckError>;
}

/// The client for the food truck search API.
///
/// `FoodTruckClient` holds the normalized API host and an underlying `reqwest::Client`.
/// It issues a single `GET {api_host}/search/?lat=..&lng=..&radius=..` per search and
/// unwraps the `data` field of the response envelope. There are no retries and no
/// authentication headers.
///
/// ```rust,no_run
/// use meals_on_heels::{Coordinate, FoodTruckClient, FoodTruckError, SearchRadius};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), FoodTruckError> {
/// let client = FoodTruckClient::new("http://127.0.0.1:8000/api")?;
/// let here = Coordinate::new(37.7749, -122.4194)?;
///
/// let trucks = client.search(here, SearchRadius::default()).await?;
/// for truck in &trucks {
///     println!("{:?} - {}", truck.applicant, truck.distance_label());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FoodTruckClient {
    pub api_host: String,
    pub(crate) http_client: Client,
}

impl FoodTruckClient {
    /// Creates a new `FoodTruckClient` with default HTTP settings.
    ///
    /// `api_host` is the base URL the `search/` endpoint hangs off, e.g. `"http://127.0.0.1:8000/api"`.
    /// A missing scheme defaults to `http://` and trailing slashes are removed.
    pub fn new(api_host: &str) -> Result<Self, FoodTruckError> {
        let http_client = Client::builder()
            .build()
            .map_err(FoodTruckError::ReqwestError)?;
        Self::with_http_client(api_host, http_client)
    }

    /// Creates a client from the application configuration, applying its request timeout if set.
    pub fn from_config(config: &AppConfig) -> Result<Self, FoodTruckError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(FoodTruckError::ReqwestError)?;
        Self::with_http_client(&config.api_host, http_client)
    }

    /// Creates a client that sends its requests through an existing `reqwest::Client`.
    pub fn with_http_client(api_host: &str, http_client: Client) -> Result<Self, FoodTruckError> {
        let mut temp_url_string = api_host.trim().to_string();

        // Ensure scheme is present
        if !temp_url_string.starts_with("http://") && !temp_url_string.starts_with("https://") {
            temp_url_string = format!("http://{}", temp_url_string);
        }

        let parsed_host = Url::parse(&temp_url_string)?;

        if parsed_host.cannot_be_a_base() || parsed_host.host_str().is_none() {
            return Err(FoodTruckError::SdkError(format!(
                "The api_host '{}' resolved to '{}', which cannot be a base URL. Please provide a full base URL (e.g., http://127.0.0.1:8000/api).",
                api_host, parsed_host
            )));
        }

        let final_api_host = parsed_host.as_str().trim_end_matches('/').to_string();

        log::debug!(
            "FoodTruckClient initialized with api_host: {}",
            final_api_host
        );

        Ok(Self {
            api_host: final_api_host,
            http_client,
        })
    }

    /// Searches for food trucks within `radius` kilometres of `coordinate`.
    ///
    /// # Returns
    ///
    /// The records in the order the server ranked them (nearest first). An empty vector is a
    /// successful "nothing nearby" answer, not an error.
    ///
    /// # Errors
    ///
    /// * `ReqwestError` on connection failures and timeouts.
    /// * `ApiError` on any non-2xx status; the message comes from the backend's `error` field.
    /// * `JsonDeserializationFailed` when the body is not the expected envelope.
    pub async fn search(
        &self,
        coordinate: Coordinate,
        radius: SearchRadius,
    ) -> Result<Vec<FoodTruckRecord>, FoodTruckError> {
        let params = [
            ("lat".to_string(), coordinate.latitude.to_string()),
            ("lng".to_string(), coordinate.longitude.to_string()),
            ("radius".to_string(), radius.km().to_string()),
        ];

        let response: SearchResponse = self._get_with_url_params("search/", &params).await?;

        if let Some(error) = &response.error {
            log::warn!("Search succeeded but backend reported: {}", error);
        }
        log::debug!(
            "Search around {} within {} km returned {} food trucks",
            coordinate,
            radius,
            response.data.len()
        );

        Ok(response.data)
    }

    // Joins the endpoint onto the host without dropping the host's path (e.g. `/api`).
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url, FoodTruckError> {
        let full_url_str = format!("{}/{}", self.api_host, endpoint.trim_start_matches('/'));
        Url::parse(&full_url_str).map_err(|e| {
            FoodTruckError::InvalidUrl(format!(
                "Failed to join api_host '{}' with endpoint '{}': {}",
                self.api_host, endpoint, e
            ))
        })
    }

    pub(crate) async fn _get_with_url_params<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<R, FoodTruckError> {
        let mut full_url = self.endpoint_url(endpoint)?;

        if !params.is_empty() {
            let mut pairs = full_url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        log::debug!("Preparing GET request: URL={}", full_url.as_str());

        let response = self
            .http_client
            .get(full_url)
            .send()
            .await
            .map_err(FoodTruckError::ReqwestError)?;

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("--- Search API Response ---");
            log::debug!("Status: {}", response.status());
            for (name, value) in response.headers() {
                log::debug!("Header: {}: {:?}", name, value);
            }
        }

        self._send_and_process_response(response, endpoint).await
    }
}

impl SearchBackend for FoodTruckClient {
    async fn search(
        &self,
        coordinate: Coordinate,
        radius: SearchRadius,
    ) -> Result<Vec<FoodTruckRecord>, FoodTruckError> {
        FoodTruckClient::search(self, coordinate, radius).await
    }
}
