// src/requests.rs
use crate::error::FoodTruckError;

use reqwest::Response as HttpResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;

impl crate::FoodTruckClient {
    // Turns a raw response into `R` on 2xx, or into an `ApiError` built from the body otherwise.
    pub(crate) async fn _send_and_process_response<R: DeserializeOwned>(
        &self,
        response: HttpResponse,
        endpoint_context: &str,
    ) -> Result<R, FoodTruckError> {
        let status = response.status();
        let response_url = response.url().to_string(); // For logging

        let response_text = response.text().await.map_err(FoodTruckError::ReqwestError)?;

        if status.is_success() {
            log::debug!(
                "Request to '{}' successful. Response body: {}",
                endpoint_context,
                &response_text
            );
            serde_json::from_str::<R>(&response_text).map_err(|e| {
                log::error!(
                    "JSON Deserialization failed for successful response from '{}'. Status: {}. Error: {}. Body: {}",
                    response_url,
                    status,
                    e,
                    &response_text
                );
                FoodTruckError::JsonDeserializationFailed(format!(
                    "Failed to deserialize successful response from '{}': {}. Body: {}",
                    response_url, e, &response_text
                ))
            })
        } else {
            log::warn!(
                "Request to '{}' failed with status {}. Response body: {}",
                response_url,
                status,
                &response_text
            );
            // Attempt to parse the error response body as JSON
            let parsed_body: Value = match serde_json::from_str(&response_text) {
                Ok(json_val) => json_val,
                Err(_) => serde_json::json!({
                    "error": format!(
                        "HTTP Error {} with non-JSON body: {}",
                        status,
                        response_text.chars().take(100).collect::<String>()
                    )
                }),
            };
            Err(FoodTruckError::from_response(status.as_u16(), parsed_body))
        }
    }
}
