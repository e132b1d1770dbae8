use crate::error::ExplorerError;

use reqwest::Response as HttpResponse;
use serde::de::DeserializeOwned;

impl crate::ExplorerClient {
    // Turns a provider response into `R`, or a status/deserialization error.
    pub(crate) async fn _process_json_response<R: DeserializeOwned>(
        &self,
        response: HttpResponse,
        endpoint_context: &str,
    ) -> Result<R, ExplorerError> {
        let status = response.status();

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("--- Explorer Response ---");
            log::debug!("Status: {}", status);
            for (name, value) in response.headers() {
                log::debug!("Header: {}: {:?}", name, value);
            }
        }

        let response_text = response.text().await.map_err(ExplorerError::ReqwestError)?;

        if status.is_success() {
            serde_json::from_str::<R>(&response_text).map_err(|e| {
                log::warn!(
                    "JSON deserialization failed for successful response from '{}'. Error: {}. Body: {}",
                    endpoint_context,
                    e,
                    snippet(&response_text)
                );
                ExplorerError::JsonDeserializationFailed(format!(
                    "Failed to deserialize response from '{}': {}",
                    endpoint_context, e
                ))
            })
        } else {
            log::warn!(
                "Request to '{}' failed with status {}. Body: {}",
                endpoint_context,
                status,
                snippet(&response_text)
            );
            Err(ExplorerError::from_response(status.as_u16(), &response_text))
        }
    }

    pub(crate) async fn _process_bytes_response(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<u8>, ExplorerError> {
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    log::debug!("Could not read body of failed image download: {}", e);
                    String::new()
                }
            };
            log::warn!("Image download failed with status {}", status);
            return Err(ExplorerError::from_response(status.as_u16(), &body));
        }
        let bytes = response.bytes().await.map_err(ExplorerError::ReqwestError)?;
        log::debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 500;
    if body.chars().count() > MAX {
        let mut s: String = body.chars().take(MAX).collect();
        s.push_str("...");
        s
    } else {
        body.to_string()
    }
}
