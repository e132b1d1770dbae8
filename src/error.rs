// src/error.rs
use reqwest::header::InvalidHeaderValue;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("URL parsing failed: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON processing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonDeserializationFailed(String),

    #[error("Provider returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid access token: {0}")]
    InvalidCredential(String),

    #[error("Address query is empty")]
    EmptyQuery,

    #[error("No geocoding result for address: {0}")]
    AddressNotFound(String),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(InvalidHeaderValue),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ExplorerError {
    /// Creates an `ExplorerError` from an HTTP status code and the (possibly non-JSON) response body.
    ///
    /// Mapillary's Graph API wraps failures as `{"error": {"message": ...}}`, Nominatim
    /// usually answers with plain text or HTML. Both are reduced to a single message.
    pub(crate) fn from_response(status_code: u16, response_body: &str) -> Self {
        let message = match serde_json::from_str::<Value>(response_body) {
            Ok(json) => json
                .get("error")
                .and_then(|e| {
                    e.get("message")
                        .and_then(|m| m.as_str())
                        .or_else(|| e.as_str())
                })
                .map(str::to_string)
                .unwrap_or_else(|| json.to_string()),
            Err(_) => {
                let trimmed = response_body.trim();
                if trimmed.is_empty() {
                    "empty response body".to_string()
                } else {
                    trimmed.chars().take(200).collect()
                }
            }
        };

        ExplorerError::HttpStatus {
            status: status_code,
            message,
        }
    }

    /// Whether the failure came from talking to a provider (timeout, connection,
    /// non-2xx status, malformed body) rather than from a local precondition.
    ///
    /// Transient failures are retried by the geocoder and skipped over by the
    /// radius cascade.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExplorerError::ReqwestError(_)
                | ExplorerError::JsonError(_)
                | ExplorerError::JsonDeserializationFailed(_)
                | ExplorerError::HttpStatus { .. }
        )
    }
}
