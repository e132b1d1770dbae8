// src/client.rs

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;

/// The main client for resolving addresses and finding nearby street-level imagery.
///
/// `ExplorerClient` holds the [`ExplorerConfig`] (provider endpoints, limits, retry budget,
/// timeouts) and a `reqwest::Client` preconfigured with the identifying `User-Agent` and the
/// default request timeout. Feature areas add their operations as `impl ExplorerClient` blocks:
/// geocoding ([`ExplorerClient::resolve_address`]), imagery search
/// ([`ExplorerClient::find_nearest`]), the end-to-end [`ExplorerClient::explore`] pipeline and
/// preview downloads.
///
/// Every provider call is awaited to completion before the next one is issued; the client never
/// runs requests concurrently.
///
/// ```rust,no_run
/// use mapillary_explorer::{ExplorerClient, ExplorerConfig, ExplorerError};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), ExplorerError> {
/// let client = ExplorerClient::new(ExplorerConfig::from_env())?;
/// let token = ExplorerConfig::access_token_from_env();
///
/// if let Some(place) = client.resolve_address("Eiffel Tower, Paris").await {
///     let outcome = client
///         .find_nearest(place.coordinate, token.as_deref(), true)
///         .await;
///     println!("{}: {:?}", place.label, outcome.preview_url());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    pub(crate) config: ExplorerConfig,
    pub(crate) http_client: Client,
}

impl ExplorerClient {
    /// Creates a new `ExplorerClient`.
    ///
    /// # Errors
    /// Returns `ExplorerError::InvalidInput` if the configuration fails [`ExplorerConfig::validate`],
    /// `ExplorerError::InvalidUrl` if either endpoint is not an absolute URL, and
    /// `ExplorerError::InvalidHeaderValue` if the user agent cannot be sent as a header.
    pub fn new(config: ExplorerConfig) -> Result<Self, ExplorerError> {
        config.validate()?;

        for endpoint in [&config.geocoder_url, &config.imagery_url] {
            let parsed = Url::parse(endpoint).map_err(|e| {
                ExplorerError::InvalidUrl(format!("Endpoint '{}' is invalid: {}", endpoint, e))
            })?;
            if parsed.cannot_be_a_base() {
                return Err(ExplorerError::InvalidUrl(format!(
                    "Endpoint '{}' cannot be used as a base URL.",
                    endpoint
                )));
            }
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(ExplorerError::InvalidHeaderValue)?,
        );
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .default_headers(default_headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(ExplorerError::ReqwestError)?;

        log::debug!(
            "ExplorerClient initialized: geocoder={}, imagery={}, timeout={:?}",
            config.geocoder_url,
            config.imagery_url,
            config.request_timeout
        );

        Ok(Self {
            config,
            http_client,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    // Builds `endpoint?params` with each pair percent-encoded.
    pub(crate) fn _build_url(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Url, ExplorerError> {
        let mut url = Url::parse(endpoint).map_err(|e| {
            ExplorerError::InvalidUrl(format!("Endpoint '{}' is invalid: {}", endpoint, e))
        })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub(crate) async fn _get_with_url_params<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<R, ExplorerError> {
        let full_url = self._build_url(endpoint, params)?;

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("--- Explorer GET Request ---");
            log::debug!("Endpoint: {}", endpoint);
            for (key, value) in params {
                log::debug!("Param: {}={}", key, redact_param(key, value));
            }
            log::debug!("----------------------------");
        }

        let response = self
            .http_client
            .get(full_url)
            .send()
            .await
            .map_err(ExplorerError::ReqwestError)?;

        self._process_json_response(response, endpoint).await
    }

    pub(crate) async fn _get_bytes(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, ExplorerError> {
        let parsed = Url::parse(url)
            .map_err(|e| ExplorerError::InvalidUrl(format!("Image URL '{}' is invalid: {}", url, e)))?;

        log::debug!("Downloading image bytes: timeout={:?}", timeout);

        let mut request_builder = self.http_client.get(parsed);
        if let Some(timeout) = timeout {
            request_builder = request_builder.timeout(timeout);
        }
        let response = request_builder
            .send()
            .await
            .map_err(ExplorerError::ReqwestError)?;

        self._process_bytes_response(response).await
    }
}

// Access tokens only show their prefix in logs.
fn redact_param<'a>(key: &str, value: &'a str) -> std::borrow::Cow<'a, str> {
    if key == "access_token" {
        let prefix: String = value.chars().take(4).collect();
        std::borrow::Cow::Owned(format!("{}***", prefix))
    } else {
        std::borrow::Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_endpoint() {
        let config = ExplorerConfig::default().with_imagery_url("not a url");
        match ExplorerClient::new(config) {
            Err(ExplorerError::InvalidUrl(msg)) => assert!(msg.contains("not a url")),
            other => panic!("Expected InvalidUrl, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ExplorerConfig::default().with_radii(vec![]);
        assert!(matches!(
            ExplorerClient::new(config),
            Err(ExplorerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_build_url_encodes_params() {
        let client = ExplorerClient::new(ExplorerConfig::default()).unwrap();
        let url = client
            ._build_url(
                "https://graph.mapillary.com/images",
                &[("access_token", "MLY|1|abc".to_string()), ("bbox", "1,2,3,4".to_string())],
            )
            .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("access_token".to_string(), "MLY|1|abc".to_string()),
                ("bbox".to_string(), "1,2,3,4".to_string()),
            ]
        );
    }

    #[test]
    fn test_redact_param() {
        assert_eq!(redact_param("access_token", "MLY|123|secret"), "MLY|***");
        assert_eq!(redact_param("bbox", "1,2,3,4"), "1,2,3,4");
    }
}
