use std::time::Duration;

use crate::error::ExplorerError;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_IMAGERY_URL: &str = "https://graph.mapillary.com/images";
pub const DEFAULT_USER_AGENT: &str = "MapillaryExplorer/1.0 (edu/demo)";
/// Prefix every Mapillary client access token starts with.
pub const DEFAULT_TOKEN_PREFIX: &str = "MLY|";
/// Search radii in meters for the bounding-box cascade, smallest first.
pub const DEFAULT_RADII_METERS: [f64; 7] = [150.0, 300.0, 600.0, 1_200.0, 3_000.0, 6_000.0, 10_000.0];

pub const ENV_ACCESS_TOKEN: &str = "MAPILLARY_TOKEN";
pub const ENV_GEOCODER_URL: &str = "MAPILLARY_EXPLORER_GEOCODER_URL";
pub const ENV_IMAGERY_URL: &str = "MAPILLARY_EXPLORER_IMAGERY_URL";
pub const ENV_USER_AGENT: &str = "MAPILLARY_EXPLORER_USER_AGENT";

/// Endpoints, limits and timing used by [`crate::ExplorerClient`].
///
/// `Default` matches the public Nominatim and Mapillary Graph API services.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    pub geocoder_url: String,
    pub imagery_url: String,
    /// Sent as `User-Agent`; Nominatim's usage policy requires an identifying one.
    pub user_agent: String,
    /// Total geocoding attempts, including the first one.
    pub geocode_attempts: u32,
    pub geocode_retry_delay: Duration,
    pub request_timeout: Duration,
    pub panorama_timeout: Duration,
    /// Result limit for the closest-to-point query.
    pub point_limit: u32,
    /// Result limit for each bounding-box query.
    pub bbox_limit: u32,
    pub radii_meters: Vec<f64>,
    pub token_prefix: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            imagery_url: DEFAULT_IMAGERY_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geocode_attempts: 3,
            geocode_retry_delay: Duration::from_millis(800),
            request_timeout: Duration::from_secs(20),
            panorama_timeout: Duration::from_secs(30),
            point_limit: 20,
            bbox_limit: 50,
            radii_meters: DEFAULT_RADII_METERS.to_vec(),
            token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
        }
    }
}

impl ExplorerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with endpoint and user-agent overrides taken from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = env_non_empty(ENV_GEOCODER_URL) {
            config.geocoder_url = url;
        }
        if let Some(url) = env_non_empty(ENV_IMAGERY_URL) {
            config.imagery_url = url;
        }
        if let Some(agent) = env_non_empty(ENV_USER_AGENT) {
            config.user_agent = agent;
        }
        log::debug!(
            "ExplorerConfig from environment: geocoder={}, imagery={}",
            config.geocoder_url,
            config.imagery_url
        );
        config
    }

    /// Reads the Mapillary access token from `MAPILLARY_TOKEN`. The value is not validated here.
    pub fn access_token_from_env() -> Option<String> {
        env_non_empty(ENV_ACCESS_TOKEN)
    }

    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = url.into();
        self
    }

    pub fn with_imagery_url(mut self, url: impl Into<String>) -> Self {
        self.imagery_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_geocode_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.geocode_attempts = attempts;
        self.geocode_retry_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_panorama_timeout(mut self, timeout: Duration) -> Self {
        self.panorama_timeout = timeout;
        self
    }

    pub fn with_limits(mut self, point_limit: u32, bbox_limit: u32) -> Self {
        self.point_limit = point_limit;
        self.bbox_limit = bbox_limit;
        self
    }

    pub fn with_radii(mut self, radii_meters: Vec<f64>) -> Self {
        self.radii_meters = radii_meters;
        self
    }

    pub fn with_token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.token_prefix = prefix.into();
        self
    }

    /// Checks the configuration for values that would make every search pointless.
    pub fn validate(&self) -> Result<(), ExplorerError> {
        if self.geocode_attempts == 0 {
            return Err(ExplorerError::InvalidInput(
                "geocode_attempts must be at least 1.".to_string(),
            ));
        }
        if self.point_limit == 0 || self.bbox_limit == 0 {
            return Err(ExplorerError::InvalidInput(
                "Query result limits must be at least 1.".to_string(),
            ));
        }
        if self.radii_meters.is_empty() {
            return Err(ExplorerError::InvalidInput(
                "At least one search radius is required.".to_string(),
            ));
        }
        if let Some(bad) = self
            .radii_meters
            .iter()
            .find(|r| !r.is_finite() || **r <= 0.0)
        {
            return Err(ExplorerError::InvalidInput(format!(
                "Search radius {} must be a positive, finite number of meters.",
                bad
            )));
        }
        if self.token_prefix.is_empty() {
            return Err(ExplorerError::InvalidInput(
                "token_prefix cannot be empty.".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
