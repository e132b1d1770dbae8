// src/resolver.rs

use std::fmt;

use crate::client::ExplorerClient;
use crate::error::ExplorerError;
use crate::geopoint::Coordinate;
use crate::query::ImageryQuery;
use crate::ranker::{rank, select, RankedCandidate};
use crate::types::common::ImagesResponse;
use crate::types::{ImageryCandidate, SearchOutcome};

/// A Mapillary client access token that passed the local format check.
///
/// The value is otherwise opaque. `Debug` and `Display` only show the prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Accepts `raw` if it starts with `prefix` (Mapillary tokens start with `MLY|`). The value is
    /// taken as given; surrounding whitespace fails the prefix check.
    pub fn parse(raw: Option<&str>, prefix: &str) -> Result<Self, ExplorerError> {
        match raw {
            None | Some("") => Err(ExplorerError::InvalidCredential(
                "no access token provided".to_string(),
            )),
            Some(token) if !token.starts_with(prefix) => Err(ExplorerError::InvalidCredential(
                format!("access token must start with '{}'", prefix),
            )),
            Some(token) => Ok(AccessToken(token.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self)
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "{}***", prefix)
    }
}

impl ExplorerClient {
    /// Finds the best imagery near `origin` using the configured search radii.
    ///
    /// See [`ExplorerClient::find_nearest_within`].
    pub async fn find_nearest(
        &self,
        origin: Coordinate,
        credential: Option<&str>,
        require_panoramic: bool,
    ) -> SearchOutcome {
        self.find_nearest_within(
            origin,
            credential,
            require_panoramic,
            &self.config.radii_meters,
        )
        .await
    }

    /// Finds the best imagery near `origin`.
    ///
    /// 1. A missing credential, or one without the token prefix, returns
    ///    [`SearchOutcome::Empty`] without touching the network.
    /// 2. One closest-to-point query. If it yields a qualifying candidate (panoramic when
    ///    `require_panoramic` is set), that candidate is the answer.
    /// 3. Otherwise a bounding-box query per radius, smallest radius first. The first radius with a
    ///    qualifying candidate wins; a radius whose query fails is skipped.
    /// 4. [`SearchOutcome::Empty`] if nothing qualified.
    ///
    /// Candidates without a location or without any thumbnail are never returned. When
    /// `require_panoramic` finds nothing, callers wanting "closest of any kind" call again with
    /// `false`, or use [`ExplorerClient::find_nearest_with_fallback`].
    pub async fn find_nearest_within(
        &self,
        origin: Coordinate,
        credential: Option<&str>,
        require_panoramic: bool,
        radii_meters: &[f64],
    ) -> SearchOutcome {
        let token = match AccessToken::parse(credential, &self.config.token_prefix) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Skipping imagery search: {}", e);
                return SearchOutcome::Empty;
            }
        };

        let direct = ImageryQuery::closest_to(origin, self.config.point_limit);
        match self.query_images(&direct, &token).await {
            Ok(candidates) if !candidates.is_empty() => {
                let ranked = rank(candidates, &origin);
                if let Some(outcome) = outcome_from(&ranked, require_panoramic) {
                    log::info!("Closest-to-point query at {} found imagery", origin);
                    return outcome;
                }
                log::debug!(
                    "Closest-to-point query returned {} candidates, none qualifying (require_panoramic={})",
                    ranked.len(),
                    require_panoramic
                );
            }
            Ok(_) => log::debug!("Closest-to-point query at {} returned no imagery", origin),
            Err(e) => log::warn!("Closest-to-point query at {} failed: {}", origin, e),
        }

        let mut radii: Vec<f64> = radii_meters
            .iter()
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
            .collect();
        radii.sort_by(f64::total_cmp);

        for radius in radii {
            let query = ImageryQuery::around(&origin, radius, self.config.bbox_limit);
            let candidates = match self.query_images(&query, &token).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    log::warn!("Bounding-box query at {} m failed, skipping: {}", radius, e);
                    continue;
                }
            };
            if candidates.is_empty() {
                log::debug!("No imagery within {} m", radius);
                continue;
            }
            let ranked = rank(candidates, &origin);
            if let Some(outcome) = outcome_from(&ranked, require_panoramic) {
                log::info!("Found imagery within {} m of {}", radius, origin);
                return outcome;
            }
            log::debug!(
                "{} candidates within {} m, none qualifying (require_panoramic={})",
                ranked.len(),
                radius,
                require_panoramic
            );
        }

        log::info!(
            "No imagery found near {} (require_panoramic={})",
            origin,
            require_panoramic
        );
        SearchOutcome::Empty
    }

    /// Prefers a panorama; if none exists anywhere in the cascade, returns the closest image of
    /// any kind. The flag is `true` when the second, non-panoramic search was needed.
    pub async fn find_nearest_with_fallback(
        &self,
        origin: Coordinate,
        credential: Option<&str>,
    ) -> (SearchOutcome, bool) {
        let outcome = self.find_nearest(origin, credential, true).await;
        if outcome.is_panoramic() {
            return (outcome, false);
        }
        log::info!("No panoramic imagery near {}, falling back to any imagery", origin);
        (self.find_nearest(origin, credential, false).await, true)
    }

    /// Runs one `images` query and converts the records into candidates.
    pub(crate) async fn query_images(
        &self,
        query: &ImageryQuery,
        token: &AccessToken,
    ) -> Result<Vec<ImageryCandidate>, ExplorerError> {
        let params = query.to_params(token.as_str());
        let response: ImagesResponse = self
            ._get_with_url_params(&self.config.imagery_url, &params)
            .await?;
        Ok(response.into_candidates())
    }
}

fn outcome_from(ranked: &[RankedCandidate], require_panoramic: bool) -> Option<SearchOutcome> {
    let chosen = select(ranked, require_panoramic)?;
    let preview_url = chosen.candidate.preview_url()?.to_string();
    log::debug!(
        "Selected image {} ({:.1} m, panoramic={})",
        chosen.candidate.id,
        chosen.distance_m,
        chosen.is_panoramic
    );
    Some(SearchOutcome::Found {
        candidate: chosen.candidate.clone(),
        preview_url,
    })
}
