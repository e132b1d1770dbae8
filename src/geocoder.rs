// src/geocoder.rs

use crate::client::ExplorerClient;
use crate::error::ExplorerError;
use crate::geopoint::Coordinate;
use crate::types::common::NominatimPlace;
use crate::types::GeocodeResult;

impl ExplorerClient {
    /// Resolves a free-text address to a coordinate and display label.
    ///
    /// Returns `None` when the geocoder has no match, or when every attempt in the retry budget
    /// failed (timeout, non-2xx status, malformed body). Never returns an error; use
    /// [`ExplorerClient::try_resolve_address`] to tell those two cases apart.
    ///
    /// The query is expected to be trimmed and non-empty; callers short-circuit empty input
    /// before calling this.
    pub async fn resolve_address(&self, query: &str) -> Option<GeocodeResult> {
        match self.try_resolve_address(query).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Geocoding '{}' failed after retries: {}", query, e);
                None
            }
        }
    }

    /// Like [`ExplorerClient::resolve_address`], but surfaces the last transport failure.
    ///
    /// # Returns
    /// * `Ok(Some(result))` on a match.
    /// * `Ok(None)` when the provider answered with zero matches. This is not retried.
    /// * `Err(e)` once `geocode_attempts` consecutive attempts failed; `e` is the last failure.
    pub async fn try_resolve_address(
        &self,
        query: &str,
    ) -> Result<Option<GeocodeResult>, ExplorerError> {
        let attempts = self.config.geocode_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.geocode_once(query).await {
                Ok(result) => {
                    if result.is_none() {
                        log::info!("Geocoder returned no match for '{}'", query);
                    }
                    return Ok(result);
                }
                Err(e) if attempt < attempts && e.is_transient() => {
                    log::warn!(
                        "Geocoding attempt {}/{} for '{}' failed: {}. Retrying after {:?}",
                        attempt,
                        attempts,
                        query,
                        e,
                        self.config.geocode_retry_delay
                    );
                    attempt += 1;
                    tokio::time::sleep(self.config.geocode_retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn geocode_once(&self, query: &str) -> Result<Option<GeocodeResult>, ExplorerError> {
        let params = [
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];
        let places: Vec<NominatimPlace> = self
            ._get_with_url_params(&self.config.geocoder_url, &params)
            .await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };
        place_to_result(place, query).map(Some)
    }
}

fn place_to_result(place: NominatimPlace, query: &str) -> Result<GeocodeResult, ExplorerError> {
    let latitude = parse_degrees(&place.lat, "lat")?;
    let longitude = parse_degrees(&place.lon, "lon")?;
    let coordinate = Coordinate::new(latitude, longitude).map_err(|e| {
        ExplorerError::JsonDeserializationFailed(format!("Geocoder returned {}", e))
    })?;
    let label = place
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| query.to_string());
    Ok(GeocodeResult { coordinate, label })
}

// Nominatim sends coordinates as strings.
fn parse_degrees(raw: &str, field: &str) -> Result<f64, ExplorerError> {
    raw.trim().parse::<f64>().map_err(|e| {
        ExplorerError::JsonDeserializationFailed(format!("invalid {} '{}': {}", field, raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(lat: &str, lon: &str, name: Option<&str>) -> NominatimPlace {
        NominatimPlace {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_place_to_result_uses_display_name() {
        let r = place_to_result(
            place("48.8582599", "2.2945006", Some("Tour Eiffel, Paris")),
            "eiffel",
        )
        .unwrap();
        assert_eq!(r.label, "Tour Eiffel, Paris");
        assert_eq!(r.coordinate.latitude, 48.8582599);
        assert_eq!(r.coordinate.longitude, 2.2945006);
    }

    #[test]
    fn test_place_to_result_falls_back_to_query() {
        let r = place_to_result(place("1.5", "-2.5", None), "somewhere").unwrap();
        assert_eq!(r.label, "somewhere");
        let r = place_to_result(place("1.5", "-2.5", Some("  ")), "somewhere").unwrap();
        assert_eq!(r.label, "somewhere");
    }

    #[test]
    fn test_place_to_result_rejects_garbage_coordinates() {
        let err = place_to_result(place("north", "2.0", None), "q").unwrap_err();
        assert!(err.is_transient());
        let err = place_to_result(place("95.0", "2.0", None), "q").unwrap_err();
        assert!(err.is_transient());
    }
}
