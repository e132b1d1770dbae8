use crate::client::ExplorerClient;
use crate::error::ExplorerError;
use crate::resolver::AccessToken;
use crate::types::{GeocodeResult, SearchOutcome};

/// The result of one completed search.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    pub location: GeocodeResult,
    pub imagery: SearchOutcome,
    /// `true` when panoramas were preferred, none existed, and the closest image of any kind was
    /// used instead.
    pub panorama_fallback: bool,
}

/// Remembers the most recent successful search across render cycles.
///
/// Owned by the caller. Holds at most one entry; a new search replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    last: Option<SessionEntry>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&SessionEntry> {
        self.last.as_ref()
    }

    /// Stores `entry`, returning the one it replaced.
    pub fn record(&mut self, entry: SessionEntry) -> Option<SessionEntry> {
        self.last.replace(entry)
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

impl ExplorerClient {
    /// Geocodes `address`, finds imagery near it and records the result in `session`.
    ///
    /// With `prefer_panoramic`, a panorama is searched for first and the closest image of any kind
    /// is used when none exists.
    ///
    /// # Errors
    /// Fails fast, without any network call, with `ExplorerError::EmptyQuery` for a blank
    /// address and `ExplorerError::InvalidCredential` for a missing or malformed token.
    /// Returns `ExplorerError::AddressNotFound` when the address cannot be geocoded; `session` is
    /// left untouched in every error case. Finding no imagery is not an error: the entry then
    /// holds [`SearchOutcome::Empty`].
    ///
    /// ```rust,no_run
    /// use mapillary_explorer::{ExplorerClient, ExplorerConfig, ExplorerError, SearchSession};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), ExplorerError> {
    /// let client = ExplorerClient::new(ExplorerConfig::default())?;
    /// let mut session = SearchSession::new();
    /// let token = ExplorerConfig::access_token_from_env();
    ///
    /// let entry = client
    ///     .explore(&mut session, "Brandenburger Tor, Berlin", token.as_deref(), true)
    ///     .await?;
    /// println!("{} ({})", entry.location.label, entry.location.coordinate);
    /// if let Some(image) = entry.imagery.candidate() {
    ///     println!("{}", image.caption());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn explore<'s>(
        &self,
        session: &'s mut SearchSession,
        address: &str,
        credential: Option<&str>,
        prefer_panoramic: bool,
    ) -> Result<&'s SessionEntry, ExplorerError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ExplorerError::EmptyQuery);
        }
        AccessToken::parse(credential, &self.config.token_prefix)?;

        let location = self
            .resolve_address(address)
            .await
            .ok_or_else(|| ExplorerError::AddressNotFound(address.to_string()))?;

        let (imagery, panorama_fallback) = if prefer_panoramic {
            self.find_nearest_with_fallback(location.coordinate, credential)
                .await
        } else {
            (
                self.find_nearest(location.coordinate, credential, false)
                    .await,
                false,
            )
        };

        let entry: &'s SessionEntry = session.last.insert(SessionEntry {
            location,
            imagery,
            panorama_fallback,
        });
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geopoint::Coordinate;

    fn entry(label: &str) -> SessionEntry {
        SessionEntry {
            location: GeocodeResult {
                coordinate: Coordinate::new(1.0, 2.0).unwrap(),
                label: label.to_string(),
            },
            imagery: SearchOutcome::Empty,
            panorama_fallback: false,
        }
    }

    #[test]
    fn test_record_replaces_previous_entry() {
        let mut session = SearchSession::new();
        assert!(session.last().is_none());

        assert!(session.record(entry("first")).is_none());
        let replaced = session.record(entry("second")).unwrap();
        assert_eq!(replaced.location.label, "first");
        assert_eq!(session.last().unwrap().location.label, "second");

        session.clear();
        assert!(session.last().is_none());
    }
}
