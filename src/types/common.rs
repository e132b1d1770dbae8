use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::geopoint::Coordinate;
use crate::types::CapturedAt;

/// A resolved address: where it is and how the geocoder describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub coordinate: Coordinate,
    /// Human-readable place description. Falls back to the query when the provider has none.
    pub label: String,
}

/// One imagery record returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageryCandidate {
    pub id: String,
    /// `None` when the provider did not return usable computed geometry.
    pub coordinate: Option<Coordinate>,
    pub is_panoramic: bool,
    pub captured_at: Option<CapturedAt>,
    /// The 1024px thumbnail.
    pub thumbnail_url_small: Option<String>,
    /// The 2048px thumbnail.
    pub thumbnail_url_large: Option<String>,
}

impl ImageryCandidate {
    /// URL for the static preview: the small thumbnail, else the large one.
    pub fn preview_url(&self) -> Option<&str> {
        non_empty(&self.thumbnail_url_small).or_else(|| non_empty(&self.thumbnail_url_large))
    }

    /// URL for the full-resolution panorama view: the large thumbnail, else the small one.
    pub fn panorama_url(&self) -> Option<&str> {
        non_empty(&self.thumbnail_url_large).or_else(|| non_empty(&self.thumbnail_url_small))
    }

    /// Capture date as `YYYY-MM-DD`, when the provider reported one that can be read.
    pub fn capture_date(&self) -> Option<String> {
        self.captured_at.as_ref().and_then(CapturedAt::date_string)
    }

    /// Short attribution line, e.g. `ID: 123 | Captured: 2020-09-13`.
    pub fn caption(&self) -> String {
        match self.capture_date() {
            Some(date) => format!("ID: {} | Captured: {}", self.id, date),
            None => format!("ID: {}", self.id),
        }
    }
}

fn non_empty(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|u| !u.trim().is_empty())
}

/// What the nearest-imagery search produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found {
        candidate: ImageryCandidate,
        preview_url: String,
    },
    /// Nothing usable after exhausting every strategy. A valid answer, not an error.
    Empty,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, SearchOutcome::Empty)
    }

    pub fn candidate(&self) -> Option<&ImageryCandidate> {
        match self {
            SearchOutcome::Found { candidate, .. } => Some(candidate),
            SearchOutcome::Empty => None,
        }
    }

    pub fn preview_url(&self) -> Option<&str> {
        match self {
            SearchOutcome::Found { preview_url, .. } => Some(preview_url),
            SearchOutcome::Empty => None,
        }
    }

    pub fn is_panoramic(&self) -> bool {
        self.candidate().is_some_and(|c| c.is_panoramic)
    }
}

// Wire formats.

/// Envelope of the Graph API `images` endpoint. Records are kept raw so that one unreadable
/// record does not take its siblings down with it.
#[derive(Debug, Deserialize)]
pub(crate) struct ImagesResponse {
    #[serde(default)]
    pub data: Vec<Value>,
}

impl ImagesResponse {
    /// Candidates for every record with a usable id; the rest are dropped.
    pub(crate) fn into_candidates(self) -> Vec<ImageryCandidate> {
        self.data
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<ImageRecord>(raw) {
                Ok(record) => Some(ImageryCandidate::from(record)),
                Err(e) => {
                    log::debug!("Dropping unreadable image record: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub computed_geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "lenient")]
    pub thumb_1024_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub thumb_2048_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub captured_at: Option<CapturedAt>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_pano: Option<bool>,
}

/// GeoJSON point; `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    #[serde(default)]
    pub coordinates: Option<Vec<f64>>,
}

impl Geometry {
    fn coordinate(&self) -> Option<Coordinate> {
        match self.coordinates.as_deref() {
            Some([lon, lat]) => Coordinate::new(*lat, *lon).ok(),
            _ => None,
        }
    }
}

impl From<ImageRecord> for ImageryCandidate {
    fn from(record: ImageRecord) -> Self {
        ImageryCandidate {
            coordinate: record.computed_geometry.as_ref().and_then(Geometry::coordinate),
            id: record.id,
            is_panoramic: record.is_pano.unwrap_or(false),
            captured_at: record.captured_at,
            thumbnail_url_small: record.thumb_1024_url,
            thumbnail_url_large: record.thumb_2048_url,
        }
    }
}

/// One match from the Nominatim `search` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

// A field of the wrong shape reads as absent instead of failing the record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for image id, got {}",
            other
        ))),
    }
}
