// src/query.rs

use crate::geopoint::{BoundingBox, Coordinate};

/// Fields requested for every imagery record.
pub const IMAGE_FIELDS: &str = "id,computed_geometry,thumb_1024_url,thumb_2048_url,captured_at,is_pano";

/// The two lookup modes of the imagery `images` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageryQuery {
    /// Images closest to a point.
    ClosestTo { center: Coordinate, limit: u32 },
    /// Images inside a longitude/latitude rectangle.
    Within { bbox: BoundingBox, limit: u32 },
}

impl ImageryQuery {
    pub fn closest_to(center: Coordinate, limit: u32) -> Self {
        ImageryQuery::ClosestTo { center, limit }
    }

    /// A square box reaching `radius_meters` from `center` in each direction.
    pub fn around(center: &Coordinate, radius_meters: f64, limit: u32) -> Self {
        ImageryQuery::Within {
            bbox: BoundingBox::around(center, radius_meters),
            limit,
        }
    }

    pub fn limit(&self) -> u32 {
        match self {
            ImageryQuery::ClosestTo { limit, .. } | ImageryQuery::Within { limit, .. } => *limit,
        }
    }

    /// URL parameters for this query, authenticated with `access_token`.
    pub(crate) fn to_params(&self, access_token: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("access_token", access_token.to_string()),
            ("fields", IMAGE_FIELDS.to_string()),
            ("limit", self.limit().to_string()),
        ];
        match self {
            // The closest-to point goes out latitude first.
            ImageryQuery::ClosestTo { center, .. } => {
                params.push((
                    "closeto",
                    format!("{},{}", center.latitude, center.longitude),
                ));
            }
            ImageryQuery::Within { bbox, .. } => {
                params.push(("bbox", bbox.to_string()));
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_to_params() {
        let center = Coordinate::new(48.8584, 2.2945).unwrap();
        let params = ImageryQuery::closest_to(center, 20).to_params("MLY|1|x");
        assert_eq!(
            params,
            vec![
                ("access_token", "MLY|1|x".to_string()),
                ("fields", IMAGE_FIELDS.to_string()),
                ("limit", "20".to_string()),
                ("closeto", "48.8584,2.2945".to_string()),
            ]
        );
    }

    #[test]
    fn test_bbox_params() {
        let center = Coordinate::new(0.0, 0.0).unwrap();
        let query = ImageryQuery::around(&center, 111_320.0, 50);
        let params = query.to_params("MLY|1|x");
        assert_eq!(params[2], ("limit", "50".to_string()));
        assert_eq!(params[3], ("bbox", "-1,-1,1,1".to_string()));
    }
}
