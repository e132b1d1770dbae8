// src/geopoint.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

/// Meters spanned by one degree of latitude.
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Represents a geographical point in decimal degrees.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new `Coordinate`.
    ///
    /// # Errors
    /// Returns `ExplorerError::InvalidCoordinate` if either value is not finite, if latitude is
    /// not between -90 and 90, or if longitude is not between -180 and 180.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ExplorerError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ExplorerError::InvalidCoordinate(format!(
                "latitude {} must be a finite value between -90 and 90 degrees",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ExplorerError::InvalidCoordinate(format!(
                "longitude {} must be a finite value between -180 and 180 degrees",
                longitude
            )));
        }
        Ok(Coordinate {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        great_circle_distance_meters(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Approximate latitude/longitude half-extents, in degrees, of a square `meters` wide
/// around `latitude`.
///
/// The longitude offset is scaled by `cos(latitude)` for meridian convergence. Good enough
/// for bounding-box filters of a few tens of kilometers; never use it for ranking.
pub fn meters_to_degree_offsets(latitude: f64, meters: f64) -> (f64, f64) {
    let delta_lat = meters / METERS_PER_DEGREE_LATITUDE;
    let delta_lon = delta_lat * latitude.to_radians().cos();
    (delta_lat, delta_lon)
}

/// Great-circle distance using the haversine formula. Output in meters.
pub fn great_circle_distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// A longitude/latitude rectangle used as a geographic query filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Builds the box centered on `center` extending roughly `radius_meters` in each direction.
    pub fn around(center: &Coordinate, radius_meters: f64) -> Self {
        let (d_lat, d_lon) = meters_to_degree_offsets(center.latitude, radius_meters);
        BoundingBox {
            min_lon: center.longitude - d_lon,
            min_lat: center.latitude - d_lat,
            max_lon: center.longitude + d_lon,
            max_lat: center.latitude + d_lat,
        }
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lon..=self.max_lon).contains(&point.longitude)
    }
}

/// Formats as `min_lon,min_lat,max_lon,max_lat`, the order the imagery API expects.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}
