// src/ranker.rs

use std::cmp::Ordering;

use crate::geopoint::{great_circle_distance_meters, Coordinate};
use crate::types::ImageryCandidate;

/// A candidate with the values it was ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub is_panoramic: bool,
    /// Meters from the query origin; `f64::INFINITY` when the candidate has no coordinate.
    pub distance_m: f64,
    pub candidate: ImageryCandidate,
}

impl RankedCandidate {
    /// Whether this candidate may be returned as a search answer: it must have a location and a
    /// preview image, and be panoramic when `require_panoramic` is set.
    pub fn qualifies(&self, require_panoramic: bool) -> bool {
        (!require_panoramic || self.is_panoramic)
            && self.distance_m.is_finite()
            && self.candidate.preview_url().is_some()
    }
}

/// Orders candidates panoramas first, then nearest first.
///
/// Candidates without a coordinate sort after every located candidate with the same panorama
/// flag. The sort is stable, so exact ties keep their input order.
pub fn rank<I>(candidates: I, origin: &Coordinate) -> Vec<RankedCandidate>
where
    I: IntoIterator<Item = ImageryCandidate>,
{
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| RankedCandidate {
            is_panoramic: candidate.is_panoramic,
            distance_m: candidate
                .coordinate
                .as_ref()
                .map_or(f64::INFINITY, |c| great_circle_distance_meters(origin, c)),
            candidate,
        })
        .collect();

    ranked.sort_by(compare);
    ranked
}

fn compare(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.is_panoramic
        .cmp(&a.is_panoramic)
        .then_with(|| a.distance_m.total_cmp(&b.distance_m))
}

/// The first ranked candidate that [qualifies](RankedCandidate::qualifies).
pub fn select(ranked: &[RankedCandidate], require_panoramic: bool) -> Option<&RankedCandidate> {
    ranked.iter().find(|r| r.qualifies(require_panoramic))
}
