// src/types/mod.rs

pub mod common;
pub mod date;

pub use common::{GeocodeResult, ImageryCandidate, SearchOutcome};
pub use date::CapturedAt;
