pub mod client;
pub mod config;
pub mod error;
pub mod geocoder;
pub mod geopoint;
pub mod preview;
pub mod query;
pub mod ranker;
mod requests;
pub mod resolver;
pub mod session;
pub mod types;

pub use client::ExplorerClient;
pub use config::ExplorerConfig;
pub use error::ExplorerError;
pub use geopoint::{great_circle_distance_meters, meters_to_degree_offsets, BoundingBox, Coordinate};
pub use query::ImageryQuery;
pub use ranker::{rank, RankedCandidate};
pub use resolver::AccessToken;
pub use session::{SearchSession, SessionEntry};

pub use types::{CapturedAt, GeocodeResult, ImageryCandidate, SearchOutcome};
