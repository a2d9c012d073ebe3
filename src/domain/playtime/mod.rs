//! Playtime domain - records, observations and endpoint configuration.

mod endpoint;
mod errors;
mod record;

pub use endpoint::{normalize_path, EndpointConfig, EndpointKind, MAX_STEAM_IDS_PER_QUERY};
pub use errors::PlaytimeError;
pub use record::{PlaytimeObservation, PlaytimeRecord};
