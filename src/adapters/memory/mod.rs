//! In-memory adapters for tests and database-less local runs.

mod endpoint_registry;
mod playtime_repository;

pub use endpoint_registry::InMemoryEndpointRegistry;
pub use playtime_repository::InMemoryPlaytimeRepository;
