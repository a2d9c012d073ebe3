//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresPlaytimeRepository` - Atomic upserts of playtime records
//! - `PostgresEndpointRegistry` - Endpoint path lookups

mod endpoint_registry;
mod playtime_repository;

pub use endpoint_registry::PostgresEndpointRegistry;
pub use playtime_repository::PostgresPlaytimeRepository;
