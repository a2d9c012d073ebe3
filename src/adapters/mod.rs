//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `steam` - Steam Web API provider and a configurable mock
//! - `postgres` - PostgreSQL repository and endpoint registry
//! - `memory` - In-memory repository and endpoint registry
//! - `http` - Axum REST endpoints

pub mod http;
pub mod memory;
pub mod postgres;
pub mod steam;

pub use memory::{InMemoryEndpointRegistry, InMemoryPlaytimeRepository};
pub use postgres::{PostgresEndpointRegistry, PostgresPlaytimeRepository};
pub use steam::{MockPlaytimeProvider, SteamClientConfig, SteamPlaytimeProvider};
