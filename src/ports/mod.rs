//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Provider Ports
//!
//! - `PlaytimeProvider` - External game-time lookups (recent activity, owned catalog)
//!
//! ## Storage Ports
//!
//! - `PlaytimeRepository` - Atomic upsert and bulk reads of playtime records
//! - `EndpointRegistry` - Per-path endpoint configuration and secrets

mod endpoint_registry;
mod playtime_provider;
mod playtime_repository;

pub use endpoint_registry::EndpointRegistry;
pub use playtime_provider::{GamePlaytime, PlaytimeProvider, ProviderError};
pub use playtime_repository::PlaytimeRepository;
