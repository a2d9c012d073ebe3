//! Playtime Provider Adapters.
//!
//! ## Available Adapters
//!
//! - `SteamPlaytimeProvider` - Steam Web API (`IPlayerService`)
//! - `MockPlaytimeProvider` - Configurable mock for testing

mod mock_provider;
mod steam_provider;

pub use mock_provider::{MockLookup, MockPlaytimeProvider};
pub use steam_provider::{SteamClientConfig, SteamPlaytimeProvider};
