//! Domain layer containing business rules and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, timestamp, errors)
//! - `playtime` - Playtime records, merge rule and endpoint configuration
//! - `signature` - Request signature authentication

pub mod foundation;
pub mod playtime;
pub mod signature;
