//! HTTP adapters - REST API implementations.

pub mod playtime;

// Re-export key types for convenience
pub use playtime::{playtime_router, PlaytimeAppState, SignatureSettings};
