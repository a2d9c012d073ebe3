//! HTTP adapter for playtime endpoints.
//!
//! Exposes reconciliation via REST API:
//! - `POST /set-playtime/bm/{path}` - Moderation platform pushes playtime
//! - `POST /get-playtime/{path}` - Scripts read reconciled playtime

pub mod dto;
pub mod handlers;
pub mod routes;
mod signature;

pub use dto::*;
pub use handlers::{get_playtime, set_playtime, PlaytimeApiError, PlaytimeAppState};
pub use routes::{playtime_router, playtime_routes};
pub use signature::SignatureSettings;
