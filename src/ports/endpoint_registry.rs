//! Endpoint registry port.
//!
//! Resolves the `{path}` segment of an inbound request to the endpoint's
//! configuration (enabled flag, HMAC secret, pinned game).

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::playtime::{EndpointConfig, EndpointKind};

/// Lookup of registered endpoint paths.
#[async_trait]
pub trait EndpointRegistry: Send + Sync {
    /// Finds the endpoint of `kind` registered under `path`.
    ///
    /// Returns `None` if no such endpoint exists. Disabled endpoints are
    /// returned with `enabled == false`.
    async fn find(
        &self,
        kind: EndpointKind,
        path: &str,
    ) -> Result<Option<EndpointConfig>, DomainError>;
}
