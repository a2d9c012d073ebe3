//! In-memory EndpointRegistry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::playtime::{EndpointConfig, EndpointKind};
use crate::ports::EndpointRegistry;

/// Endpoint registry backed by a map.
///
/// Paths are normalised when an [`EndpointConfig`] is built; lookups match
/// the request path exactly.
#[derive(Debug, Default)]
pub struct InMemoryEndpointRegistry {
    endpoints: RwLock<HashMap<(EndpointKind, String), EndpointConfig>>,
}

impl InMemoryEndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with_endpoint(self, kind: EndpointKind, endpoint: EndpointConfig) -> Self {
        self.register(kind, endpoint);
        self
    }

    /// Adds or replaces an endpoint.
    pub fn register(&self, kind: EndpointKind, endpoint: EndpointConfig) {
        if let Ok(mut endpoints) = self.endpoints.write() {
            endpoints.insert((kind, endpoint.path.clone()), endpoint);
        }
    }
}

#[async_trait]
impl EndpointRegistry for InMemoryEndpointRegistry {
    async fn find(
        &self,
        kind: EndpointKind,
        path: &str,
    ) -> Result<Option<EndpointConfig>, DomainError> {
        let endpoints = self
            .endpoints
            .read()
            .map_err(|_| DomainError::database("endpoint registry lock poisoned"))?;
        Ok(endpoints.get(&(kind, path.to_string())).cloned())
    }
}
