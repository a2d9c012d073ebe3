//! PostgreSQL implementation of EndpointRegistry.
//!
//! Moderation push endpoints and playtime query endpoints live in separate
//! tables with the same shape.

use async_trait::async_trait;
use secrecy::Secret;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, GameId};
use crate::domain::playtime::{EndpointConfig, EndpointKind};
use crate::ports::EndpointRegistry;

/// PostgreSQL implementation of the EndpointRegistry port.
pub struct PostgresEndpointRegistry {
    pool: PgPool,
}

impl PostgresEndpointRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EndpointRow {
    path: String,
    enabled: bool,
    secret: String,
    fixed_game_id: Option<i64>,
}

/// Stored paths were normalised when saved and are kept verbatim.
impl From<EndpointRow> for EndpointConfig {
    fn from(row: EndpointRow) -> Self {
        EndpointConfig {
            path: row.path,
            enabled: row.enabled,
            secret: Secret::new(row.secret),
            fixed_game_id: row.fixed_game_id.map(GameId::new),
        }
    }
}

fn table_for(kind: EndpointKind) -> &'static str {
    match kind {
        EndpointKind::ModerationPush => "moderation_endpoints",
        EndpointKind::PlaytimeQuery => "query_endpoints",
    }
}

#[async_trait]
impl EndpointRegistry for PostgresEndpointRegistry {
    async fn find(
        &self,
        kind: EndpointKind,
        path: &str,
    ) -> Result<Option<EndpointConfig>, DomainError> {
        let sql = format!(
            "SELECT path, enabled, secret, fixed_game_id FROM {} WHERE path = $1",
            table_for(kind)
        );

        let row: Option<EndpointRow> = sqlx::query_as(&sql)
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to load {} endpoint: {}", kind.as_str(), e))
            })?;

        Ok(row.map(Into::into))
    }
}
