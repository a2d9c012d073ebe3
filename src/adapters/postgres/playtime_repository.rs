//! PostgreSQL implementation of PlaytimeRepository.
//!
//! Every write is a single `INSERT ... ON CONFLICT (steam_id, game_id) DO UPDATE`
//! so concurrent first observations of the same key collapse into one row.
//! `COALESCE` keeps stored values when the incoming observation carries none.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::foundation::{DomainError, GameId, SteamId, Timestamp};
use crate::domain::playtime::{PlaytimeObservation, PlaytimeRecord};
use crate::ports::PlaytimeRepository;

/// Attempts for a batch before the failure is surfaced.
const MAX_BATCH_ATTEMPTS: u32 = 3;

/// SQLSTATE codes worth retrying: serialization_failure, deadlock_detected.
const RETRYABLE_SQLSTATES: [&str; 2] = ["40001", "40P01"];

const UPSERT_SQL: &str = r#"
    INSERT INTO playtimes (steam_id, game_id, steam_playtime, bm_playtime, created_at, updated_at)
    VALUES ($1, $2, $3, $4, now(), now())
    ON CONFLICT (steam_id, game_id) DO UPDATE SET
        steam_playtime = COALESCE(EXCLUDED.steam_playtime, playtimes.steam_playtime),
        bm_playtime = COALESCE(EXCLUDED.bm_playtime, playtimes.bm_playtime),
        updated_at = now()
    RETURNING id, steam_id, game_id, steam_playtime, bm_playtime, created_at, updated_at
"#;

/// PostgreSQL implementation of the PlaytimeRepository port.
pub struct PostgresPlaytimeRepository {
    pool: PgPool,
}

impl PostgresPlaytimeRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        steam_id: &SteamId,
        game_id: GameId,
        observation: &PlaytimeObservation,
    ) -> Result<PlaytimeRow, sqlx::Error> {
        sqlx::query_as::<_, PlaytimeRow>(UPSERT_SQL)
            .bind(steam_id.as_str())
            .bind(game_id.value())
            .bind(observation.steam_playtime_seconds.map(seconds_to_db))
            .bind(observation.bm_playtime_seconds.map(seconds_to_db))
            .fetch_one(&mut **tx)
            .await
    }

    /// One attempt at the whole batch; rolls back on drop if anything fails.
    async fn try_upsert_batch(
        &self,
        game_id: GameId,
        ordered: &[&(SteamId, PlaytimeObservation)],
    ) -> Result<Vec<PlaytimeRow>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(ordered.len());
        for (steam_id, observation) in ordered {
            rows.push(Self::upsert_in_tx(&mut tx, steam_id, game_id, observation).await?);
        }
        tx.commit().await?;
        Ok(rows)
    }
}

/// Database row representation of a playtime record.
#[derive(Debug, sqlx::FromRow)]
struct PlaytimeRow {
    id: i64,
    steam_id: String,
    game_id: i64,
    steam_playtime: Option<i64>,
    bm_playtime: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlaytimeRow> for PlaytimeRecord {
    fn from(row: PlaytimeRow) -> Self {
        PlaytimeRecord {
            id: row.id,
            steam_id: SteamId::new(row.steam_id),
            game_id: GameId::new(row.game_id),
            steam_playtime_seconds: row.steam_playtime.map(seconds_from_db),
            bm_playtime_seconds: row.bm_playtime.map(seconds_from_db),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

fn seconds_to_db(seconds: u64) -> i64 {
    i64::try_from(seconds).unwrap_or(i64::MAX)
}

fn seconds_from_db(seconds: i64) -> u64 {
    u64::try_from(seconds).unwrap_or(0)
}

fn is_retryable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| RETRYABLE_SQLSTATES.iter().any(|retryable| *retryable == code))
            .unwrap_or(false),
        _ => false,
    }
}

#[async_trait]
impl PlaytimeRepository for PostgresPlaytimeRepository {
    async fn upsert(
        &self,
        steam_id: &SteamId,
        game_id: GameId,
        observation: &PlaytimeObservation,
    ) -> Result<PlaytimeRecord, DomainError> {
        let row = sqlx::query_as::<_, PlaytimeRow>(UPSERT_SQL)
            .bind(steam_id.as_str())
            .bind(game_id.value())
            .bind(observation.steam_playtime_seconds.map(seconds_to_db))
            .bind(observation.bm_playtime_seconds.map(seconds_to_db))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to upsert playtime: {}", e)))?;

        Ok(row.into())
    }

    async fn upsert_batch(
        &self,
        game_id: GameId,
        observations: &[(SteamId, PlaytimeObservation)],
    ) -> Result<Vec<PlaytimeRecord>, DomainError> {
        if observations.is_empty() {
            return Ok(Vec::new());
        }

        // A consistent lock order keeps concurrent batches from deadlocking.
        let mut ordered: Vec<&(SteamId, PlaytimeObservation)> = observations.iter().collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));

        let mut attempt = 1;
        let rows = loop {
            match self.try_upsert_batch(game_id, &ordered).await {
                Ok(rows) => break rows,
                Err(e) if is_retryable(&e) && attempt < MAX_BATCH_ATTEMPTS => {
                    tracing::warn!(
                        game_id = %game_id,
                        attempt,
                        error = %e,
                        "Retrying playtime batch after transient conflict"
                    );
                    attempt += 1;
                }
                Err(e) => {
                    return Err(DomainError::database(format!(
                        "Failed to upsert playtime batch: {}",
                        e
                    )))
                }
            }
        };

        // Hand records back in the caller's order.
        let mut records: Vec<PlaytimeRecord> = rows.into_iter().map(Into::into).collect();
        let position = |id: &SteamId| {
            observations
                .iter()
                .position(|(s, _)| s == id)
                .unwrap_or(usize::MAX)
        };
        records.sort_by_key(|record| position(&record.steam_id));

        Ok(records)
    }

    async fn find_many(
        &self,
        steam_ids: &[SteamId],
        game_id: GameId,
    ) -> Result<Vec<PlaytimeRecord>, DomainError> {
        if steam_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = steam_ids.iter().map(|id| id.as_str().to_string()).collect();

        let rows = sqlx::query_as::<_, PlaytimeRow>(
            r#"
            SELECT id, steam_id, game_id, steam_playtime, bm_playtime, created_at, updated_at
            FROM playtimes
            WHERE game_id = $1 AND steam_id = ANY($2)
            "#,
        )
        .bind(game_id.value())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load playtimes: {}", e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
