//! HTTP handlers for playtime endpoints.
//!
//! Every request goes through the same gate before any work happens:
//! resolve the path (404/403), verify the signature (400), then parse and
//! validate the body (400).

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::de::DeserializeOwned;

use crate::application::handlers::playtime::{
    PlaytimeFetcher, ReconcilePlaytimeCommand, ReconcilePlaytimeHandler, ReconcilePolicy,
    RecordModerationPlaytimeCommand, RecordModerationPlaytimeHandler,
};
use crate::domain::foundation::{DomainError, ValidationError};
use crate::domain::playtime::{EndpointConfig, EndpointKind, PlaytimeError};
use crate::ports::{EndpointRegistry, PlaytimeRepository};

use super::dto::{ErrorResponse, GetPlaytimeRequest, PlaytimeResponse, SetPlaytimeRequest};
use super::signature::SignatureSettings;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct PlaytimeAppState {
    pub endpoint_registry: Arc<dyn EndpointRegistry>,
    pub playtime_repository: Arc<dyn PlaytimeRepository>,
    pub fetcher: Arc<PlaytimeFetcher>,
    pub signature: Arc<SignatureSettings>,
}

impl PlaytimeAppState {
    pub fn reconcile_handler(&self) -> ReconcilePlaytimeHandler {
        ReconcilePlaytimeHandler::new(self.fetcher.clone(), self.playtime_repository.clone())
    }

    pub fn record_moderation_handler(&self) -> RecordModerationPlaytimeHandler {
        RecordModerationPlaytimeHandler::new(self.playtime_repository.clone())
    }

    /// Looks up the endpoint and checks it is switched on.
    async fn resolve_endpoint(
        &self,
        kind: EndpointKind,
        path: &str,
    ) -> Result<EndpointConfig, PlaytimeError> {
        let endpoint = self
            .endpoint_registry
            .find(kind, path)
            .await?
            .ok_or_else(|| PlaytimeError::endpoint_not_found(path))?;

        if !endpoint.enabled {
            return Err(PlaytimeError::endpoint_disabled(path));
        }
        Ok(endpoint)
    }

    fn authenticate(
        &self,
        kind: EndpointKind,
        endpoint: &EndpointConfig,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<(), PlaytimeError> {
        if !self.signature.is_enabled() {
            return Ok(());
        }

        self.signature
            .authenticator(kind, endpoint.secret.clone())
            .authenticate(headers, body)
            .map_err(|reason| {
                tracing::warn!(
                    endpoint = kind.as_str(),
                    path = %endpoint.path,
                    reason = reason.code(),
                    "Rejected request signature"
                );
                PlaytimeError::from(reason)
            })
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, PlaytimeError> {
    serde_json::from_slice(body).map_err(|e| PlaytimeError::validation("body", e.to_string()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /set-playtime/bm/{path} - Moderation platform pushes a player's playtime
pub async fn set_playtime(
    State(state): State<PlaytimeAppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PlaytimeApiError> {
    let kind = EndpointKind::ModerationPush;
    let endpoint = state.resolve_endpoint(kind, &path).await?;
    state.authenticate(kind, &endpoint, &headers, &body)?;

    let request: SetPlaytimeRequest = parse_body(&body)?;
    let valid = request.validate()?;
    let game_id = endpoint.resolve_game_id(valid.game_id)?;

    state
        .record_moderation_handler()
        .handle(RecordModerationPlaytimeCommand {
            steam_id: valid.steam_id,
            game_id,
            playtime_seconds: valid.playtime_seconds,
        })
        .await?;

    Ok(StatusCode::OK)
}

/// POST /get-playtime/{path} - Scripts read reconciled playtime
pub async fn get_playtime(
    State(state): State<PlaytimeAppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PlaytimeApiError> {
    let kind = EndpointKind::PlaytimeQuery;
    let endpoint = state.resolve_endpoint(kind, &path).await?;
    state.authenticate(kind, &endpoint, &headers, &body)?;

    let request: GetPlaytimeRequest = parse_body(&body)?;
    let valid = request.validate()?;
    let game_id = endpoint.resolve_game_id(valid.game_id)?;

    let records = state
        .reconcile_handler()
        .handle(ReconcilePlaytimeCommand {
            steam_ids: valid.steam_ids,
            game_id,
            policy: ReconcilePolicy::from_need_update(valid.is_need_update),
        })
        .await?;

    let response: Vec<PlaytimeResponse> = records.into_iter().map(PlaytimeResponse::from).collect();
    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for converting domain errors to HTTP responses.
#[derive(Debug)]
pub struct PlaytimeApiError(PlaytimeError);

impl From<PlaytimeError> for PlaytimeApiError {
    fn from(err: PlaytimeError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for PlaytimeApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<DomainError> for PlaytimeApiError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for PlaytimeApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            PlaytimeError::EndpointNotFound(_) => (StatusCode::NOT_FOUND, "ENDPOINT_NOT_FOUND"),
            PlaytimeError::EndpointDisabled(_) => (StatusCode::FORBIDDEN, "ENDPOINT_DISABLED"),
            PlaytimeError::Authentication(reason) => (StatusCode::BAD_REQUEST, reason.code()),
            PlaytimeError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            PlaytimeError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = match &self.0 {
            PlaytimeError::Infrastructure(_) => "Internal server error".to_string(),
            other => other.message(),
        };
        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}
