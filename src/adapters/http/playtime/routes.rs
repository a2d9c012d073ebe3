//! Axum router configuration for playtime endpoints.

use std::time::Duration;

use axum::{routing::post, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{get_playtime, set_playtime, PlaytimeAppState};

/// Create the playtime API router.
///
/// # Routes
///
/// ## Moderation platform (timestamped signature)
/// - `POST /set-playtime/bm/:path` - Push a player's playtime
///
/// ## Scripts (plain signature)
/// - `POST /get-playtime/:path` - Read reconciled playtime for up to 120 players
///
/// Both accept an optional trailing slash.
pub fn playtime_routes() -> Router<PlaytimeAppState> {
    Router::new()
        .route("/set-playtime/bm/:path", post(set_playtime))
        .route("/set-playtime/bm/:path/", post(set_playtime))
        .route("/get-playtime/:path", post(get_playtime))
        .route("/get-playtime/:path/", post(get_playtime))
}

/// Create the complete service router with tracing and a request timeout.
///
/// # Example
///
/// ```ignore
/// let app = playtime_router(app_state, Duration::from_secs(30));
/// axum::serve(listener, app).await?;
/// ```
pub fn playtime_router(state: PlaytimeAppState, request_timeout: Duration) -> Router {
    playtime_routes()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::http::playtime::SignatureSettings;
    use crate::adapters::memory::{InMemoryEndpointRegistry, InMemoryPlaytimeRepository};
    use crate::adapters::steam::MockPlaytimeProvider;
    use crate::application::handlers::playtime::PlaytimeFetcher;

    fn app() -> Router {
        let state = PlaytimeAppState {
            endpoint_registry: Arc::new(InMemoryEndpointRegistry::new()),
            playtime_repository: Arc::new(InMemoryPlaytimeRepository::new()),
            fetcher: Arc::new(PlaytimeFetcher::new(Arc::new(MockPlaytimeProvider::new()))),
            signature: Arc::new(SignatureSettings::standard(300).unwrap()),
        };
        playtime_router(state, Duration::from_secs(5))
    }

    async fn post_status(uri: &str) -> StatusCode {
        app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn unknown_paths_are_404_from_handlers() {
        assert_eq!(post_status("/get-playtime/nope").await, StatusCode::NOT_FOUND);
        assert_eq!(post_status("/get-playtime/nope/").await, StatusCode::NOT_FOUND);
        assert_eq!(post_status("/set-playtime/bm/nope").await, StatusCode::NOT_FOUND);
        assert_eq!(post_status("/set-playtime/bm/nope/").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_method_is_not_allowed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/get-playtime/anything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
