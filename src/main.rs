use std::error::Error;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use playtime_service::adapters::http::{playtime_router, PlaytimeAppState, SignatureSettings};
use playtime_service::adapters::{
    PostgresEndpointRegistry, PostgresPlaytimeRepository, SteamClientConfig,
    SteamPlaytimeProvider,
};
use playtime_service::application::handlers::{FetcherConfig, PlaytimeFetcher};
use playtime_service::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = config.database.connect().await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let provider = SteamPlaytimeProvider::new(
        SteamClientConfig::new(config.steam.api_key.expose_secret().as_str())
            .with_base_url(config.steam.base_url.as_str())
            .with_timeout(config.steam.timeout()),
    )?;
    let fetcher = PlaytimeFetcher::with_config(
        Arc::new(provider),
        FetcherConfig {
            max_concurrency: config.steam.max_concurrent_lookups,
            lookup_timeout: config.steam.timeout(),
            fan_out_deadline: None,
        }
        .with_request_budget(config.server.request_timeout()),
    );

    let signature = SignatureSettings::from_config(&config.signature, &config.features)?;
    if !signature.is_enabled() {
        tracing::warn!("request signature validation is disabled");
    }

    let state = PlaytimeAppState {
        endpoint_registry: Arc::new(PostgresEndpointRegistry::new(pool.clone())),
        playtime_repository: Arc::new(PostgresPlaytimeRepository::new(pool)),
        fetcher: Arc::new(fetcher),
        signature: Arc::new(signature),
    };

    let app = playtime_router(state, config.server.request_timeout());
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "playtime service listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.as_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    let _ = if config.is_production() {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
