use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use agenda::config::AppConfig;
use agenda::db;
use agenda::handlers;
use agenda::services::clock::{Clock, SystemClock};
use agenda::services::ownership::NameMatchPolicy;
use agenda::state::AppState;
use agenda::store::http::HttpStore;
use agenda::store::sqlite::SqliteStore;
use agenda::store::{BookingStore, CachedStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(config.cache_ttl_secs >= 0, "CACHE_TTL_SECS must not be negative");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let inner: Arc<dyn BookingStore> = match &config.store_url {
        Some(url) => {
            tracing::info!("using remote booking store (url: {url})");
            Arc::new(HttpStore::new(url.clone(), config.store_token.clone()))
        }
        None => {
            tracing::info!("using local booking store (db: {})", config.database_url);
            let conn = db::init_db(&config.database_url)?;
            Arc::new(SqliteStore::new(conn, Arc::clone(&clock)))
        }
    };

    let store = CachedStore::new(
        inner,
        chrono::Duration::seconds(config.cache_ttl_secs),
        Arc::clone(&clock),
    );

    let state = Arc::new(AppState {
        store,
        config: config.clone(),
        clock,
        ownership: Box::new(NameMatchPolicy),
    });

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
