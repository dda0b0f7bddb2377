use anyhow::{Context, Result};
use fleetstate::api::{create_query_router, QueryAppState};
use fleetstate::cache::{run_cache_sweep, QueryCache};
use fleetstate::config::{load_config, ServiceConfig};
use fleetstate::resolver::Resolver;
use fleetstate::store::StateStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetstate=info".into()),
        )
        .init();

    let config = match std::env::var("FLEETSTATE_CONFIG") {
        Ok(path) => load_config(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path, e))?,
        Err(_) => ServiceConfig::default(),
    }
    .with_env_overrides();

    // Refuse to serve if the store cannot be opened and pinged
    let store = StateStore::open(&config.database.path).with_context(|| {
        format!("Failed to open state database at {}", config.database.path)
    })?;
    store.ping()?;
    info!(path = %config.database.path, "Connected to state database");

    let cache = Arc::new(QueryCache::new(Duration::from_secs(config.cache.ttl_seconds)));
    tokio::spawn(run_cache_sweep(
        cache.clone(),
        config.cache.sweep_interval_seconds,
    ));

    let state = Arc::new(QueryAppState {
        resolver: Resolver::new(Arc::new(store)),
        cache,
    });
    let app = create_query_router(state).layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, ttl_seconds = config.cache.ttl_seconds, "fleetstate listening");

    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}
