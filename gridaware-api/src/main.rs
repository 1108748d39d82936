//! Gridaware API server entry point
//!
//! Bootstraps configuration from the environment, wires the provider to
//! the live carbon-intensity backend, and starts the Axum HTTP server.

use std::sync::Arc;

use gridaware_api::{create_api_router, ApiConfig, ApiResult, MemorySettingsStore, ApiState};
use gridaware_provider::{CarbonIntensityBackend, GridIntensityProvider, MemoryCache, ProviderConfig};

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridaware_api=info,tower_http=info".into()),
        )
        .init();

    let config = ApiConfig::from_env()?;

    let provider = GridIntensityProvider::new(
        Arc::new(CarbonIntensityBackend::new()),
        Arc::new(MemoryCache::default()),
        ProviderConfig {
            api_key: config.api_key.clone(),
            fallback_zone: config.fallback_zone.clone(),
        },
    );
    let state = ApiState::new(provider, Arc::new(MemorySettingsStore::new()));
    let app = create_api_router(state);

    let addr = config.bind_addr()?;
    tracing::info!(%addr, "Starting Gridaware API server");

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        gridaware_api::ApiError::internal_error(format!("Failed to bind {}: {}", addr, e))
    })?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| {
                gridaware_api::ApiError::internal_error(format!("Server error: {}", e))
            })?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
