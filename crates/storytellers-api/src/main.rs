//! Storytellers gateway server entry point.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use storytellers_api::config::GatewayConfig;
use storytellers_api::error::AppError;
use storytellers_api::routes;
use storytellers_api::state::AppState;
use storytellers_api::telemetry;
use storytellers_core::clock::SystemClock;
use storytellers_workflow::application::state_store::InMemoryWorkflowStore;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = GatewayConfig::from_env()?;
    let provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Storytellers gateway");

    let backends = storytellers_backend_client::connect(&config.backends)?;
    let ttl = TimeDelta::from_std(config.session_ttl)
        .map_err(|e| AppError::Config(format!("SESSION_TTL_SECS is out of range: {e}")))?;
    let store = Arc::new(InMemoryWorkflowStore::new(ttl, Arc::new(SystemClock)));

    // Idle sessions are also dropped lazily on load; this bounds memory.
    let purger = Arc::clone(&store);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = purger.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "expired workflow sessions dropped");
            }
        }
    });

    let app = routes::app(AppState::new(backends, store));

    let addr = config.listen_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app).await;

    telemetry::shutdown(provider);
    served?;

    Ok(())
}
