use anyhow::Result;
use std::sync::Arc;

use agentcore_router::config::load_config;
use agentcore_router::logging::init_tracing;
use agentcore_router::server::{build_router, AppState};
use agentcore_router::UnifiedClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let config = Arc::new(load_config(&config_path)?);

    init_tracing(&config.logging);
    tracing::info!(
        path = %config_path,
        control_operations = config.control.operations.len(),
        data_operations = config.data.operations.len(),
        "Configuration loaded"
    );

    // Plane clients are built lazily on the first request that needs them.
    let client = Arc::new(UnifiedClient::from_config(config.clone()));

    let app = build_router(AppState { client: client.clone() }, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(region = %client.region_name(), "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
