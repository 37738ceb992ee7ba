pub mod api;
pub mod models;
pub mod processor;
pub mod services;
pub mod storage;
pub mod utils;
pub mod warehouse;

use std::net::SocketAddr;
use std::sync::Arc;

use common::Result;
use common::config::Settings;
use services::pipeline::PipelineService;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Loads configuration, wires the pipeline service, and serves the trigger
/// endpoints until shutdown.
pub async fn run_pipeline_server(config_path: &str) -> Result<()> {
    // Load configuration
    let config = Settings::new(config_path)?;

    // Initialize pipeline service
    let service = Arc::new(PipelineService::new(&config).await?);

    // Create API router
    let api_router = api::routes(Arc::clone(&service)).layer(TraceLayer::new_for_http());

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Pipeline API server listening");
    axum::serve(listener, api_router).await?;

    Ok(())
}
