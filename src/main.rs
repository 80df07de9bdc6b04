// src/main.rs
use anyhow::{Context, Result};
use juice_quality_lib::api::{create_router, AppState};
use juice_quality_lib::model::load_model;
use juice_quality_lib::utils::{config::ServerConfig, env::load_env};
use log::info;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging and environment
    env_logger::init();
    info!("Starting juice quality prediction API");
    load_env();

    let config = ServerConfig::from_env();
    config.log_config();

    let load_start = Instant::now();
    let model = load_model(&config.model_path).context("Failed to load model artifact")?;
    model.log_summary();
    info!(
        "Model ready in {:.2}s",
        load_start.elapsed().as_secs_f64()
    );

    let app = create_router(AppState::new(Arc::new(model)));
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 API listening on http://{}", addr);
    info!("📌 Use POST /predict to get predictions");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, finishing in-flight requests");
}
