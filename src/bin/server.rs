//! IDV HTTP Server Binary
//!
//! This is the main entry point for the IDV REST API server.
//! It loads the dataset, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Serve india.csv from the working directory
//! cargo run --bin idv-server --features http-server
//!
//! # Serve a different dataset
//! IDV_DATA_PATH=/data/districts.csv cargo run --bin idv-server --features http-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `IDV_DATA_PATH`: Dataset CSV path (default: india.csv)
//! - `IDV_BOUNDARIES_URL`: State boundary GeoJSON URL
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use idv_rust::data;
use idv_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting IDV HTTP Server");

    // Load the global dataset once and reuse it across the app
    let data_path = data::default_data_path();
    data::init_dataset(&data_path)?;
    let table = std::sync::Arc::clone(data::get_dataset()?);
    info!(
        "Dataset loaded from {}: {} rows, {} measure columns",
        data_path,
        table.len(),
        table.measure_columns().len()
    );

    // Create application state
    let state = AppState::new(table);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
