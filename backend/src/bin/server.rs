//! MDA HTTP Server Binary
//!
//! This is the main entry point for the MDA REST API server. It loads the
//! analysis configuration, sets up the HTTP router, and starts serving
//! requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin mda-server --features "http-server"
//!
//! # With a custom analysis configuration
//! MDA_CONFIG=analysis.toml cargo run --bin mda-server --features "http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `MDA_CONFIG`: Path to a TOML analysis configuration (optional)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mda_rust::config::AnalysisConfig;
use mda_rust::http::{create_router, AppState};

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
        .init();

    info!("Starting MDA HTTP Server");

    // Load the analysis configuration once; it applies to every request.
    let config = match env::var("MDA_CONFIG") {
        Ok(path) => AnalysisConfig::from_path(&path)?,
        Err(_) => AnalysisConfig::default(),
    };
    info!(
        "Analysis configuration loaded ({} machine codes mapped)",
        config.machine_map.len()
    );

    // Create application state
    let state = AppState::new(config);

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

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
