//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the drafting REST API on its own.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `mdm-run` binary also loads `.env`
//! before starting the same router.

use std::path::PathBuf;
use std::sync::Arc;

use preferences::Preferences;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the MDM REST API server.
///
/// # Environment Variables
/// - `MDM_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MDM_PREFS`: Optional preferences file (YAML or JSON)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MDM_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let prefs_path = std::env::var("MDM_PREFS").ok().map(PathBuf::from);
    let config = Arc::new(Preferences::load_or_default(prefs_path.as_deref()));

    tracing::info!("-- Starting MDM REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api_rest::router(config)).await?;

    Ok(())
}
