use std::path::PathBuf;
use std::sync::Arc;

use preferences::Preferences;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the MDM drafting service.
///
/// Loads `.env`, resolves the clinician preferences once and serves the REST API with
/// OpenAPI/Swagger UI at `/swagger-ui`.
///
/// # Environment Variables
/// - `MDM_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MDM_PREFS`: Preferences file (YAML or JSON). Defaults are used when unset or unreadable.
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("mdm=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MDM_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let prefs_path = std::env::var("MDM_PREFS").ok().map(PathBuf::from);
    let config = Arc::new(Preferences::load_or_default(prefs_path.as_deref()));

    tracing::info!(
        clinician = %config.clinician_name,
        "-- Starting MDM REST server on {}",
        rest_addr
    );

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, api_rest::router(config)).await?;

    Ok(())
}
