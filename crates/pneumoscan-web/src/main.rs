//! Pneumoscan Web Server
//!
//! Run with: cargo run -p pneumoscan-web

use tracing::info;
use tracing_subscriber::EnvFilter;

use pneumoscan_config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("pneumoscan_web=debug,pneumoscan_client=debug,pneumoscan_common=debug,info")
            }),
        )
        .init();

    info!("Starting Pneumoscan Web Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let addr = config.server.bind_addr()?;
    info!(
        "Inference backend: analyze={} chat={}",
        config.inference.analyze_url, config.inference.chat_url
    );

    // Create app state
    let state = pneumoscan_web::state::AppState::new(config)?;

    // Build router
    let app = pneumoscan_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
