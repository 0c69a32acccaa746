//! Slashgate Server - Main Entry Point
//!
//! Slash command webhook dispatcher.

use anyhow::{Context, Result};
use tracing::{error, info};

use slashgate_server::{
    api, commands::CommandRegistry, commands::CommandWorkspace, commands::EnvTokens,
    commands::HandlerCatalog, commands::Manifest, config, slack::DelayedResponder,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slashgate_server=info,tower_http=info".into()),
        )
        .json()
        .init();

    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Slashgate Server"
    );

    // Register handlers
    let manifest = Manifest::load(&config.handlers_manifest).with_context(|| {
        format!(
            "failed to load handler manifest {}",
            config.handlers_manifest.display()
        )
    })?;
    let workspace = CommandWorkspace::new(&config.work_dir, &config.public_path_prefix);
    let registry = CommandRegistry::build(
        &manifest.handlers,
        &EnvTokens,
        &workspace,
        &HandlerCatalog::with_builtins(),
    );
    info!(
        registered = registry.len(),
        declared = manifest.len(),
        commands = ?registry.commands(),
        "Command registry ready"
    );

    let responder = DelayedResponder::new(config.delayed_response_timeout)
        .context("failed to build delayed response client")?;

    // Build application state
    let state = api::AppState::new(config.clone(), registry, responder);

    // Build router
    let app = api::create_router(state)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
