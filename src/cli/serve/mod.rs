//! Serve command - runs the HTTP API

use std::net::SocketAddr;

use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Bind address, overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port, overrides `server.port`
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    apply_overrides(&mut config, &args);

    init_logging(&config.logging);

    let state = crate::create_app_state_with_config(&config)?;
    if !state.execution_service.is_configured() {
        warn!("ANTHROPIC_API_KEY is not set, workflow execution will fail with 500");
    }

    let app = create_router(state);

    let addr = build_socket_addr(&config)?;
    info!(%addr, model = %config.provider.model, "Starting workflow engine");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received");
}
