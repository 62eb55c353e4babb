//! # entity-files server
//!
//! Loads configuration, sets up structured logging, builds the configured
//! file store and serves the public download API until Ctrl+C.

use clap::Parser;
use entity_files_api::{API_PREFIX, AppState, build_router, routes};
use entity_files_common::config::{AppConfig, LogFormat};
use std::net::SocketAddr;

/// Public per-entity file delivery service.
#[derive(Parser, Debug)]
#[command(name = "entity-files", version, about, long_about = None)]
struct Cli {
    /// Config file (any format the `config` crate reads); optional
    #[arg(short, long, env = "ENTITY_FILES_CONFIG")]
    config: Option<String>,

    /// Bind address, overrides `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "entity_files=debug,tower_http=debug".into());

    match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init(),
    }
}

fn apply_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = apply_overrides(entity_files_common::config::init(cli.config.as_deref())?, &cli);

    // Initialize tracing (structured logging)
    init_tracing(config.log.format);

    tracing::info!("Starting entity-files v{}", env!("CARGO_PKG_VERSION"));

    // === File store ===
    let lookup = entity_files_store::build(&config.storage)?;
    tracing::info!(backend = ?config.storage.backend, "File store ready");

    for route in routes::registry() {
        tracing::info!(
            methods = ?route.methods,
            path = %format!("{API_PREFIX}{}", route.path),
            requires_auth = route.access.requires_auth,
            requires_csrf = route.access.requires_csrf,
            public = route.access.public,
            "Route registered"
        );
    }

    // === REST API Server ===
    let router = build_router(AppState::new(lookup));
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let config = entity_files_common::config::load(Some("does-not-exist/entity-files")).unwrap();
        let cli = Cli::parse_from(["entity-files", "--host", "127.0.0.1", "--port", "9000"]);

        let config = apply_overrides(config, &cli);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn no_flags_keep_config() {
        let config = entity_files_common::config::load(Some("does-not-exist/entity-files")).unwrap();
        let cli = Cli::parse_from(["entity-files"]);

        let config = apply_overrides(config, &cli);
        assert_eq!(config.server.port, 8080);
    }
}
