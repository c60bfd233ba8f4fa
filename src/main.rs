//! Resource gateway binary.
//!
//! Loads configuration, initializes observability, binds the listener and
//! serves until Ctrl+C.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use resource_gateway::config::{self, GatewayConfig};
use resource_gateway::http::HttpServer;
use resource_gateway::lifecycle::Shutdown;
use resource_gateway::observability::{logging, metrics};

#[derive(Debug, Parser)]
#[command(name = "resource-gateway", about = "Edge gateway for the resource search API")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("resource-gateway v0.1.0 starting");

    config::resolve_upstream(&mut config, std::env::var(config::RAG_BASE_URL_VAR).ok());

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = config.upstream.base_url.as_deref().unwrap_or("<unset>"),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
