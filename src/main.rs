//! Scout Proxy
//!
//! Forwards browser requests to upstream data APIs and generates scouting
//! descriptions through an external text-generation API.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────────┐
//!                       │                   SCOUT PROXY                      │
//!                       │                                                    │
//!   Client Request      │  ┌──────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ────────────────────┼─▶│  http    │──▶│ preflight│──▶│   profile    │   │
//!                       │  │  server  │   │  + CORS  │   │  selection   │   │
//!                       │  └──────────┘   └──────────┘   └──────┬───────┘   │
//!                       │                                       │           │
//!                       │                                       ▼           │
//!   Client Response     │  ┌──────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ◀───────────────────┼──│ relay /  │◀──│ deadline │◀──│  forwarder   │◀──┼── Upstream
//!                       │  │ JSON err │   │ (504)    │   │  (reqwest)   │   │   API
//!                       │  └──────────┘   └──────────┘   └──────────────┘   │
//!                       │                                                    │
//!                       │  POST /generate-description → prompt → generator ──┼── Text API
//!                       └───────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use scout_proxy::config::{default_config, load_config};
use scout_proxy::lifecycle::signals::spawn_signal_listener;
use scout_proxy::lifecycle::Shutdown;
use scout_proxy::observability::{logging, metrics};
use scout_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "scout-proxy")]
#[command(version, about = "CORS forwarding proxy and scouting description generator", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults are used if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind.to_string();
    }

    logging::init_logging(&config.observability);

    tracing::info!("scout-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.forwarder.base_url,
        timeout_secs = config.forwarder.timeout_secs,
        default_profile = %config.forwarder.default_profile,
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
    spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
