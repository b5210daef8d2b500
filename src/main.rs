//! Forward proxy entry point.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                FORWARD PROXY                 │
//!                        │                                              │
//!   Client Request       │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ─────────────────────┼─▶│   net    │──▶│  relay   │──▶│   uri    │  │
//!                        │  │ listener │   │  engine  │   │ resolver │  │
//!                        │  └──────────┘   └────┬─────┘   └──────────┘  │
//!                        │                      │                       │
//!                        │                      ▼                       │
//!   Client Response      │                ┌──────────┐                  │
//!   ◀────────────────────┼────────────────│ request  │─────────────────┼──▶ Origin
//!   (raw, bounded)       │                │ rewriter │   HTTP/1.0      │     Server
//!                        │                └──────────┘                  │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use forward_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use forward_proxy::lifecycle::{signals, Shutdown};
use forward_proxy::observability::logging;
use forward_proxy::{Listener, ProxyServer};

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "Single-hop HTTP forward proxy", long_about = None)]
struct Cli {
    /// Port to listen on
    port: u16,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum response bytes relayed per request (overrides the config file)
    #[arg(long)]
    max_response_bytes: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ProxyConfig::default(),
        };

        config.listener.port = self.port;
        if let Some(max) = self.max_response_bytes {
            config.relay.max_response_bytes = max;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);

    tracing::info!("forward-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        max_connections = ?config.listener.max_connections,
        max_response_bytes = config.relay.max_response_bytes,
        "Configuration loaded"
    );

    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Arc::new(Shutdown::new());
    signals::shutdown_on_ctrl_c(Arc::clone(&shutdown));

    let server = ProxyServer::new(&config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
