//! Proxy server: the connection acceptor.
//!
//! # Responsibilities
//! - Accept connections from the listener in a loop
//! - Dispatch each connection to its own task running the relay engine
//! - Keep accepting regardless of how individual relays end
//!
//! # Design Decisions
//! - The acceptor only decides dispatch; it never touches connection state
//! - Relays are detached tasks with no ordering between them
//! - Accept errors are logged and followed by a short pause, so running
//!   out of file descriptors does not spin the loop
//! - Shutdown closes the listener but does not cancel relays in flight

use std::sync::Arc;
use std::time::Duration;

use crate::config::ProxyConfig;
use crate::http::relay::RelayEngine;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::net::Listener;

/// Pause after a failed accept before trying again.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Forward proxy server.
pub struct ProxyServer {
    engine: Arc<RelayEngine>,
}

impl ProxyServer {
    /// Create a new proxy server with the given configuration.
    pub fn new(config: &ProxyConfig) -> Self {
        Self {
            engine: Arc::new(RelayEngine::from_config(config)),
        }
    }

    /// Run the accept loop until `shutdown` fires, then close the listener.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_response_bytes = self.engine.limits().max_response_bytes,
            "Proxy server starting"
        );

        loop {
            tokio::select! {
                biased;

                _ = shutdown.stopped() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        tracing::info!(peer_addr = %peer, "Accepted connection");
                        let engine = Arc::clone(&self.engine);
                        tokio::spawn(async move {
                            engine.handle(stream, peer).await;
                            drop(permit);
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, backoff = ?ACCEPT_ERROR_BACKOFF, "Accept failed");
                        if pause_after_accept_error(&mut shutdown).await {
                            break;
                        }
                    }
                },
            }
        }

        drop(listener);
        tracing::info!(address = %addr, "Proxy server stopped");
        Ok(())
    }
}

/// Sleep for `ACCEPT_ERROR_BACKOFF`, returning `true` if shutdown fired first.
async fn pause_after_accept_error(shutdown: &mut ShutdownSignal) -> bool {
    tokio::select! {
        _ = shutdown.stopped() => true,
        _ = tokio::time::sleep(ACCEPT_ERROR_BACKOFF) => false,
    }
}
