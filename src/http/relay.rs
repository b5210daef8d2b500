//! The relay engine: one client connection from request line to close.
//!
//! # Responsibilities
//! - Read and parse the client's request line
//! - Resolve the origin, connect and forward the rewritten request
//! - Capture the origin response up to a fixed bound and write it back
//! - Close both connections on every exit path
//!
//! # Design Decisions
//! - The whole response is buffered before the client sees any byte;
//!   bytes past `max_response_bytes` are dropped, never streamed
//! - Failures abort only the current relay; nothing is retried and no
//!   error response is synthesized (the client sees the socket close)
//! - The engine is immutable and shared by all relays through `Arc`

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::Instrument;

use crate::config::{ProxyConfig, RelayConfig};
use crate::http::request::{read_request_line, IncomingRequest};
use crate::http::rewrite::RequestRewriter;
use crate::http::uri::{self, ParseError};
use crate::net::{ConnectionPair, RelayId, RelayState};

/// Why a relay was aborted.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request URI could not be resolved.
    #[error(transparent)]
    InvalidUri(#[from] ParseError),

    /// The origin could not be reached.
    #[error("origin {host}:{port} unreachable: {source}")]
    OriginUnreachable {
        host: String,
        port: String,
        #[source]
        source: io::Error,
    },

    /// A read or write failed on either socket.
    #[error("I/O failure during {stage}: {source}")]
    Io {
        stage: RelayState,
        #[source]
        source: io::Error,
    },
}

impl RelayError {
    /// The stage the relay was in when it failed.
    pub fn stage(&self) -> RelayState {
        match self {
            RelayError::InvalidUri(_) => RelayState::Resolve,
            RelayError::OriginUnreachable { .. } => RelayState::Connect,
            RelayError::Io { stage, .. } => *stage,
        }
    }

    fn io(stage: RelayState) -> impl FnOnce(io::Error) -> Self {
        move |source| RelayError::Io { stage, source }
    }
}

/// How a relay that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The client closed before sending a request line.
    ClientDisconnected,
    /// The origin response (possibly cut at the bound) reached the client.
    Relayed {
        bytes: usize,
        /// The origin had more than `max_response_bytes` to send.
        truncated: bool,
    },
}

/// Runs relays. One instance is shared by every connection.
#[derive(Debug, Clone)]
pub struct RelayEngine {
    rewriter: RequestRewriter,
    limits: RelayConfig,
}

impl RelayEngine {
    pub fn new(rewriter: RequestRewriter, limits: RelayConfig) -> Self {
        Self { rewriter, limits }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(
            RequestRewriter::from_config(&config.rewrite),
            config.relay.clone(),
        )
    }

    pub fn limits(&self) -> &RelayConfig {
        &self.limits
    }

    /// Handle one accepted client connection to completion.
    ///
    /// Never fails: errors are logged and end this relay only. Both
    /// sockets are closed before this returns.
    pub async fn handle(&self, client: TcpStream, peer: SocketAddr) {
        let id = RelayId::new();
        let span = tracing::info_span!("relay", relay_id = %id, peer = %peer);

        async move {
            let mut pair = ConnectionPair::new(client);
            let result = self.relay(&mut pair).await;
            pair.close().await;

            match result {
                Ok(RelayOutcome::ClientDisconnected) => {
                    tracing::debug!("Client closed before sending a request");
                }
                Ok(RelayOutcome::Relayed { bytes, truncated }) => {
                    tracing::info!(bytes, truncated, "Relay completed");
                }
                Err(e) => {
                    tracing::warn!(stage = %e.stage(), error = %e, "Relay aborted");
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Drive `pair` through the relay stages, leaving teardown to the caller.
    ///
    /// On return `pair.origin` holds the origin socket if one was opened.
    pub async fn relay(&self, pair: &mut ConnectionPair) -> Result<RelayOutcome, RelayError> {
        let line = {
            let mut reader = BufReader::new(&mut pair.client);
            read_request_line(&mut reader, self.limits.max_request_line_bytes)
                .await
                .map_err(RelayError::io(RelayState::ReadRequest))?
        };
        let Some(line) = line else {
            return Ok(RelayOutcome::ClientDisconnected);
        };

        let request = IncomingRequest::parse(&line);
        tracing::info!(
            method = %request.method,
            uri = %request.request_uri,
            version = %request.http_version,
            "Request line received"
        );

        let target = uri::resolve(&request.request_uri)?;

        let authority = target.authority();
        let origin = TcpStream::connect(&authority)
            .await
            .map_err(|source| RelayError::OriginUnreachable {
                host: target.host.clone(),
                port: target.port.clone(),
                source,
            })?;
        let origin = pair.origin.insert(origin);
        tracing::debug!(origin = %authority, "Connected to origin");

        let outbound = self
            .rewriter
            .rewrite(&request.method, &target.origin_path, &target.host);
        tracing::info!(request_line = %outbound.request_line(), "Forwarding to origin");
        origin
            .write_all(&outbound.to_bytes())
            .await
            .map_err(RelayError::io(RelayState::Forward))?;

        // One byte past the bound tells a full response from a cut one.
        let capacity = self.limits.max_response_bytes;
        let mut response = Vec::with_capacity(capacity.min(64 * 1024));
        (&mut *origin)
            .take((capacity as u64).saturating_add(1))
            .read_to_end(&mut response)
            .await
            .map_err(RelayError::io(RelayState::Relay))?;
        let truncated = response.len() > capacity;
        response.truncate(capacity);
        if truncated {
            tracing::debug!(capacity, "Origin response cut at capacity");
        }

        pair.client
            .write_all(&response)
            .await
            .map_err(RelayError::io(RelayState::Relay))?;

        Ok(RelayOutcome::Relayed {
            bytes: response.len(),
            truncated,
        })
    }
}
