//! Relay state machine and connection-pair lifecycle.
//!
//! # Responsibilities
//! - Give each relay a unique ID for tracing
//! - Name the stages a relay moves through
//! - Own the client and origin sockets and close both on teardown
//!
//! # Design Decisions
//! - IDs are random (UUID v4), so relays share no counter
//! - Teardown closes the origin before the client, on every exit path
//! - Dropping a pair without `close` still releases both sockets

use std::fmt;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use uuid::Uuid;

/// Unique identifier for a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelayId(Uuid);

impl RelayId {
    /// Generate a new random relay ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RelayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relay-{}", self.0.simple())
    }
}

/// Stage a relay is in.
///
/// ```text
/// ReadRequest → Resolve → Connect → Forward → Relay → Closed
///      │           │         │         │        │
///      └───────────┴─────────┴─────────┴────────┴──▶ Closed (error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Reading the request line from the client.
    ReadRequest,
    /// Resolving the request URI into an origin target.
    Resolve,
    /// Opening the origin connection.
    Connect,
    /// Writing the rewritten request to the origin.
    Forward,
    /// Capturing the origin response and writing it to the client.
    Relay,
    /// Both sockets released.
    Closed,
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelayState::ReadRequest => "read_request",
            RelayState::Resolve => "resolve",
            RelayState::Connect => "connect",
            RelayState::Forward => "forward",
            RelayState::Relay => "relay",
            RelayState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// The client socket and, once connected, the origin socket of one relay.
///
/// Owned by exactly one relay task for its whole lifetime.
#[derive(Debug)]
pub struct ConnectionPair {
    pub client: TcpStream,
    pub origin: Option<TcpStream>,
}

impl ConnectionPair {
    pub fn new(client: TcpStream) -> Self {
        Self {
            client,
            origin: None,
        }
    }

    /// Close the origin connection (if any), then the client connection.
    ///
    /// Shutdown errors are ignored: the peer may already be gone, and the
    /// sockets are released when `self` drops regardless.
    pub async fn close(self) {
        let Self { mut client, origin } = self;

        if let Some(mut origin) = origin {
            let _ = origin.shutdown().await;
            drop(origin);
        }

        let _ = client.shutdown().await;
        drop(client);
    }
}
