//! HTTP forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! accepted TCP connection
//!     → server.rs (accept loop, one task per connection)
//!     → relay.rs (relay engine, owns both sockets)
//!         → request.rs (read + split the request line)
//!         → uri.rs (absolute-form URI → host, port, origin path)
//!         → rewrite.rs (HTTP/1.0 origin request, fixed headers)
//!         → origin socket → bounded response capture
//!     → raw response bytes written back to the client
//! ```

pub mod relay;
pub mod request;
pub mod rewrite;
pub mod server;
pub mod uri;

pub use relay::{RelayEngine, RelayError, RelayOutcome};
pub use request::IncomingRequest;
pub use rewrite::{OutboundRequest, RequestRewriter};
pub use server::ProxyServer;
pub use uri::{resolve, ParseError, ResolvedTarget};
