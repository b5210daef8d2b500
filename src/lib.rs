//! Single-hop HTTP forward proxy.
//!
//! Accepts absolute-form requests (`GET http://host:port/path HTTP/1.1`),
//! forwards them to the origin as HTTP/1.0 with a fixed header set, and
//! relays the raw response back before closing both connections.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::{ProxyServer, RelayEngine};
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use net::Listener;
