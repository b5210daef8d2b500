//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default, so an empty file yields the stock behavior:
//! unbounded concurrency, a 1,049,000 byte response bound and the fixed
//! Firefox user agent.

use serde::{Deserialize, Serialize};

/// Default user agent sent to every origin server.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:10.0.3) Gecko/20120305 Firefox/10.0.3";

/// Default bound on the number of response bytes captured per relay.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1_049_000;

/// Default bound on the client request line, in bytes.
pub const DEFAULT_MAX_REQUEST_LINE_BYTES: usize = 8192;

/// Root configuration for the forward proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host, port, admission cap).
    pub listener: ListenerConfig,

    /// Per-relay limits.
    pub relay: RelayConfig,

    /// Outbound request rewriting.
    pub rewrite: RewriteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind. Normally supplied on the command line.
    pub port: u16,

    /// Maximum concurrently running relays. `None` accepts without limit.
    pub max_connections: Option<usize>,
}

impl ListenerConfig {
    /// The `host:port` string handed to the socket layer.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            max_connections: None,
        }
    }
}

/// Limits applied to every relay.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    /// Maximum response bytes read from the origin. Anything past this is
    /// dropped; the response is never streamed.
    pub max_response_bytes: usize,

    /// Maximum bytes read for the client request line.
    pub max_request_line_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            max_request_line_bytes: DEFAULT_MAX_REQUEST_LINE_BYTES,
        }
    }
}

/// Outbound request rewriting.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RewriteConfig {
    /// Value of the `User-Agent` header sent to origins.
    pub user_agent: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
