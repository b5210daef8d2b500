//! Outbound request construction.
//!
//! # Responsibilities
//! - Downgrade the client request to an HTTP/1.0 origin request
//! - Emit the fixed header set, in a fixed order
//!
//! # Design Decisions
//! - Client headers are never forwarded (no cookies, no auth)
//! - Header order and spelling are part of the wire contract, including
//!   the historical `Connections: close` line
//! - The user agent is an immutable value owned by the rewriter

use std::fmt;

use crate::config::RewriteConfig;

/// Protocol version sent to every origin.
pub const ORIGIN_VERSION: &str = "HTTP/1.0";

/// Builds outbound requests with a fixed header set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRewriter {
    user_agent: String,
}

impl RequestRewriter {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(config: &RewriteConfig) -> Self {
        Self::new(config.user_agent.clone())
    }

    /// Build the request sent to the origin for `method origin_path` on `host`.
    pub fn rewrite<'a>(
        &'a self,
        method: &'a str,
        origin_path: &'a str,
        host: &'a str,
    ) -> OutboundRequest<'a> {
        OutboundRequest {
            method,
            origin_path,
            host,
            user_agent: &self.user_agent,
        }
    }
}

impl Default for RequestRewriter {
    fn default() -> Self {
        Self::from_config(&RewriteConfig::default())
    }
}

/// A single HTTP/1.0 request destined for an origin server.
///
/// Built fresh for every relay; `Display` renders the exact wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundRequest<'a> {
    pub method: &'a str,
    pub origin_path: &'a str,
    pub host: &'a str,
    pub user_agent: &'a str,
}

impl OutboundRequest<'_> {
    /// Request line without the trailing CRLF, for logging.
    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.origin_path, ORIGIN_VERSION)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for OutboundRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n", self.request_line())?;
        write!(f, "Host: {}\r\n", self.host)?;
        write!(f, "User-Agent: {}\r\n", self.user_agent)?;
        f.write_str("Connections: close\r\n")?;
        f.write_str("Proxy-Connection: close\r\n")?;
        f.write_str("\r\n")
    }
}
