//! Absolute-form request URI resolution.
//!
//! # Responsibilities
//! - Split `scheme://authority/path` into host, port and origin path
//! - Default the port to "80" and the origin path to "/"
//!
//! # Design Decisions
//! - Lenient: only a missing `://` is an error. Userinfo, IPv6 literals,
//!   non-numeric ports and percent-encoding are passed through as-is
//! - The scheme itself is ignored; everything is forwarded as plain HTTP
//! - Pure function, no allocation beyond the three output strings

use thiserror::Error;

const SCHEME_SEPARATOR: &str = "://";
const DEFAULT_PORT: &str = "80";
const DEFAULT_ORIGIN_PATH: &str = "/";

/// Errors produced while resolving a request URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The URI has no scheme separator, so no authority can be found.
    #[error("invalid request URI {0:?}: missing \"://\"")]
    InvalidUri(String),
}

/// Where a request should be sent, derived from its absolute-form URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub host: String,
    pub port: String,
    pub origin_path: String,
}

impl ResolvedTarget {
    /// The `host:port` string used to open the origin connection.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Resolve an absolute-form URI such as `http://host:port/path`.
pub fn resolve(uri: &str) -> Result<ResolvedTarget, ParseError> {
    let start = uri
        .find(SCHEME_SEPARATOR)
        .ok_or_else(|| ParseError::InvalidUri(uri.to_string()))?;
    let remainder = &uri[start + SCHEME_SEPARATOR.len()..];

    let (authority, origin_path) = match remainder.find('/') {
        Some(slash) => (&remainder[..slash], &remainder[slash..]),
        None => (remainder, DEFAULT_ORIGIN_PATH),
    };

    let (host, port) = authority
        .split_once(':')
        .unwrap_or((authority, DEFAULT_PORT));

    Ok(ResolvedTarget {
        host: host.to_string(),
        port: port.to_string(),
        origin_path: origin_path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(host: &str, port: &str, origin_path: &str) -> ResolvedTarget {
        ResolvedTarget {
            host: host.into(),
            port: port.into(),
            origin_path: origin_path.into(),
        }
    }

    #[test]
    fn host_port_and_path() {
        assert_eq!(
            resolve("http://example.com:8080/a/b").unwrap(),
            target("example.com", "8080", "/a/b")
        );
    }

    #[test]
    fn default_port() {
        assert_eq!(
            resolve("http://example.com/").unwrap(),
            target("example.com", "80", "/")
        );
    }

    #[test]
    fn default_path() {
        assert_eq!(
            resolve("http://example.com").unwrap(),
            target("example.com", "80", "/")
        );
        assert_eq!(
            resolve("http://example.com:15213").unwrap(),
            target("example.com", "15213", "/")
        );
    }

    #[test]
    fn query_stays_in_origin_path() {
        let resolved = resolve("http://www.cmu.edu:80/hub/index.html?q=1&r=/x").unwrap();
        assert_eq!(resolved.origin_path, "/hub/index.html?q=1&r=/x");
        assert_eq!(resolved.authority(), "www.cmu.edu:80");
    }

    #[test]
    fn scheme_is_not_interpreted() {
        assert_eq!(
            resolve("https://secure.example/login").unwrap(),
            target("secure.example", "80", "/login")
        );
    }

    #[test]
    fn missing_scheme_separator_is_invalid() {
        for uri in ["/index.html", "example.com:80/", "", "http:/example.com"] {
            assert_eq!(
                resolve(uri),
                Err(ParseError::InvalidUri(uri.to_string())),
                "{uri:?}"
            );
        }
    }

    #[test]
    fn malformed_authorities_degrade_without_failing() {
        // Userinfo is not recognised; the first ':' splits host from port.
        assert_eq!(
            resolve("http://user:pw@example.com/").unwrap(),
            target("user", "pw@example.com", "/")
        );
        // Empty host after the separator is passed through.
        assert_eq!(resolve("http:///path").unwrap(), target("", "80", "/path"));
        // Only the first colon splits.
        assert_eq!(
            resolve("http://[::1]:8080/").unwrap(),
            target("[", ":1]:8080", "/")
        );
    }
}
