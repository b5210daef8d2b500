//! Client request-line handling.
//!
//! # Responsibilities
//! - Read the first line of the client request, bounded in size
//! - Split it into method, request URI and version
//!
//! # Design Decisions
//! - Only the request line is consumed; headers are left unread
//! - Parsing never fails: missing tokens become empty strings and the
//!   URI resolver rejects what cannot be forwarded
//! - Invalid UTF-8 is decoded lossily

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// The parts of the client's request line the relay cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingRequest {
    pub method: String,
    pub request_uri: String,
    pub http_version: String,
}

impl IncomingRequest {
    /// Split a request line on whitespace, ignoring any trailing tokens.
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace().map(str::to_string);
        Self {
            method: tokens.next().unwrap_or_default(),
            request_uri: tokens.next().unwrap_or_default(),
            http_version: tokens.next().unwrap_or_default(),
        }
    }
}

/// Read one line (through `\n`) of at most `limit` bytes.
///
/// Returns `Ok(None)` when the peer closed before sending anything.
pub async fn read_request_line<R>(reader: &mut R, limit: usize) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::with_capacity(limit.min(1024));
    let read = reader.take(limit as u64).read_until(b'\n', &mut line).await?;

    if read == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}
