//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Acceptor and relays produce:
//!     → structured log events (tracing)
//!     → one `relay` span per connection (relay_id, peer)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//! ```

pub mod logging;
