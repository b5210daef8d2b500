//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept, optional admission cap)
//!     → connection.rs (relay ID, state machine, connection pair)
//!     → Hand off to the relay engine
//!
//! Relay States:
//!     ReadRequest → Resolve → Connect → Forward → Relay → Closed
//! ```
//!
//! # Design Decisions
//! - Sockets are owned by exactly one relay task
//! - Both sockets are closed on every exit path

pub mod connection;
pub mod listener;

pub use connection::{ConnectionPair, RelayId, RelayState};
pub use listener::{ConnectionPermit, Listener, ListenerError};
