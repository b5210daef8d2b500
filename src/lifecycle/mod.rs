//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Validate → Init logging → Bind → Accept
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Ctrl+C → Trigger shutdown → Stop accepting → Exit
//! ```
//!
//! # Design Decisions
//! - Any startup error is fatal
//! - Relays in flight are not cancelled; they end with the process

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
