//! Ports (Interfaces)
//!
//! Abstract interfaces for the collaborators the core depends on.
//! Implementations live in the binary crate.

pub mod sender;

// Re-exports
pub use sender::*;
