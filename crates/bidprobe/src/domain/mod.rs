//! Domain Layer
//!
//! Entities, the record store, classification and errors.
//! No transport or file handling lives here.

pub mod entities;
pub mod errors;
pub mod services;
pub mod store;

// Re-exports for convenience
pub use entities::*;
pub use errors::*;
pub use services::*;
pub use store::*;
