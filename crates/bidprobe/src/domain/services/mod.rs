//! Domain Services

mod classifier;

pub use classifier::*;
