//! Reporting
//!
//! `Summary` is the plain-data result of a run; `ReportRenderer` writes the
//! per-bucket logs and the summary to any `std::io::Write` sink.

mod renderer;
mod summary;

pub use renderer::*;
pub use summary::*;
