//! Bidprobe Library
//!
//! Core of a real-time-bidding endpoint tester: a record store that is
//! written concurrently while requests are in flight and then frozen, a
//! classifier that buckets every recorded exchange, and a renderer for the
//! per-bucket logs and the summary report.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`)
//!   - `entities/`: Record, BidRequest, BidResponse, Payload, Exchange
//!   - `store`: RecordStore (Open -> Locked)
//!   - `services/`: Classifier
//!   - `errors`: StoreError, SendError, RenderError
//! - **Ports** (`ports/`): the BidSender transport interface
//! - **Report** (`report/`): Summary and ReportRenderer
//!
//! # Usage
//!
//! ```rust,ignore
//! use bidprobe::{Classifier, RecordStore, ReportRenderer};
//!
//! let store = RecordStore::new();
//! store.append(request, 200, payload);
//! store.freeze();
//!
//! let classification = Classifier::classify(store)?;
//! ReportRenderer::new(&classification).write_summary(&mut std::io::stdout())?;
//! ```

pub mod domain;
pub mod ports;
pub mod report;

// Re-export commonly used types
pub use domain::{
    BidRequest, BidResponse, Bucket, Classification, Classifier, Counters, Exchange, Payload,
    Record, RecordStore, RenderError, SendError, StoreError, StoreState, HTTP_OK,
};
pub use ports::{BidSender, SenderConfig};
pub use report::{ReportRenderer, Summary};
