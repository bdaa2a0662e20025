//! Domain Entities
//!
//! - BidRequest: outbound auction request, opaque JSON
//! - BidResponse: structured reply read from a payload
//! - Payload / Exchange: raw result of one HTTP round trip
//! - Record: one logged exchange plus classification metadata

mod bid;
mod exchange;
mod record;

pub use bid::*;
pub use exchange::*;
pub use record::*;
