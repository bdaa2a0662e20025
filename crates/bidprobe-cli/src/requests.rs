//! Bid request file loading
//!
//! Accepts either a JSON array of requests or JSON Lines (one request per
//! non-blank line).

use anyhow::{bail, Context, Result};
use bidprobe::BidRequest;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load requests from a file
pub fn load(path: &Path) -> Result<Vec<BidRequest>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read requests from {:?}", path))?;
    parse(&content).with_context(|| format!("Invalid requests file {:?}", path))
}

/// Parse requests from file content
pub fn parse(content: &str) -> Result<Vec<BidRequest>> {
    let trimmed = content.trim_start();

    let requests: Vec<BidRequest> = if trimmed.starts_with('[') {
        let values: Vec<Value> =
            serde_json::from_str(trimmed).context("Failed to parse JSON array of requests")?;
        values.into_iter().map(BidRequest::new).collect()
    } else {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str::<Value>(line)
                    .map(BidRequest::new)
                    .with_context(|| format!("Failed to parse request on line {}", i + 1))
            })
            .collect::<Result<_>>()?
    };

    if requests.is_empty() {
        bail!("No bid requests found");
    }

    Ok(requests)
}

/// Repeat the request list `times` times, preserving order within each pass
pub fn repeat(requests: Vec<BidRequest>, times: usize) -> Result<Vec<BidRequest>> {
    let Some(total) = requests.len().checked_mul(times) else {
        bail!(
            "Repeating {} request(s) {} times is too many requests",
            requests.len(),
            times
        );
    };

    let mut all = Vec::new();
    all.try_reserve_exact(total)
        .with_context(|| format!("Cannot hold {} bid requests in memory", total))?;
    for _ in 0..times {
        all.extend(requests.iter().cloned());
    }
    Ok(all)
}
