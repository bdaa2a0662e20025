//! Summary - counts derived from a classification

use serde::Serialize;

use crate::domain::Classification;

pub const NO_BIDS_ERROR: &str = "ERROR: None of the responses had bids!";

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub requests_sent: usize,
    pub responses_ok: usize,
    pub responses_not_ok: usize,
    pub good: usize,
    pub invalid: usize,
    pub problematic: usize,
    /// Set when the without-bids counter equals the number of requests sent
    pub no_bids: bool,
}

impl From<&Classification> for Summary {
    fn from(classification: &Classification) -> Self {
        let counters = classification.counters;
        Self {
            requests_sent: counters.requests_sent,
            responses_ok: counters.responses_ok,
            responses_not_ok: classification.error.len(),
            good: classification.good.len(),
            invalid: classification.invalid.len(),
            problematic: classification.problematic.len(),
            no_bids: counters.responses_successful_without_bids == counters.requests_sent,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Requests sent: {}", self.requests_sent)?;
        writeln!(
            f,
            "Responses with a 200/OK HTTP response code: {}",
            self.responses_ok
        )?;
        writeln!(
            f,
            "Responses with a non-200 HTTP response code: {}",
            self.responses_not_ok
        )?;
        writeln!(f, "Good responses (no problems found): {}", self.good)?;
        writeln!(
            f,
            "Invalid (unparseable) with a 200/OK HTTP response code: {}",
            self.invalid
        )?;
        writeln!(f, "Parseable responses with problems: {}", self.problematic)?;
        if self.no_bids {
            writeln!(f, "{}", NO_BIDS_ERROR)?;
        }
        Ok(())
    }
}
