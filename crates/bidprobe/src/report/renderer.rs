//! ReportRenderer - per-bucket text logs and the summary report

use std::io::Write;

use crate::domain::{Bucket, Classification, Record, RenderError};

use super::Summary;

/// Printed in place of a bid response that was never parsed
pub const ABSENT_MARKER: &str = "<none>";

/// Section header written once at the top of a non-empty bucket log
pub fn section_header(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Good => "=== Successful responses ===",
        Bucket::Problematic => "=== Responses that parsed but had problems ===",
        Bucket::Invalid => "=== Responses that failed to parse ===",
        Bucket::Error => "=== Requests that received a non 200 HTTP response ===",
    }
}

fn log_target(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Good => "good log",
        Bucket::Problematic => "problematic log",
        Bucket::Invalid => "invalid log",
        Bucket::Error => "error log",
    }
}

/// Renders a finished classification
pub struct ReportRenderer<'a> {
    classification: &'a Classification,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(classification: &'a Classification) -> Self {
        Self { classification }
    }

    pub fn summary(&self) -> Summary {
        Summary::from(self.classification)
    }

    /// Write all four bucket logs, each to its own sink
    pub fn write_logs<G, P, I, E>(
        &self,
        good: &mut G,
        problematic: &mut P,
        invalid: &mut I,
        error: &mut E,
    ) -> Result<(), RenderError>
    where
        G: Write,
        P: Write,
        I: Write,
        E: Write,
    {
        self.write_log(Bucket::Good, good)?;
        self.write_log(Bucket::Problematic, problematic)?;
        self.write_log(Bucket::Invalid, invalid)?;
        self.write_log(Bucket::Error, error)?;
        Ok(())
    }

    /// Write the log for one bucket. Nothing is written for an empty bucket.
    pub fn write_log<W: Write>(&self, bucket: Bucket, out: &mut W) -> Result<(), RenderError> {
        let records = self.classification.bucket(bucket);
        if records.is_empty() {
            return Ok(());
        }

        let target = log_target(bucket);
        let mut render = || -> std::io::Result<()> {
            writeln!(out, "{}", section_header(bucket))?;
            for record in records {
                match bucket {
                    Bucket::Good => write_response_block(out, record)?,
                    Bucket::Problematic => {
                        write_response_block(out, record)?;
                        write_problems(out, record)?;
                    }
                    Bucket::Invalid => write_payload_block(out, record)?,
                    Bucket::Error => write_status_block(out, record)?,
                }
            }
            out.flush()
        };
        render().map_err(|e| RenderError::new(target, e))
    }

    /// Write the summary report lines
    pub fn write_summary<W: Write>(&self, out: &mut W) -> Result<(), RenderError> {
        let summary = self.summary();
        let mut render = || -> std::io::Result<()> {
            write!(out, "{}", summary)?;
            out.flush()
        };
        render().map_err(|e| RenderError::new("summary report", e))
    }
}

fn write_response_block<W: Write>(out: &mut W, record: &Record) -> std::io::Result<()> {
    writeln!(out, "BidRequest:")?;
    writeln!(out, "{}", record.request())?;
    writeln!(out, "BidResponse:")?;
    match record.bid_response() {
        Some(response) => writeln!(out, "{}", response),
        None => writeln!(out, "{}", ABSENT_MARKER),
    }
}

fn write_problems<W: Write>(out: &mut W, record: &Record) -> std::io::Result<()> {
    writeln!(out, "Problems:")?;
    for problem in record.problems() {
        writeln!(out, "\t{}", problem)?;
    }
    Ok(())
}

fn write_payload_block<W: Write>(out: &mut W, record: &Record) -> std::io::Result<()> {
    writeln!(out, "BidRequest:")?;
    writeln!(out, "{}", record.request())?;
    writeln!(out, "Payload represented as a list of byte ordinal values:")?;
    writeln!(out, "{:?}", record.payload().as_bytes())
}

fn write_status_block<W: Write>(out: &mut W, record: &Record) -> std::io::Result<()> {
    writeln!(out, "BidRequest:")?;
    writeln!(out, "{}", record.request())?;
    writeln!(out, "HTTP response status code: {}", record.status_code())
}
