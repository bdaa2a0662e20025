//! Log files and console summary

use anyhow::{Context, Result};
use bidprobe::{Classification, ReportRenderer};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const GOOD_LOG: &str = "good.log";
pub const PROBLEMATIC_LOG: &str = "problematic.log";
pub const INVALID_LOG: &str = "invalid.log";
pub const ERROR_LOG: &str = "error.log";

const SUMMARY_BANNER: &str = "=== Summary of real-time bidding test ===";

/// Directory for one run's logs, named after its start time
pub fn run_dir(base: &Path, started_at: DateTime<Utc>) -> PathBuf {
    base.join(format!("run-{}", started_at.format("%Y%m%dT%H%M%SZ")))
}

/// Write the four bucket logs into `dir`, creating it if needed
pub fn write_logs(dir: &Path, classification: &Classification) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;

    let mut good = create(dir, GOOD_LOG)?;
    let mut problematic = create(dir, PROBLEMATIC_LOG)?;
    let mut invalid = create(dir, INVALID_LOG)?;
    let mut error = create(dir, ERROR_LOG)?;

    ReportRenderer::new(classification)
        .write_logs(&mut good, &mut problematic, &mut invalid, &mut error)
        .context("Failed to write log files")?;

    Ok(())
}

fn create(dir: &Path, name: &str) -> Result<BufWriter<File>> {
    let path = dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("Failed to create log file {:?}", path))?;
    Ok(BufWriter::new(file))
}

/// Print the banner and summary report
pub fn print_summary<W: Write>(out: &mut W, classification: &Classification) -> Result<()> {
    writeln!(out, "{}", SUMMARY_BANNER.bold()).context("Failed to write summary")?;
    ReportRenderer::new(classification)
        .write_summary(out)
        .context("Failed to write summary")?;
    Ok(())
}
