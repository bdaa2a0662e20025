//! bidprobe CLI - exercise a real-time bidding endpoint
//!
//! Sends bid requests, records every exchange, classifies the responses and
//! writes per-category logs plus a summary report.

mod config;
mod output;
mod requests;
mod runner;
mod sender;

use anyhow::{anyhow, Context, Result};
use bidprobe::{Classifier, RecordStore};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use config::{Config, Overrides};
use sender::HttpBidSender;

#[derive(Parser)]
#[command(name = "bidprobe")]
#[command(about = "bidprobe - real-time bidding endpoint tester", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/bidprobe/config.toml)
    #[arg(short, long, global = true, env = "BIDPROBE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send bid requests and report on the responses
    Run {
        /// File with bid requests (JSON array or JSON Lines)
        requests: PathBuf,
        /// Endpoint URL
        #[arg(short, long, env = "BIDPROBE_URL")]
        url: Option<String>,
        /// Extra header sent with every request (NAME=VALUE, repeatable)
        #[arg(short = 'H', long = "header", value_parser = config::parse_header)]
        headers: Vec<(String, String)>,
        /// Number of concurrent workers
        #[arg(short, long)]
        workers: Option<usize>,
        /// Per-request timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,
        /// Base directory for log files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Send each request this many times
        #[arg(short, long, default_value = "1")]
        repeat: usize,
    },

    /// Show current configuration
    Config,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Run {
            requests,
            url,
            headers,
            workers,
            timeout,
            output_dir,
            repeat,
        } => {
            let overrides = Overrides {
                url,
                headers,
                workers,
                timeout_secs: timeout,
                output_dir,
            };
            cmd_run(cli.config, requests, overrides, repeat).await
        }
        Commands::Config => cmd_config(cli.config),
        Commands::Init { force } => cmd_init(cli.config, force),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_run(
    config_path: Option<PathBuf>,
    requests_path: PathBuf,
    overrides: Overrides,
    repeat: usize,
) -> Result<()> {
    let mut config = Config::load(config_path.as_deref())?;
    config.apply_overrides(overrides);

    let sender_config = config.sender_config()?;
    let sender = Arc::new(HttpBidSender::new(sender_config).context("Failed to set up sender")?);

    let requests = requests::repeat(requests::load(&requests_path)?, repeat)?;

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let span = info_span!("run", %run_id);

    span.in_scope(|| info!(url = sender.config().url(), "Starting run"));

    let store = Arc::new(RecordStore::new());
    let stats = runner::run(sender, requests, config.workers, Arc::clone(&store))
        .instrument(span.clone())
        .await;

    store.freeze();
    let store = Arc::try_unwrap(store)
        .map_err(|_| anyhow!("Record store is still shared after all workers finished"))?;

    let classification = Classifier::classify(store).context("Failed to classify records")?;

    let log_dir = output::run_dir(&config.output_dir, started_at);
    output::write_logs(&log_dir, &classification)?;
    span.in_scope(|| info!(dir = ?log_dir, "Wrote log files"));

    if stats.send_failures > 0 {
        eprintln!(
            "{} {} request(s) could not be sent and are not included below",
            "Warning:".yellow(),
            stats.send_failures
        );
    }

    output::print_summary(&mut std::io::stdout().lock(), &classification)?;
    eprintln!("{} Logs written to {:?}", "✓".green(), log_dir);

    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>) -> Result<()> {
    let path = match config_path {
        Some(p) => p,
        None => Config::config_path()?,
    };
    let config = Config::load(Some(path.as_path()))?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", path);
    println!(
        "  URL: {}",
        config.url.as_deref().map_or("Not set".red(), |u| u.cyan())
    );
    println!("  Workers: {}", config.workers);
    println!("  Timeout: {}s", config.timeout_secs);
    println!("  Output: {:?}", config.output_dir);
    println!("  Headers:");
    for (name, value) in &config.headers {
        println!("    {}: {}", name.cyan(), value);
    }

    Ok(())
}

fn cmd_init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match config_path {
        Some(p) => p,
        None => Config::config_path()?,
    };

    if path.exists() && !force {
        anyhow::bail!("{:?} already exists. Use --force to overwrite.", path);
    }

    let path = Config::default().save(Some(path.as_path()))?;
    println!("{} Default configuration written to {:?}", "✓".green(), path);
    println!("\n{}", "Set the endpoint URL before running:".dimmed());
    println!("  url = \"http://<host>:<port>/<path>\"");

    Ok(())
}
