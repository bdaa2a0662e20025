//! Configuration management for bidprobe
//!
//! Stores the endpoint URL, request headers and run settings in
//! ~/.config/bidprobe/config.toml. Command-line flags override file values.

use anyhow::{Context, Result};
use bidprobe::SenderConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = "bidprobe";
const CONFIG_FILE: &str = "config.toml";

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Sent with every request. Kept last so it serializes as a trailing table.
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("API-VER".to_string(), "2.0".to_string()),
        ("REQ-TYPE".to_string(), "server".to_string()),
    ])
}

fn default_workers() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("bidprobe-logs")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            workers: default_workers(),
            timeout_secs: default_timeout_secs(),
            output_dir: default_output_dir(),
            headers: default_headers(),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub headers: Vec<(String, String)>,
    pub workers: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from `path` (or the default location), falling back to
    /// defaults when the file does not exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save config to `path` (or the default location)
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(path)
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.url {
            self.url = Some(url);
        }
        self.headers.extend(overrides.headers);
        if let Some(workers) = overrides.workers {
            self.workers = workers;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
    }

    /// Build the immutable sender configuration
    pub fn sender_config(&self) -> Result<SenderConfig> {
        let url = self
            .url
            .as_deref()
            .context("No endpoint URL configured. Pass --url or set BIDPROBE_URL.")?;

        Ok(SenderConfig::new(url)
            .with_headers(self.headers.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

/// Parse a `NAME=VALUE` header argument
pub fn parse_header(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("Invalid header '{}', expected NAME=VALUE", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Invalid header '{}', name is empty", arg));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
