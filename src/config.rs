//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::pricing::DownpaymentOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the product catalog API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Read products from this JSON file instead of the API
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Downpayment percentages offered to the shopper
    #[serde(default = "default_downpayment_options")]
    pub downpayment_options: Vec<u8>,

    /// Downpayment percentage selected when a product loads
    #[serde(default = "default_downpayment")]
    pub default_downpayment: u8,
}

fn default_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_downpayment_options() -> Vec<u8> {
    vec![20, 40]
}

fn default_downpayment() -> u8 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            catalog_file: None,
            proxy: None,
            timeout_secs: default_timeout_secs(),
            format: OutputFormat::Table,
            downpayment_options: default_downpayment_options(),
            default_downpayment: default_downpayment(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("emi-quote.toml");
        if local_config.exists() {
            debug!("Found emi-quote.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("emi-quote").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("EMI_API_URL") {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }

        if let Ok(file) = std::env::var("EMI_CATALOG_FILE") {
            if !file.trim().is_empty() {
                self.catalog_file = Some(PathBuf::from(file));
            }
        }

        if let Ok(proxy) = std::env::var("EMI_PROXY") {
            self.proxy = Some(proxy);
        }

        self
    }

    /// Builds the validated downpayment option set.
    pub fn downpayment_options(&self) -> Result<DownpaymentOptions> {
        DownpaymentOptions::new(self.downpayment_options.iter().copied())
            .and_then(|options| options.with_default(self.default_downpayment))
            .context("Invalid downpayment settings in config")
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
