//! Centralized configuration management for edgar-sheets

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// EDGAR asks automated clients to identify themselves with a contact address.
pub const USER_AGENT: &str = "edgar-sheets/0.1.0 (contact@example.com)";

pub const DEFAULT_ARCHIVE_ROOT: &str = "https://www.sec.gov/Archives/edgar/data";

pub const DEFAULT_REPORT_KEYWORDS: [&str; 3] = ["income", "balance", "cash"];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the workbook is written into
    pub output_dir: PathBuf,
    /// Root of the EDGAR archive, without the CIK segment
    pub archive_root: String,
    /// Lower-case substrings that select a report by its short name
    pub report_keywords: Vec<String>,
    /// Maximum number of report pages fetched at once
    pub concurrency: usize,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds; the client default applies when unset
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            archive_root: DEFAULT_ARCHIVE_ROOT.to_string(),
            report_keywords: DEFAULT_REPORT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            concurrency: 1,
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let output_dir = lookup("EDGAR_SHEETS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let archive_root = lookup("EDGAR_SHEETS_ARCHIVE_ROOT")
            .unwrap_or(defaults.archive_root);

        let report_keywords = match lookup("EDGAR_SHEETS_REPORT_KEYWORDS") {
            Some(raw) => parse_keywords(&raw),
            None => defaults.report_keywords,
        };

        let concurrency = parse_var(&lookup, "EDGAR_SHEETS_CONCURRENCY")?.unwrap_or(1);

        let http = HttpConfig {
            timeout_seconds: parse_var(&lookup, "EDGAR_SHEETS_HTTP_TIMEOUT_SECONDS")?,
            ..HttpConfig::default()
        };

        let config = Config {
            output_dir,
            archive_root,
            report_keywords,
            concurrency,
            http,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("EDGAR_SHEETS_CONCURRENCY must be at least 1");
        }
        if self.report_keywords.is_empty() {
            anyhow::bail!("EDGAR_SHEETS_REPORT_KEYWORDS must name at least one keyword");
        }
        if !self.archive_root.starts_with("http://") && !self.archive_root.starts_with("https://") {
            anyhow::bail!("Archive root is not an http(s) URL: {}", self.archive_root);
        }
        Ok(())
    }
}

fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Helper function to parse a variable as a specific type
fn parse_var<T, F>(lookup: &F, var_name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match lookup(var_name) {
        Some(val) => val.trim().parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        None => Ok(None),
    }
}
