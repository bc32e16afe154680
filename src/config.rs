// src/config.rs

use crate::error::{ExtractError, Result};
use clap::Parser;
use reqwest::Client;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;
use url::Url;

/// Page holding the annual home run leader tables.
pub const DEFAULT_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_Major_League_Baseball_annual_home_run_leaders";

/// Second table on the page: the one with Year / Winner(s) / HR.
pub const DEFAULT_TABLE_INDEX: usize = 1;

pub const DEFAULT_OUTPUT: &str = "top_hr_leaders_wiki.csv";

pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Scrape the MLB annual home run leaders table into a CSV file"
)]
pub struct Args {
    /// Page to fetch.
    #[arg(long)]
    pub url: Option<String>,

    /// Zero-based position of the table among all tables on the page.
    #[arg(long)]
    pub table_index: Option<usize>,

    /// CSV file to write (overwritten).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds. No timeout when unset.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    pub user_agent: Option<String>,

    /// YAML file with any of the options above.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Options as read from a YAML config file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub table_index: Option<usize>,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl FileConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ExtractError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ExtractError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // an empty file deserializes to `null`
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

/// Resolved run configuration: CLI flags, then config file, then defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub url: Url,
    pub table_index: usize,
    pub output: PathBuf,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default URL should parse"),
            table_index: DEFAULT_TABLE_INDEX,
            output: PathBuf::from(DEFAULT_OUTPUT),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self> {
        let url_text = args
            .url
            .clone()
            .or(file.url)
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let url = Url::parse(&url_text).map_err(|source| ExtractError::InvalidUrl {
            url: url_text.clone(),
            source,
        })?;

        Ok(Self {
            url,
            table_index: args
                .table_index
                .or(file.table_index)
                .unwrap_or(DEFAULT_TABLE_INDEX),
            output: args
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            timeout: args
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs),
            user_agent: args
                .user_agent
                .clone()
                .or(file.user_agent)
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// HTTP client carrying the configured user agent and timeout.
    pub fn client(&self) -> Result<Client> {
        let mut builder = Client::builder().user_agent(self.user_agent.as_str());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(ExtractError::Client)
    }
}
