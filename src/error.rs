// src/error.rs

use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

/// Everything that can abort an extraction run.
///
/// Unparseable HR values are not errors; they become missing values.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no tables found at {url}")]
    NoTables { url: String },

    #[error("table index {index} out of range: page has {found} table(s)")]
    TableIndex { index: usize, found: usize },

    #[error("selected table is missing column(s) {missing:?}; available columns: {available:?}")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("reading config {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parsing config {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("building HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("writing {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
