//! Error types for catalog loading, configuration, page sources and reports
//!
//! Analysis itself has no error path: every string is a valid input.

use std::path::PathBuf;

use shared_types::ViolationCategory;
use thiserror::Error;

/// Pattern catalog failed its load-time self-check
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Catalog version must not be empty")]
    MissingVersion,

    #[error("Category '{0}' is defined more than once")]
    DuplicateCategory(ViolationCategory),

    #[error("Category '{0}' is missing from the catalog")]
    MissingCategory(ViolationCategory),

    #[error("Category '{0}' has no rules")]
    EmptyCategory(ViolationCategory),

    #[error("Empty phrase in category '{0}'")]
    EmptyPhrase(ViolationCategory),

    #[error("Invalid pattern '{pattern}' in category '{category}': {source}")]
    InvalidPattern {
        category: ViolationCategory,
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("Pattern '{pattern}' in category '{category}' matches empty text")]
    MatchesEmpty {
        category: ViolationCategory,
        pattern: String,
    },
}

/// Engine configuration could not be loaded or is inconsistent
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Material could not be obtained, so there is nothing to analyze.
///
/// Produced by fetch collaborators. Callers must surface it on its own and
/// never turn it into a verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Timed out after {seconds}s fetching {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("{url} responded with HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("Failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    #[error("No readable text at {url}")]
    EmptyDocument { url: String },
}

/// Report rendering or writing failed
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
