//! Webdex: a flat JSON index of web resources
//!
//! This crate crawls Jekyll-style JSON page feeds, XML sitemaps and GitHub
//! repository listings, turns every discovered page into a [`PageRecord`] and
//! merges it into a persistent JSON index keyed by link.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sources;
pub mod storage;

use thiserror::Error;

/// Main error type for Webdex operations
#[derive(Debug, Error)]
pub enum WebdexError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Failed to read URL list {path}: {source}")]
    UrlList {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Webdex operations
pub type Result<T> = std::result::Result<T, WebdexError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use sources::{FetchOutcome, Skip, SkipReason, SourceAdapter, SourceKind};
pub use storage::{ChildPage, IndexStore, JsonIndexStore, PageRecord, ScalarMerge};
