//! Configuration module for Webdex
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use webdex::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webdex.toml")).unwrap();
//! println!("Pages will be indexed into: {}", config.output.page_index.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, IndexConfig, OutputConfig, RepositoryConfig, SourcesConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
