//! Crawler module for fetching sources and feeding the index
//!
//! This module contains the crawling plumbing, including:
//! - HTTP fetching and failure classification
//! - HTML parsing for page metadata and repository listings
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{crawl_sources, Coordinator};
pub use fetcher::{build_http_client, fetch_text, user_agent_string, FetchFailure};
pub use parser::{extract_relative_links, parse_page_metadata, PageMetadata};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::sources::SourceKind;
use crate::WebdexError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Read each configured URL list
/// 3. Fetch every source through its adapter
/// 4. Merge each record into its index as it arrives
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `only` - Restrict the run to a single source family
pub async fn crawl(config: Config, only: Option<SourceKind>) -> Result<CrawlReport, WebdexError> {
    Coordinator::new(config)?.run(only).await
}
