//! Output module for crawl summaries
//!
//! This module handles:
//! - Tallying per-family crawl outcomes, including skipped items
//! - Summarising the contents of index files
//! - Printing both for operators

pub mod stats;

pub use stats::{
    load_index_statistics, print_index_statistics, print_statistics, CrawlReport,
    CrawlStatistics, IndexStatistics,
};
