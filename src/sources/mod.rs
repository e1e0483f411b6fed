//! Source adapters
//!
//! Each adapter turns one external source (a JSON page feed, an XML sitemap or
//! a repository listing page) into a stream of [`FetchOutcome`]s. Failures
//! never end a stream early: a source or page that cannot be fetched or
//! understood becomes a [`FetchOutcome::Skipped`] item and the adapter moves on.

mod feed;
mod repository;
mod sitemap;

pub use feed::{parse_feed, FeedAdapter};
pub use repository::RepositoryAdapter;
pub use sitemap::{parse_sitemap, SitemapAdapter};

use crate::crawler::FetchFailure;
use crate::storage::PageRecord;
use futures::stream::LocalBoxStream;
use std::fmt;
use std::path::Path;

/// The three families of sources the crawler understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SourceKind {
    /// Jekyll-style JSON page feeds
    #[value(name = "feeds")]
    Feed,
    /// XML sitemaps
    #[value(name = "sitemaps")]
    Sitemap,
    /// Repository root listing pages
    #[value(name = "repositories")]
    Repository,
}

impl SourceKind {
    /// Every family, in crawl order
    pub const ALL: [SourceKind; 3] = [Self::Feed, Self::Sitemap, Self::Repository];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Feed => "feeds",
            Self::Sitemap => "sitemaps",
            Self::Repository => "repositories",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One item produced by an adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(PageRecord),
    Skipped(Skip),
}

impl FetchOutcome {
    pub fn into_record(self) -> Option<PageRecord> {
        match self {
            Self::Fetched(record) => Some(record),
            Self::Skipped(_) => None,
        }
    }
}

/// A source or page that produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub url: String,
    pub reason: SkipReason,
}

impl Skip {
    pub fn new(url: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            url: url.into(),
            reason,
        }
    }
}

impl From<Skip> for FetchOutcome {
    fn from(skip: Skip) -> Self {
        Self::Skipped(skip)
    }
}

/// Why nothing was recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Non-success HTTP status
    HttpStatus(u16),
    /// Connection, timeout or body read failure
    Network(String),
    /// The body did not have the expected shape
    Malformed(String),
}

impl SkipReason {
    /// Short stable label used when tallying skips
    pub fn label(&self) -> &'static str {
        match self {
            Self::HttpStatus(_) => "http-status",
            Self::Network(_) => "network",
            Self::Malformed(_) => "malformed",
        }
    }
}

impl From<FetchFailure> for SkipReason {
    fn from(failure: FetchFailure) -> Self {
        match failure {
            FetchFailure::HttpStatus { status_code } => Self::HttpStatus(status_code),
            FetchFailure::Network { error } => Self::Network(error),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            Self::Network(error) => write!(f, "network error: {}", error),
            Self::Malformed(message) => write!(f, "malformed content: {}", message),
        }
    }
}

/// Common interface of the three adapters
///
/// `fetch` is lazy: nothing is requested until the stream is polled, and each
/// call fetches the source again.
pub trait SourceAdapter {
    fn kind(&self) -> SourceKind;

    fn fetch<'a>(&'a self, source_url: &'a str) -> LocalBoxStream<'a, FetchOutcome>;
}

/// Reads a newline-delimited URL list
///
/// Lines are trimmed and blank lines are skipped.
pub fn read_url_list(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
