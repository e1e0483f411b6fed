use crate::storage::ScalarMerge;
use crate::sources::SourceKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure for Webdex
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub sources: SourcesConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Newline-delimited URL lists, one per source family
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    /// JSON page feeds
    #[serde(default)]
    pub feeds: Option<PathBuf>,

    /// XML sitemaps
    #[serde(default)]
    pub sitemaps: Option<PathBuf>,

    /// Repository root pages
    #[serde(default)]
    pub repositories: Option<PathBuf>,
}

impl SourcesConfig {
    /// Returns the URL list configured for a source family, if any
    pub fn list_for(&self, kind: SourceKind) -> Option<&Path> {
        match kind {
            SourceKind::Feed => self.feeds.as_deref(),
            SourceKind::Sitemap => self.sitemaps.as_deref(),
            SourceKind::Repository => self.repositories.as_deref(),
        }
    }

    /// Number of configured source families
    pub fn configured_count(&self) -> usize {
        SourceKind::ALL
            .iter()
            .filter(|kind| self.list_for(**kind).is_some())
            .count()
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Index shared by feed and sitemap records
    #[serde(rename = "page-index")]
    pub page_index: PathBuf,

    /// Index holding repository container records
    #[serde(rename = "repository-index")]
    pub repository_index: PathBuf,
}

impl OutputConfig {
    /// Returns the index file a source family's records are merged into
    pub fn index_for(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Feed | SourceKind::Sitemap => &self.page_index,
            SourceKind::Repository => &self.repository_index,
        }
    }
}

/// Index merge behavior
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexConfig {
    #[serde(rename = "scalar-merge", default)]
    pub scalar_merge: ScalarMerge,
}

/// Repository listing behavior
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    /// Root that relative anchors are resolved against
    #[serde(rename = "host-root", default = "default_host_root")]
    pub host_root: String,

    /// Fetch every child page to record its title
    #[serde(rename = "child-titles", default)]
    pub child_titles: bool,

    /// Only keep anchors below the repository path
    #[serde(rename = "descendants-only", default)]
    pub descendants_only: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            host_root: default_host_root(),
            child_titles: false,
            descendants_only: false,
        }
    }
}

fn default_host_root() -> String {
    "https://github.com".to_string()
}
