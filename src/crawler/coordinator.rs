//! Crawl coordinator - drives the source adapters
//!
//! For every configured source family the coordinator reads the URL list,
//! builds the matching adapter, and upserts each record into the family's
//! index the moment it is produced. Skipped items are logged and tallied.

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::output::{CrawlReport, CrawlStatistics};
use crate::sources::{
    read_url_list, FeedAdapter, FetchOutcome, RepositoryAdapter, SitemapAdapter, SourceAdapter,
    SourceKind,
};
use crate::storage::{IndexStore, JsonIndexStore, StorageResult};
use crate::WebdexError;
use futures::StreamExt;
use reqwest::Client;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(WebdexError)` - Failed to build the HTTP client
    pub fn new(config: Config) -> Result<Self, WebdexError> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self { config, client })
    }

    /// Builds the adapter for a source family
    pub fn adapter(&self, kind: SourceKind) -> Result<Box<dyn SourceAdapter>, WebdexError> {
        let adapter: Box<dyn SourceAdapter> = match kind {
            SourceKind::Feed => Box::new(FeedAdapter::new(self.client.clone())),
            SourceKind::Sitemap => Box::new(SitemapAdapter::new(self.client.clone())),
            SourceKind::Repository => Box::new(RepositoryAdapter::new(
                self.client.clone(),
                &self.config.repository,
            )?),
        };
        Ok(adapter)
    }

    /// Opens the index a source family's records are merged into
    pub fn store(&self, kind: SourceKind) -> JsonIndexStore {
        JsonIndexStore::new(
            self.config.output.index_for(kind),
            self.config.index.scalar_merge,
        )
    }

    /// Crawls every configured family, or only `only` when given
    ///
    /// Families run in the order feeds, sitemaps, repositories. A family
    /// without a configured URL list is skipped.
    pub async fn run(&self, only: Option<SourceKind>) -> Result<CrawlReport, WebdexError> {
        let mut report = CrawlReport::default();

        for kind in SourceKind::ALL {
            if only.is_some_and(|only| only != kind) {
                continue;
            }

            let Some(list_path) = self.config.sources.list_for(kind) else {
                if only == Some(kind) {
                    tracing::warn!("No URL list configured for {}", kind);
                }
                continue;
            };

            let urls = read_url_list(list_path).map_err(|source| WebdexError::UrlList {
                path: list_path.display().to_string(),
                source,
            })?;

            let adapter = self.adapter(kind)?;
            let mut store = self.store(kind);

            tracing::info!(
                "Crawling {} {} into {}",
                urls.len(),
                kind,
                store.path().display()
            );

            let stats = crawl_sources(adapter.as_ref(), &urls, &mut store).await?;

            tracing::info!(
                "Finished {}: {} inserted, {} merged, {} skipped",
                kind,
                stats.inserted,
                stats.merged,
                stats.total_skipped()
            );

            report.families.push((kind, stats));
        }

        Ok(report)
    }
}

/// Runs one adapter over a list of source URLs, upserting as it goes
///
/// Fetch failures are counted, never returned. Only a failure to read or
/// write the index aborts the crawl.
pub async fn crawl_sources<S: IndexStore>(
    adapter: &dyn SourceAdapter,
    urls: &[String],
    store: &mut S,
) -> StorageResult<CrawlStatistics> {
    let mut stats = CrawlStatistics::default();

    for url in urls {
        tracing::debug!("Fetching {} source {}", adapter.kind(), url);
        stats.sources += 1;

        let mut outcomes = adapter.fetch(url);
        while let Some(outcome) = outcomes.next().await {
            match outcome {
                FetchOutcome::Fetched(record) => {
                    let link = record.link.clone();
                    let upsert = store.upsert(record)?;
                    tracing::debug!("{:?} {}", upsert, link);
                    stats.record_upsert(upsert);

                    let records = stats.records();
                    if records % 10 == 0 {
                        tracing::info!(
                            "Progress: {} records indexed, {} skipped",
                            records,
                            stats.total_skipped()
                        );
                    }
                }
                FetchOutcome::Skipped(skip) => {
                    tracing::warn!("Skipped {}: {}", skip.url, skip.reason);
                    stats.record_skip(&skip.reason);
                }
            }
        }
    }

    Ok(stats)
}
