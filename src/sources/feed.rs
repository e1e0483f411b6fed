//! JSON page feed adapter
//!
//! A feed is a JSON array of objects carrying `url`, `title` and optionally
//! `description` or `snippet`, as produced by Jekyll search/feed templates.

use crate::crawler::fetch_text;
use crate::sources::{FetchOutcome, Skip, SkipReason, SourceAdapter, SourceKind};
use crate::storage::PageRecord;
use futures::stream::{self, LocalBoxStream, StreamExt};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct FeedEntry {
    url: String,
    title: Option<String>,
    description: Option<String>,
    snippet: Option<String>,
}

impl FeedEntry {
    fn into_record(self) -> PageRecord {
        let description = self.description.or(self.snippet).unwrap_or_default();
        PageRecord::leaf(self.url, self.title.unwrap_or_default(), description)
    }
}

/// Adapter for JSON page feeds
#[derive(Debug, Clone)]
pub struct FeedAdapter {
    client: Client,
}

impl FeedAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_entries(&self, feed_url: &str) -> Vec<FetchOutcome> {
        match fetch_text(&self.client, feed_url).await {
            Ok(body) => parse_feed(feed_url, &body),
            Err(failure) => vec![Skip::new(feed_url, failure.into()).into()],
        }
    }
}

impl SourceAdapter for FeedAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Feed
    }

    fn fetch<'a>(&'a self, source_url: &'a str) -> LocalBoxStream<'a, FetchOutcome> {
        stream::once(self.fetch_entries(source_url))
            .flat_map(|outcomes| stream::iter(outcomes))
            .boxed_local()
    }
}

/// Turns a feed body into one outcome per array element
///
/// A body that is not a JSON array yields a single skip for the feed. An
/// element without a string `url` is skipped on its own.
pub fn parse_feed(feed_url: &str, body: &str) -> Vec<FetchOutcome> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(body) {
        Ok(entries) => entries,
        Err(e) => {
            return vec![Skip::new(
                feed_url,
                SkipReason::Malformed(format!("expected a JSON array: {}", e)),
            )
            .into()]
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, value)| match serde_json::from_value::<FeedEntry>(value) {
            Ok(entry) => FetchOutcome::Fetched(entry.into_record()),
            Err(e) => Skip::new(
                feed_url,
                SkipReason::Malformed(format!("entry {}: {}", index, e)),
            )
            .into(),
        })
        .collect()
}
