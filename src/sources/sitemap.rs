//! XML sitemap adapter
//!
//! Every `<url><loc>` entry is fetched as an HTML page and indexed with its
//! title and meta description. Entries whose page cannot be fetched are
//! skipped without retry.

use crate::crawler::{fetch_text, parse_page_metadata};
use crate::sources::{FetchOutcome, Skip, SkipReason, SourceAdapter, SourceKind};
use crate::storage::PageRecord;
use futures::stream::{self, LocalBoxStream, StreamExt};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;

/// Adapter for XML sitemaps
#[derive(Debug, Clone)]
pub struct SitemapAdapter {
    client: Client,
}

impl SitemapAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn list_locations(&self, sitemap_url: &str) -> Result<Vec<String>, Skip> {
        let body = fetch_text(&self.client, sitemap_url)
            .await
            .map_err(|failure| Skip::new(sitemap_url, failure.into()))?;

        let locations = parse_sitemap(&body).map_err(|e| {
            Skip::new(sitemap_url, SkipReason::Malformed(format!("invalid XML: {}", e)))
        })?;

        tracing::debug!("Sitemap {} lists {} pages", sitemap_url, locations.len());
        Ok(locations)
    }

    async fn fetch_page(&self, page_url: String) -> FetchOutcome {
        match fetch_text(&self.client, &page_url).await {
            Ok(body) => {
                let metadata = parse_page_metadata(&body);
                FetchOutcome::Fetched(PageRecord {
                    link: page_url,
                    title: metadata.title,
                    description: metadata.description,
                    pages: Vec::new(),
                })
            }
            Err(failure) => Skip::new(page_url, failure.into()).into(),
        }
    }
}

impl SourceAdapter for SitemapAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Sitemap
    }

    fn fetch<'a>(&'a self, source_url: &'a str) -> LocalBoxStream<'a, FetchOutcome> {
        stream::once(self.list_locations(source_url))
            .flat_map(move |listing| match listing {
                Ok(locations) => stream::iter(locations)
                    .then(move |location| self.fetch_page(location))
                    .boxed_local(),
                Err(skip) => stream::iter([FetchOutcome::Skipped(skip)]).boxed_local(),
            })
            .boxed_local()
    }
}

/// Extracts page URLs from a sitemap document
///
/// Only the first `<loc>` of each `<url>` entry counts, so extension elements
/// such as `<image:loc>` and the `<sitemap><loc>` entries of a sitemap index
/// are ignored.
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locations = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;
    let mut seen_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"url" => {
                    in_url = true;
                    seen_loc = false;
                }
                b"loc" if in_url && !seen_loc => {
                    in_loc = true;
                    current.clear();
                }
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"url" => in_url = false,
                b"loc" if in_loc => {
                    in_loc = false;
                    seen_loc = true;
                    let location = current.trim();
                    if !location.is_empty() {
                        locations.push(location.to_string());
                    }
                }
                _ => {}
            },
            Event::Text(text) if in_loc => current.push_str(&text.unescape()?),
            Event::CData(data) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&data.into_inner()))
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(locations)
}
