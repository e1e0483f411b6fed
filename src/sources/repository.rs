//! Repository listing adapter
//!
//! A repository root page becomes one container record whose `pages` are the
//! host-relative anchors found on it. With `child-titles` enabled each child
//! page is also fetched for its `<title>`, and children that fail to load are
//! dropped from the listing.

use crate::config::RepositoryConfig;
use crate::crawler::{extract_relative_links, fetch_text, parse_page_metadata};
use crate::sources::{FetchOutcome, Skip, SourceAdapter, SourceKind};
use crate::storage::{ChildPage, PageRecord};
use futures::stream::{self, LocalBoxStream, StreamExt};
use reqwest::Client;
use url::Url;

/// Adapter for repository directory listings
#[derive(Debug, Clone)]
pub struct RepositoryAdapter {
    client: Client,
    host_root: Url,
    child_titles: bool,
    descendants_only: bool,
}

impl RepositoryAdapter {
    pub fn new(client: Client, config: &RepositoryConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            host_root: Url::parse(&config.host_root)?,
            child_titles: config.child_titles,
            descendants_only: config.descendants_only,
        })
    }

    async fn fetch_listing(&self, repository_url: &str) -> FetchOutcome {
        let body = match fetch_text(&self.client, repository_url).await {
            Ok(body) => body,
            Err(failure) => return Skip::new(repository_url, failure.into()).into(),
        };

        let scope = if self.descendants_only {
            Url::parse(repository_url)
                .ok()
                .map(|url| url.path().to_string())
        } else {
            None
        };

        let links = extract_relative_links(&body, &self.host_root, scope.as_deref());
        tracing::debug!("{} lists {} child links", repository_url, links.len());

        let pages = if self.child_titles {
            self.fetch_child_titles(links).await
        } else {
            links.into_iter().map(ChildPage::new).collect()
        };

        FetchOutcome::Fetched(PageRecord::container(repository_url, pages))
    }

    async fn fetch_child_titles(&self, links: Vec<String>) -> Vec<ChildPage> {
        let mut pages = Vec::with_capacity(links.len());

        for link in links {
            match fetch_text(&self.client, &link).await {
                Ok(body) => {
                    let title = parse_page_metadata(&body).title;
                    pages.push(ChildPage { link, title });
                }
                Err(failure) => {
                    tracing::warn!("Dropping child {}: {}", link, failure);
                }
            }
        }

        pages
    }
}

impl SourceAdapter for RepositoryAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Repository
    }

    fn fetch<'a>(&'a self, source_url: &'a str) -> LocalBoxStream<'a, FetchOutcome> {
        stream::once(self.fetch_listing(source_url)).boxed_local()
    }
}
