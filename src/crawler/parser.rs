//! HTML parser for page metadata and repository listings
//!
//! This module handles parsing HTML content to extract:
//! - Page title and meta description
//! - Host-relative anchors from repository listing pages

use scraper::{Html, Selector};
use url::Url;

/// Metadata extracted from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    /// Text of the first `<title>` element
    pub title: Option<String>,

    /// `content` of `<meta name="description">`
    pub description: Option<String>,
}

/// Parses HTML content and extracts the title and meta description
///
/// # Example
///
/// ```
/// use webdex::crawler::parse_page_metadata;
///
/// let html = r#"<html><head><title>Test</title>
///     <meta name="description" content="A test page"></head></html>"#;
/// let meta = parse_page_metadata(html);
/// assert_eq!(meta.title.as_deref(), Some("Test"));
/// assert_eq!(meta.description.as_deref(), Some("A test page"));
/// ```
pub fn parse_page_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    PageMetadata {
        title: extract_title(&document),
        description: extract_meta_description(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the content of the description meta tag
fn extract_meta_description(document: &Html) -> Option<String> {
    let meta_selector = Selector::parse(r#"meta[name="description"]"#).ok()?;

    document
        .select(&meta_selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts host-relative anchors and resolves them against `host_root`
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="/...">` host-relative paths, in document order, duplicates kept
///
/// **Exclude:**
/// - Absolute and page-relative hrefs
/// - Protocol-relative hrefs (`//other.host/...`) and anything else that
///   resolves off the host root's origin
/// - Hrefs ending in `.git` (clone URLs)
///
/// When `scope` is given, only paths strictly below it are kept.
pub fn extract_relative_links(html: &str, host_root: &Url, scope: Option<&str>) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if !is_listing_href(href) {
            continue;
        }

        if let Some(scope) = scope {
            if !is_below(href, scope) {
                continue;
            }
        }

        let Ok(absolute_url) = host_root.join(href) else {
            continue;
        };

        // `/\other.host/...` parses as protocol-relative
        if absolute_url.origin() == host_root.origin() {
            links.push(absolute_url.to_string());
        }
    }

    links
}

fn is_listing_href(href: &str) -> bool {
    href.starts_with('/') && !href.starts_with("//") && !href.ends_with(".git")
}

/// True if `href` names a path strictly below `scope`
fn is_below(href: &str, scope: &str) -> bool {
    let scope = scope.trim_end_matches('/');
    href.strip_prefix(scope)
        .map(|rest| rest.starts_with('/') && rest.len() > 1)
        .unwrap_or(false)
}
