//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the
//! adapters and the coordinator end-to-end against temporary index files.

use futures::StreamExt;
use std::path::Path;
use tempfile::TempDir;
use webdex::config::{
    Config, IndexConfig, OutputConfig, RepositoryConfig, SourcesConfig, UserAgentConfig,
};
use webdex::crawler::{build_http_client, crawl_sources, Coordinator};
use webdex::sources::{FeedAdapter, RepositoryAdapter, SitemapAdapter};
use webdex::{
    ChildPage, FetchOutcome, IndexStore, JsonIndexStore, PageRecord, ScalarMerge, SkipReason,
    SourceAdapter, SourceKind,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn client() -> reqwest::Client {
    build_http_client(&user_agent()).expect("Failed to build client")
}

fn repository_config(host_root: &str) -> RepositoryConfig {
    RepositoryConfig {
        host_root: host_root.to_string(),
        ..RepositoryConfig::default()
    }
}

/// Creates a test configuration whose URL lists and indexes live in `dir`
fn create_test_config(dir: &Path, host_root: &str) -> Config {
    Config {
        user_agent: user_agent(),
        sources: SourcesConfig {
            feeds: Some(dir.join("json.txt")),
            sitemaps: Some(dir.join("xml.txt")),
            repositories: Some(dir.join("github.txt")),
        },
        output: OutputConfig {
            page_index: dir.join("index/web/v1/index.json"),
            repository_index: dir.join("index/web/v1/github.com.json"),
        },
        index: IndexConfig::default(),
        repository: repository_config(host_root),
    }
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn collect(adapter: &dyn SourceAdapter, url: &str) -> Vec<FetchOutcome> {
    adapter.fetch(url).collect().await
}

fn records(outcomes: Vec<FetchOutcome>) -> Vec<PageRecord> {
    outcomes
        .into_iter()
        .filter_map(FetchOutcome::into_record)
        .collect()
}

#[tokio::test]
async fn test_feed_adapter_maps_entries() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/search.json",
        200,
        r#"[
            {"url": "https://blog.example.com/a", "title": "A", "description": "About A"},
            {"url": "https://blog.example.com/b", "title": "B", "snippet": "Snippet B"},
            {"url": "https://blog.example.com/c", "title": "C"}
        ]"#
        .to_string(),
    )
    .await;

    let adapter = FeedAdapter::new(client());
    let outcomes = collect(&adapter, &format!("{}/search.json", server.uri())).await;

    assert_eq!(
        records(outcomes),
        vec![
            PageRecord::leaf("https://blog.example.com/a", "A", "About A"),
            PageRecord::leaf("https://blog.example.com/b", "B", "Snippet B"),
            PageRecord::leaf("https://blog.example.com/c", "C", ""),
        ]
    );
}

#[tokio::test]
async fn test_feed_adapter_failed_fetch_produces_no_records() {
    let server = MockServer::start().await;
    mount_page(&server, "/search.json", 500, "oops".to_string()).await;

    let adapter = FeedAdapter::new(client());
    let feed_url = format!("{}/search.json", server.uri());
    let outcomes = collect(&adapter, &feed_url).await;

    assert_eq!(outcomes.len(), 1);
    match &outcomes[0] {
        FetchOutcome::Skipped(skip) => {
            assert_eq!(skip.url, feed_url);
            assert_eq!(skip.reason, SkipReason::HttpStatus(500));
        }
        other => panic!("Expected a skip, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sitemap_skips_failed_page() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/sitemap.xml",
        200,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/good</loc></url>
  <url><loc>{0}/missing</loc></url>
</urlset>"#,
            base_url
        ),
    )
    .await;
    mount_page(
        &server,
        "/good",
        200,
        r#"<html><head><title>Good Page</title>
        <meta name="description" content="A page that loads"></head></html>"#
            .to_string(),
    )
    .await;
    mount_page(&server, "/missing", 404, "not found".to_string()).await;

    let adapter = SitemapAdapter::new(client());
    let outcomes = collect(&adapter, &format!("{}/sitemap.xml", base_url)).await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        records(outcomes),
        vec![PageRecord::leaf(
            format!("{}/good", base_url),
            "Good Page",
            "A page that loads"
        )]
    );
}

#[tokio::test]
async fn test_sitemap_page_without_metadata() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/sitemap.xml",
        200,
        format!("<urlset><url><loc>{}/bare</loc></url></urlset>", base_url),
    )
    .await;
    mount_page(&server, "/bare", 200, "<html><body>hi</body></html>".to_string()).await;

    let adapter = SitemapAdapter::new(client());
    let records = records(collect(&adapter, &format!("{}/sitemap.xml", base_url)).await);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title(), "");
    assert_eq!(records[0].description(), "");
}

#[tokio::test]
async fn test_repository_listing_builds_container() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/owner/repo",
        200,
        r#"<html><body>
            <a href="/owner/repo/file1">file1</a>
            <a href="/owner/repo/file1.git">clone</a>
            <a href="https://external.com/x">external</a>
            </body></html>"#
            .to_string(),
    )
    .await;

    let adapter = RepositoryAdapter::new(client(), &repository_config(&base_url)).unwrap();
    let repo_url = format!("{}/owner/repo", base_url);
    let records = records(collect(&adapter, &repo_url).await);

    assert_eq!(
        records,
        vec![PageRecord::container(
            repo_url.clone(),
            vec![ChildPage::new(format!("{}/owner/repo/file1", base_url))]
        )]
    );
    assert_eq!(records[0].title, None);
    assert_eq!(records[0].description, None);
}

#[tokio::test]
async fn test_repository_child_titles_drop_failed_children() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/owner/repo",
        200,
        r#"<a href="/owner/repo/issues">issues</a><a href="/owner/repo/gone">gone</a>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/owner/repo/issues",
        200,
        "<html><head><title>Issues</title></head></html>".to_string(),
    )
    .await;
    mount_page(&server, "/owner/repo/gone", 404, String::new()).await;

    let config = RepositoryConfig {
        child_titles: true,
        ..repository_config(&base_url)
    };
    let adapter = RepositoryAdapter::new(client(), &config).unwrap();
    let records = records(collect(&adapter, &format!("{}/owner/repo", base_url)).await);

    assert_eq!(
        records[0].pages,
        vec![ChildPage::with_title(
            format!("{}/owner/repo/issues", base_url),
            "Issues"
        )]
    );
}

#[tokio::test]
async fn test_repository_descendants_only() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/owner/repo",
        200,
        r#"<a href="/features">features</a>
           <a href="/owner/repo/tree/main/docs">docs</a>
           <a href="/owner/other">other</a>"#
            .to_string(),
    )
    .await;

    let config = RepositoryConfig {
        descendants_only: true,
        ..repository_config(&base_url)
    };
    let adapter = RepositoryAdapter::new(client(), &config).unwrap();
    let records = records(collect(&adapter, &format!("{}/owner/repo", base_url)).await);

    assert_eq!(
        records[0].pages,
        vec![ChildPage::new(format!("{}/owner/repo/tree/main/docs", base_url))]
    );
}

#[tokio::test]
async fn test_repository_failed_root_is_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/owner/private", 404, String::new()).await;

    let adapter = RepositoryAdapter::new(client(), &repository_config(&server.uri())).unwrap();
    let outcomes = collect(&adapter, &format!("{}/owner/private", server.uri())).await;

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(&outcomes[0], FetchOutcome::Skipped(_)));
}

#[tokio::test]
async fn test_crawl_sources_upserts_and_tallies() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_page(
        &server,
        "/a.json",
        200,
        r#"[{"url": "https://x.example/1", "title": "One"},
            {"url": "https://x.example/2", "title": "Two"}]"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/b.json",
        200,
        r#"[{"url": "https://x.example/1", "title": "One again", "description": "Late"}]"#
            .to_string(),
    )
    .await;
    mount_page(&server, "/broken.json", 404, String::new()).await;

    let dir = TempDir::new().unwrap();
    let mut store = JsonIndexStore::new(dir.path().join("index.json"), ScalarMerge::FillEmpty);
    let adapter = FeedAdapter::new(client());
    let urls = vec![
        format!("{}/a.json", base_url),
        format!("{}/broken.json", base_url),
        format!("{}/b.json", base_url),
    ];

    let stats = crawl_sources(&adapter, &urls, &mut store).await.unwrap();

    assert_eq!(stats.sources, 3);
    assert_eq!(stats.inserted, 2);
    assert_eq!(stats.merged, 1);
    assert_eq!(stats.skipped.get("http-status"), Some(&1));

    let index = store.load().unwrap();
    assert_eq!(index.len(), 2);
    let first = store.find_by_link("https://x.example/1").unwrap().unwrap();
    assert_eq!(first.title(), "One");
    assert_eq!(first.description(), "Late");
}

#[tokio::test]
async fn test_full_run_writes_both_indexes() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/search.json",
        200,
        format!(r#"[{{"url": "{}/post", "title": "Post"}}]"#, base_url),
    )
    .await;
    mount_page(
        &server,
        "/sitemap.xml",
        200,
        format!(
            "<urlset><url><loc>{0}/post</loc></url><url><loc>{0}/about</loc></url></urlset>",
            base_url
        ),
    )
    .await;
    mount_page(
        &server,
        "/post",
        200,
        r#"<html><head><title>Post</title><meta name="description" content="From HTML"></head></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/about",
        200,
        "<html><head><title>About</title></head></html>".to_string(),
    )
    .await;
    mount_page(
        &server,
        "/owner/repo",
        200,
        r#"<a href="/owner/repo/src">src</a><a href="/owner/repo.git">clone</a>"#.to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("json.txt"), format!("{}/search.json\n", base_url)).unwrap();
    std::fs::write(dir.path().join("xml.txt"), format!("{}/sitemap.xml\n", base_url)).unwrap();
    std::fs::write(dir.path().join("github.txt"), format!("{}/owner/repo\n", base_url)).unwrap();

    let config = create_test_config(dir.path(), &base_url);
    let coordinator = Coordinator::new(config.clone()).expect("Failed to create coordinator");

    let report = coordinator.run(None).await.expect("Crawl failed");
    assert_eq!(report.get(SourceKind::Feed).unwrap().inserted, 1);
    assert_eq!(report.get(SourceKind::Sitemap).unwrap().inserted, 1);
    assert_eq!(report.get(SourceKind::Sitemap).unwrap().merged, 1);
    assert_eq!(report.get(SourceKind::Repository).unwrap().inserted, 1);

    let pages = JsonIndexStore::new(&config.output.page_index, ScalarMerge::FillEmpty);
    let page_records = pages.load().unwrap();
    assert_eq!(page_records.len(), 2);
    let post = pages
        .find_by_link(&format!("{}/post", base_url))
        .unwrap()
        .unwrap();
    assert_eq!(post.title(), "Post");
    assert_eq!(post.description(), "From HTML");

    // A second run appends the same children again
    coordinator
        .run(Some(SourceKind::Repository))
        .await
        .expect("Second crawl failed");

    let repositories = JsonIndexStore::new(&config.output.repository_index, ScalarMerge::FillEmpty);
    let repo_records = repositories.load().unwrap();
    assert_eq!(repo_records.len(), 1);
    let child = ChildPage::new(format!("{}/owner/repo/src", base_url));
    assert_eq!(repo_records[0].pages, vec![child.clone(), child]);
}

#[tokio::test]
async fn test_missing_url_list_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), "https://github.com");
    let coordinator = Coordinator::new(config).unwrap();

    let result = coordinator.run(Some(SourceKind::Feed)).await;

    assert!(matches!(result, Err(webdex::WebdexError::UrlList { .. })));
}
