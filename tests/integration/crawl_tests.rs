//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small blog (listing pages, post pages
//! and comment pages) and run the full crawl cycle end-to-end.

use blog_harvest::config::{parse_config, Config};
use blog_harvest::crawler::{Coordinator, Post};
use blog_harvest::state::CrawlPhase;
use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output_dir: &Path, extra: &str) -> Config {
    let toml = format!(
        r#"
[site]
base-url = "{base_url}/"
blog-id = "testblog"

[crawler]
worker-count = 4
max-fetch-attempts = 3
retry-initial-delay-ms = 1
retry-max-delay-ms = 5
request-timeout-secs = 5

[user-agent]
crawler-name = "TestHarvester"
crawler-version = "1.0.0"

[output]
directory = "{dir}"
file-prefix = "posts_"
chunk-size = 5
{extra}
"#,
        base_url = base_url,
        dir = output_dir.display(),
        extra = extra,
    );
    parse_config(&toml).expect("test config should parse")
}

fn listing_page(ids: impl IntoIterator<Item = u32>) -> String {
    let mut html = String::from("<html><body>");
    for id in ids {
        html.push_str(&format!(
            r#"<h2><a class="posttitle" href="/post/{id}">Post {id}</a></h2>"#
        ));
    }
    html.push_str("</body></html>");
    html
}

fn post_page(id: u32) -> String {
    format!(
        r#"<html><body><div class="post">
            <a class="posttitle" href="/post/{id}"> Post {id} </a>
            <div class="postdate">جمعه ۱۵ مرداد ۱۳۹۵ ۱۴:۳۰</div>
            <div class="postcontent"><p>Body of post {id}</p></div>
            <a class="tagname">tag-{id}</a>
        </div></body></html>"#
    )
}

fn comments_page(id: u32) -> String {
    format!(
        r#"<html><body>
            <div class="box"><span class="author">Reader A</span><span class="date">۱۶ مرداد ۱۳۹۵ ۰۸:۰۰</span><div class="body">first on {id}</div></div>
            <div class="box"><span class="author">Reader B</span><div class="body">second on {id}</div></div>
        </body></html>"#
    )
}

async fn mount_listing(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("p", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_post(server: &MockServer, id: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/post/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(post_page(id)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments/"))
        .and(query_param("blogid", "testblog"))
        .and(query_param("postid", id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(comments_page(id)))
        .mount(server)
        .await;
}

/// Mounts a one-page blog with posts 1..=count followed by an empty page
async fn mount_blog(server: &MockServer, count: u32) {
    mount_listing(server, 1, listing_page(1..=count)).await;
    mount_listing(server, 2, listing_page([])).await;
    for id in 1..=count {
        mount_post(server, id).await;
    }
}

fn read_posts(path: &Path) -> Vec<Post> {
    let bytes = std::fs::read(path).expect("chunk file should exist");
    serde_json::from_slice(&bytes).expect("chunk file should be a JSON array of posts")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_writes_complete_chunks() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server, 12).await;
    let out = TempDir::new().unwrap();

    let config = create_test_config(&mock_server.uri(), out.path(), "");
    let mut coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(coordinator.phase(), CrawlPhase::Done);
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.links_dispatched, 12);
    assert_eq!(summary.posts_collected, 12);
    assert_eq!(summary.comments_collected, 24);
    assert!(summary.is_clean());

    assert_eq!(summary.chunk_files.len(), 3);
    let sizes: Vec<usize> = (0..3)
        .map(|i| read_posts(&out.path().join(format!("posts_{}.json", i))).len())
        .collect();
    assert_eq!(sizes, vec![5, 5, 2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_truncate_mode_drops_partial_chunk() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server, 12).await;
    let out = TempDir::new().unwrap();

    let config = create_test_config(&mock_server.uri(), out.path(), r#"chunk-mode = "truncate""#);
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.posts_collected, 12);
    assert_eq!(summary.chunk_files.len(), 2);
    assert_eq!(summary.posts_dropped, 2);
    assert!(!out.path().join("posts_2.json").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_post_keeps_its_own_comments() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server, 9).await;
    let out = TempDir::new().unwrap();

    let config = create_test_config(&mock_server.uri(), out.path(), "");
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    let posts: Vec<Post> = summary
        .chunk_files
        .iter()
        .flat_map(|path| read_posts(path))
        .collect();
    assert_eq!(posts.len(), 9);

    let titles: HashSet<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles.len(), 9);

    for post in &posts {
        let id = post.title.trim_start_matches("Post ");
        assert_eq!(post.content, format!("<p>Body of post {}</p>", id));
        assert_eq!(post.tags, vec![format!("tag-{}", id)]);
        assert_eq!(post.date.to_rfc3339(), "2016-08-05T14:30:00+03:30");

        assert_eq!(post.comments.len(), 2);
        assert_eq!(post.comments[0].name, "Reader A");
        assert_eq!(post.comments[0].comment, format!("first on {}", id));
        assert_eq!(post.comments[1].comment, format!("second on {}", id));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failing_post_is_retried_then_reported() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, listing_page(1..=12)).await;
    mount_listing(&mock_server, 2, listing_page([])).await;
    for id in (1..=12).filter(|id| *id != 7) {
        mount_post(&mock_server, id).await;
    }

    // Exactly max-fetch-attempts requests, verified when the server drops
    Mock::given(method("GET"))
        .and(path("/post/7"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), out.path(), "");
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.links_dispatched, 12);
    assert_eq!(summary.posts_collected, 11);
    assert_eq!(summary.post_failures.len(), 1);
    assert_eq!(summary.post_failures[0].0, "/post/7");
    assert!(summary.post_failures[0].1.contains("HTTP 500"));

    let written: usize = summary
        .chunk_files
        .iter()
        .map(|path| read_posts(path).len())
        .sum();
    assert_eq!(written, 11);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failing_comments_fail_the_whole_post() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, listing_page(1..=6)).await;
    mount_listing(&mock_server, 2, listing_page([])).await;
    for id in (1..=6).filter(|id| *id != 4) {
        mount_post(&mock_server, id).await;
    }

    // The post page itself is fine; only its comments are unreachable
    Mock::given(method("GET"))
        .and(path("/post/4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(post_page(4)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/comments/"))
        .and(query_param("postid", "4"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), out.path(), "");
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.post_failures.len(), 1);
    assert_eq!(summary.post_failures[0].0, "/post/4");
    assert!(summary.post_failures[0].1.contains("HTTP 500"));
    assert_eq!(summary.posts_collected, 5);
    assert_eq!(
        summary.links_dispatched,
        summary.posts_collected + summary.post_failures.len()
    );

    let titles: Vec<String> = summary
        .chunk_files
        .iter()
        .flat_map(|path| read_posts(path))
        .map(|post| post.title)
        .collect();
    assert_eq!(titles.len(), 5);
    assert!(!titles.iter().any(|title| title == "Post 4"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_page_limit_stops_pagination() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, listing_page(1..=3)).await;
    for id in 1..=6 {
        mount_post(&mock_server, id).await;
    }

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("p", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(4..=6)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), out.path(), "");
    config.crawler.page_limit = 1;
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.links_dispatched, 3);
    assert_eq!(summary.posts_collected, 3);
}

#[tokio::test]
async fn test_unreachable_listing_ends_with_empty_crawl() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), out.path(), "");
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.pages_fetched, 0);
    assert_eq!(summary.listing_failures, 1);
    assert_eq!(summary.links_dispatched, 0);
    assert!(summary.chunk_files.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_markdown_summary_is_written() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server, 2).await;
    let out = TempDir::new().unwrap();
    let summary_path = out.path().join("summary.md");

    let extra = format!(r#"summary-path = "{}""#, summary_path.display());
    let config = create_test_config(&mock_server.uri(), out.path(), &extra);
    Coordinator::new(config)
        .unwrap()
        .with_config_hash("cafe01")
        .run()
        .await
        .unwrap();

    let markdown = std::fs::read_to_string(&summary_path).unwrap();
    assert!(markdown.contains("- **Config Hash**: cafe01"));
    assert!(markdown.contains("| Posts collected | 2 |"));
}
