//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock websites and test the full
//! fetch, extract and enqueue cycle end-to-end.

use email_finder::batch::{BatchOrchestrator, InputRow};
use email_finder::config::{load_config, Config};
use email_finder::crawler::{CrawlOptions, Crawler, PageFetcher, PriorityPolicy};
use email_finder::extract::EmailExtractor;
use email_finder::output::{read_table, write_table};
use email_finder::{CrawlPhase, RowStatus};
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler with default settings apart from budget and timeout
fn test_crawler(max_pages: u32, request_timeout: Duration) -> Crawler {
    test_crawler_with(CrawlOptions {
        max_pages,
        request_timeout,
        ..CrawlOptions::default()
    })
}

fn test_crawler_with(options: CrawlOptions) -> Crawler {
    let config = Config::default();
    Crawler::new(
        PageFetcher::from_config(&config.user_agent).expect("Failed to build HTTP client"),
        EmailExtractor::new(&config.extractor),
        options,
    )
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

/// Mounts a GET mock for `route` that must be hit exactly `times` times
async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_mailto_seed_with_two_internal_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<a href="mailto:sales@shop.test">Sales</a>
                <a href="/page1">Page 1</a>
                <a href="/page2">Page 2</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/page1", html("<p>Nothing here</p>"), 1).await;
    mount_page(&server, "/page2", html("<p>Nor here</p>"), 1).await;

    let crawler = test_crawler(3, Duration::from_secs(5));
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::Completed);
    assert_eq!(outcome.status(), RowStatus::Ok);
    assert_eq!(outcome.addresses(), vec!["sales@shop.test"]);
    assert_eq!(outcome.stats.pages_fetched, 3);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn test_seed_timeout_fails_row() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<a href="mailto:late@shop.test">Late</a>"#).set_delay(Duration::from_secs(3)),
        1,
    )
    .await;

    let crawler = test_crawler(5, Duration::from_millis(300));
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::Fatal);
    assert_eq!(outcome.status(), RowStatus::Failed);
    assert!(outcome.addresses().is_empty());
    assert_eq!(outcome.error.as_ref().map(|e| e.kind()), Some("fetch_timeout"));
}

#[tokio::test]
async fn test_budget_never_exceeded() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<a href="/p1">1</a><a href="/p2">2</a><a href="/p3">3</a>
                <a href="/p4">4</a><a href="/p5">5</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/p1", html("<p>info@shop.test</p>"), 1).await;
    mount_page(&server, "/p2", html("<p>one</p>"), 1).await;
    for route in ["/p3", "/p4", "/p5"] {
        mount_page(&server, route, html("<p>never@shop.test</p>"), 0).await;
    }

    let crawler = test_crawler(3, Duration::from_secs(5));
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::BudgetExhausted);
    assert_eq!(outcome.status(), RowStatus::Ok);
    assert_eq!(outcome.stats.pages_attempted, 3);
    assert_eq!(outcome.addresses(), vec!["info@shop.test"]);
}

#[tokio::test]
async fn test_no_page_fetched_twice() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<a href="/a">A</a><a href="/b/">B</a><a href="/a#top">A again</a>"#),
        1,
    )
    .await;
    mount_page(
        &server,
        "/a",
        html(r#"<a href="/">Home</a><a href="/b">B</a><a href="a">Self</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/b", html(r#"<a href="/a">A</a><a href="./">Home</a>"#), 1).await;

    let crawler = test_crawler(10, Duration::from_secs(5));
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::Completed);
    assert_eq!(outcome.stats.pages_fetched, 3);
}

#[tokio::test]
async fn test_cross_origin_and_asset_links_not_followed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<a href="https://elsewhere.test/contact">Elsewhere</a>
                <a href="/logo.png">Logo</a>
                <a href="/catalog.pdf">Catalog</a>
                <a href="tel:+331234">Call</a>
                <a href="javascript:void(0)">JS</a>
                <a href="/team">Team</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/team", html("<p>jane [at] shop [dot] test</p>"), 1).await;
    mount_page(&server, "/logo.png", ResponseTemplate::new(200), 0).await;
    mount_page(&server, "/catalog.pdf", ResponseTemplate::new(200), 0).await;

    let crawler = test_crawler(10, Duration::from_secs(5));
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::Completed);
    assert_eq!(outcome.addresses(), vec!["jane@shop.test"]);
    assert_eq!(outcome.stats.important_pages.len(), 1);
    assert!(outcome.stats.important_pages[0].ends_with("/team"));
}

#[tokio::test]
async fn test_failed_and_non_html_pages_are_absorbed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<a href="/broken">Broken</a><a href="/feed">Feed</a><a href="/about">About</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/broken", ResponseTemplate::new(500), 1).await;
    mount_page(
        &server,
        "/feed",
        ResponseTemplate::new(200).set_body_raw(r#"{"mail":"json@shop.test"}"#, "application/json"),
        1,
    )
    .await;
    mount_page(&server, "/about", html("<p>Write to hello@shop.test</p>"), 1).await;

    let crawler = test_crawler(10, Duration::from_secs(5));
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::Completed);
    assert_eq!(outcome.status(), RowStatus::Ok);
    assert_eq!(outcome.addresses(), vec!["hello@shop.test"]);
    assert_eq!(outcome.stats.pages_failed, 1);
    assert_eq!(outcome.stats.pages_skipped, 1);
    assert_eq!(outcome.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_seed_http_error_fails_row() {
    let server = MockServer::start().await;
    mount_page(&server, "/", ResponseTemplate::new(404), 1).await;

    let outcome = test_crawler(5, Duration::from_secs(5))
        .crawl_seed(&server.uri())
        .await;

    assert_eq!(outcome.status(), RowStatus::Failed);
    assert_eq!(
        outcome.error.as_ref().map(|e| e.kind()),
        Some("fetch_http_error")
    );
}

#[tokio::test]
async fn test_non_html_seed_fails_row() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"),
        1,
    )
    .await;

    let outcome = test_crawler(5, Duration::from_secs(5))
        .crawl_seed(&server.uri())
        .await;

    assert_eq!(outcome.status(), RowStatus::Failed);
    assert_eq!(
        outcome.error.as_ref().map(|e| e.kind()),
        Some("unsupported_content_type")
    );
}

#[tokio::test]
async fn test_contact_page_wins_last_budget_slot() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<a href="/products">Products</a><a href="/blog">Blog</a><a href="/contact">Contact</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/contact", html("<p>office@shop.test</p>"), 1).await;
    mount_page(&server, "/products", html("<p>Products</p>"), 0).await;
    mount_page(&server, "/blog", html("<p>Blog</p>"), 0).await;

    let crawler = test_crawler(2, Duration::from_secs(5));
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::BudgetExhausted);
    assert_eq!(outcome.addresses(), vec!["office@shop.test"]);
}

#[tokio::test]
async fn test_strict_fifo_policy() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<a href="/products">Products</a><a href="/contact">Contact</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/products", html("<p>Products</p>"), 1).await;
    mount_page(&server, "/contact", html("<p>office@shop.test</p>"), 0).await;

    let crawler = test_crawler_with(CrawlOptions {
        max_pages: 2,
        request_timeout: Duration::from_secs(5),
        priority: PriorityPolicy::Fifo,
        ..CrawlOptions::default()
    });
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::BudgetExhausted);
    assert!(outcome.addresses().is_empty());
}

#[tokio::test]
async fn test_row_deadline_keeps_partial_results() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<p>first@shop.test</p><a href="/a">A</a><a href="/b">B</a>"#)
            .set_delay(Duration::from_millis(600)),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html("<p>a@shop.test</p>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount_page(&server, "/b", html("<p>b@shop.test</p>"), 0).await;

    let crawler = test_crawler_with(CrawlOptions {
        max_pages: 10,
        request_timeout: Duration::from_secs(5),
        row_timeout: Some(Duration::from_secs(1)),
        ..CrawlOptions::default()
    });
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::DeadlineReached);
    assert_eq!(outcome.status(), RowStatus::Partial);
    assert_eq!(outcome.addresses(), vec!["first@shop.test"]);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn test_batch_preserves_order_with_unreachable_row() {
    let site_a = MockServer::start().await;
    let site_c = MockServer::start().await;

    // Site A answers slowly so C finishes first
    mount_page(
        &site_a,
        "/",
        html(r#"<a href="mailto:a@site-a.test">A</a>"#).set_delay(Duration::from_millis(300)),
        1,
    )
    .await;
    mount_page(&site_c, "/", html(r#"<p>c@site-c.test</p>"#), 1).await;

    let rows = vec![
        InputRow::new(site_a.uri(), "A"),
        InputRow::new("http://127.0.0.1:1/", "B"),
        InputRow::new(site_c.uri(), "C"),
    ];

    let orchestrator = BatchOrchestrator::new(test_crawler(5, Duration::from_secs(2)), 3);
    let results = orchestrator.process(rows).await;

    let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);

    assert_eq!(results[0].status, RowStatus::Ok);
    assert_eq!(results[0].emails, vec!["a@site-a.test"]);

    assert_eq!(results[1].status, RowStatus::Failed);
    assert!(results[1].emails.is_empty());
    assert_eq!(
        results[1].error.as_ref().map(|e| e.kind()),
        Some("fetch_connection_error")
    );

    assert_eq!(results[2].status, RowStatus::Ok);
    assert_eq!(results[2].emails, vec!["c@site-c.test"]);
}

#[tokio::test]
async fn test_batch_with_single_worker() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html("<p>team@shop.test</p>"), 3).await;

    let rows = (0..3)
        .map(|i| InputRow::new(server.uri(), format!("Row {}", i)))
        .collect();
    let results = BatchOrchestrator::new(test_crawler(1, Duration::from_secs(2)), 1)
        .process(rows)
        .await;

    assert_eq!(results.len(), 3);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.name, format!("Row {}", i));
        assert_eq!(result.emails, vec!["team@shop.test"]);
    }
}

#[tokio::test]
async fn test_csv_round_trip_with_config_file() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html(r#"<a href="mailto:info@shop.test">Mail</a><p>sales (at) shop (dot) test</p>"#),
        1,
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let config_path = dir.path().join("finder.toml");
    let mut config_file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        config_file,
        "[crawler]\nmax-pages = 5\nrequest-timeout = 2\nmax-concurrency = 2\n\n[table]\nurl-column = \"website\"\n"
    )
    .unwrap();

    let input_path = dir.path().join("orgs.csv");
    std::fs::write(
        &input_path,
        format!("name,website,city\nShop,{},Lyon\nNobody,,Paris\n", server.uri()),
    )
    .unwrap();

    let config = load_config(&config_path).expect("Failed to load config");
    let table = read_table(&input_path).unwrap();
    let rows = table.input_rows(&config.table).unwrap();

    let results = BatchOrchestrator::from_config(&config)
        .unwrap()
        .process(rows)
        .await;

    let output_path = dir.path().join("out.csv");
    write_table(&output_path, &table, &results, &config.table, true).unwrap();

    let written = std::fs::read_to_string(&output_path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "name,website,city,email,email_status,email_error");
    assert_eq!(
        lines[1],
        format!("Shop,{},Lyon,info@shop.test; sales@shop.test,ok,", server.uri())
    );
    assert!(lines[2].starts_with("Nobody,,Paris,,failed,invalid_input"));
}

#[tokio::test]
async fn test_redirected_page_not_fetched_again() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/old",
        ResponseTemplate::new(301).insert_header("Location", "/new"),
        1,
    )
    .await;
    mount_page(
        &server,
        "/new",
        html(r#"<a href="/new">Here</a><a href="/contact">Contact</a>"#),
        1,
    )
    .await;
    mount_page(&server, "/contact", html("<p>office@shop.test</p>"), 1).await;

    let crawler = test_crawler(5, Duration::from_secs(5));
    let outcome = crawler.crawl_seed(&format!("{}/old", server.uri())).await;

    assert_eq!(outcome.phase, CrawlPhase::Completed);
    assert_eq!(outcome.stats.pages_fetched, 2);
    assert_eq!(outcome.addresses(), vec!["office@shop.test"]);
}

#[tokio::test]
async fn test_seed_redirect_to_other_host_keeps_crawling_both_hosts() {
    let server = MockServer::start().await;
    let port = server.address().port();

    mount_page(
        &server,
        "/",
        ResponseTemplate::new(301)
            .insert_header("Location", format!("http://localhost:{}/home", port).as_str()),
        1,
    )
    .await;
    mount_page(
        &server,
        "/home",
        html(&format!(
            r#"<a href="/contact">Contact</a><a href="http://127.0.0.1:{}/about">About</a>"#,
            port
        )),
        1,
    )
    .await;
    mount_page(&server, "/contact", html("<p>office@shop.test</p>"), 1).await;
    mount_page(&server, "/about", html("<p>sales@shop.test</p>"), 1).await;

    let crawler = test_crawler(10, Duration::from_secs(5));
    let outcome = crawler
        .crawl_seed(&format!("http://127.0.0.1:{}/", port))
        .await;

    assert_eq!(outcome.phase, CrawlPhase::Completed);
    assert_eq!(outcome.stats.pages_fetched, 3);
    assert_eq!(
        outcome.addresses(),
        vec!["office@shop.test", "sales@shop.test"]
    );
    assert_eq!(outcome.emails[0].found_on.host_str(), Some("localhost"));
    assert_eq!(outcome.emails[1].found_on.host_str(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_first_sighting_keeps_page_and_casing() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html(r#"<p>Sales@Shop.test</p><a href="/page1">More</a>"#),
        1,
    )
    .await;
    mount_page(
        &server,
        "/page1",
        html("<p>sales@shop.test or other@shop.test</p>"),
        1,
    )
    .await;

    let crawler = test_crawler(5, Duration::from_secs(5));
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.emails.len(), 2);
    assert_eq!(outcome.emails[0].address, "Sales@Shop.test");
    assert_eq!(outcome.emails[0].found_on.path(), "/");
    assert_eq!(outcome.emails[1].address, "other@shop.test");
    assert_eq!(outcome.emails[1].found_on.path(), "/page1");
}

#[tokio::test]
async fn test_scheme_variants_fetched_once() {
    let server = MockServer::start().await;
    let port = server.address().port();

    mount_page(
        &server,
        "/",
        html(&format!(
            r#"<a href="https://127.0.0.1:{}/contact">Secure</a><a href="/contact">Plain</a>"#,
            port
        )),
        1,
    )
    .await;
    mount_page(&server, "/contact", html("<p>office@shop.test</p>"), 1).await;

    let crawler = test_crawler(5, Duration::from_secs(5));
    let outcome = crawler.crawl_seed(&server.uri()).await;

    assert_eq!(outcome.phase, CrawlPhase::Completed);
    assert_eq!(outcome.stats.pages_fetched, 2);
    assert_eq!(outcome.stats.links_enqueued, 1);
}
