//! Integration tests for the scraper
//!
//! These tests use wiremock to serve a small storefront and run the full
//! listing walk, detail visits and CSV pipeline end-to-end.

use shelf_scout::config::{
    Config, FilterConfig, HttpConfig, OutputConfig, PolitenessConfig, SiteConfig,
};
use shelf_scout::crawler::Coordinator;
use shelf_scout::product::CSV_HEADER;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/uae-en/beauty/";

/// Creates a test configuration pointing at the mock storefront
fn create_test_config(root: &str, pages: u32, csv_path: &Path, cache_dir: Option<&Path>) -> Config {
    Config {
        site: SiteConfig {
            name: "teststore".to_string(),
            root: root.to_string(),
            listing_path: LISTING_PATH.to_string(),
            page_param: "page".to_string(),
            pages,
            currency: "AED".to_string(),
            host_pattern: Some("127.0.0.1*".to_string()),
        },
        politeness: PolitenessConfig {
            parallelism: 3,
            delay_ms: 0,
            random_delay_ms: 0,
            max_retries: 1,
            retry_backoff_ms: 0,
            request_timeout_secs: 5,
        },
        http: HttpConfig {
            user_agent: "TestAgent/1.0".to_string(),
            cache_dir: cache_dir.map(|dir| dir.display().to_string()),
        },
        filter: FilterConfig {
            min_rating_count: 100,
        },
        output: OutputConfig {
            csv_path: csv_path.display().to_string(),
        },
    }
}

fn listing_page(links: &[&str]) -> String {
    let items: String = links
        .iter()
        .map(|link| format!(r#"<div class="productContainer"><a href="{}">item</a></div>"#, link))
        .collect();
    format!("<html><body>{}</body></html>", items)
}

fn detail_page(title: &str, price: &str, rating: &str, best_seller: bool) -> String {
    let badge = if best_seller {
        r#"<div class="bestSellerLink">Best Seller</div>"#
    } else {
        ""
    };
    format!(
        r#"<html><body><div id="__next">
            <div data-qa="breadcrumbs-list">BeautyHair CareHair Dryers</div>
            <div data-qa="pdp-brand-dyson">Dyson</div>
            <h1>{}</h1>
            <div class="priceNow">AED&nbsp;{}</div>
            <div class="isPdp">{}</div>
            {}
            <div class="modelNumber">Model Number : HD07</div>
        </div></body></html>"#,
        title, price, rating, badge
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a two-page storefront: page 1 lists four products, page 2 always fails
async fn mount_storefront(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[
                    "/p/best-seller/",
                    "/p/popular/",
                    "/p/obscure/",
                    "/p/broken/",
                ]))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(server)
        .await;

    mount_html(
        server,
        "/p/best-seller/",
        detail_page("Supersonic, Fuchsia", "1,899.00", "4.7", true),
    )
    .await;
    mount_html(
        server,
        "/p/popular/",
        detail_page("Airwrap", "2,199.00", "4.6250", false),
    )
    .await;
    mount_html(
        server,
        "/p/obscure/",
        detail_page("Travel Dryer", "99.00", "3.912", false),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/p/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

fn data_rows(csv: &str) -> Vec<&str> {
    csv.lines().filter(|line| *line != CSV_HEADER).collect()
}

#[tokio::test]
async fn test_full_scrape_writes_notable_products() {
    let mock_server = MockServer::start().await;
    mount_storefront(&mock_server).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("products.csv");
    let config = create_test_config(&mock_server.uri(), 2, &csv_path, None);

    let summary = Coordinator::new(config, false)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Scrape failed");

    assert_eq!(summary.pages_walked, 1);
    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.visits_dispatched, 4);
    assert_eq!(summary.visits_emitted, 3);
    assert_eq!(summary.visits_failed, 1);
    assert_eq!(summary.rows_written, 2);

    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(csv.lines().next(), Some(CSV_HEADER));

    let rows = data_rows(&csv);
    assert_eq!(rows.len(), 2);

    let best_seller = rows
        .iter()
        .find(|row| row.contains("/p/best-seller/"))
        .expect("Best seller row missing");
    let fields: Vec<&str> = best_seller.split(',').collect();
    assert_eq!(fields.len(), 11);
    assert_eq!(fields[0], "Hair Dryers");
    assert_eq!(fields[1], "teststore");
    assert_eq!(fields[2], "Supersonic Fuchsia");
    assert_eq!(fields[3], "1899.00");
    assert_eq!(fields[4], "");
    assert_eq!(fields[5], "AED");
    assert_eq!(fields[7], "Dyson");
    assert_eq!(fields[8], "4.70");
    assert_eq!(fields[9], "");

    let popular = rows
        .iter()
        .find(|row| row.contains("/p/popular/"))
        .expect("Popular row missing");
    assert!(popular.contains(",4.60,250,"));

    assert!(!csv.contains("/p/obscure/"));

    let mut ranks: Vec<&str> = rows
        .iter()
        .filter_map(|row| row.rsplit(',').next())
        .collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec!["1", "2"]);
}

#[tokio::test]
async fn test_failed_detail_pages_are_retried_then_abandoned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["/p/broken/"])))
        .mount(&mock_server)
        .await;

    // First attempt plus one retry
    Mock::given(method("GET"))
        .and(path("/p/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("products.csv");
    let config = create_test_config(&mock_server.uri(), 1, &csv_path, None);

    let summary = Coordinator::new(config, false)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Scrape failed");

    assert_eq!(summary.visits_failed, 1);
    assert_eq!(summary.rows_written, 0);

    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(csv, format!("{}\n", CSV_HEADER));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_product_linked_from_every_page_is_visited_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["/p/a/"])))
        .expect(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p/a/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page("Supersonic", "1,899.00", "4.7", true)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("products.csv");
    let config = create_test_config(&mock_server.uri(), 3, &csv_path, None);

    let summary = Coordinator::new(config, false)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Scrape failed");

    assert_eq!(summary.pages_walked, 3);
    assert_eq!(summary.visits_dispatched, 1);
    assert_eq!(summary.visits_skipped, 2);
    assert_eq!(summary.rows_written, 1);

    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let rows = data_rows(&csv);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].ends_with(",1"));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_second_run_served_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["/p/best-seller/"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p/best-seller/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page("Supersonic", "1,899.00", "4.7", true)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("products.csv");
    let cache_dir = dir.path().join("cache");

    for _ in 0..2 {
        let config = create_test_config(&mock_server.uri(), 1, &csv_path, Some(&cache_dir));
        let summary = Coordinator::new(config, true)
            .expect("Failed to create coordinator")
            .run()
            .await
            .expect("Scrape failed");
        assert_eq!(summary.rows_written, 1);
    }

    mock_server.verify().await;

    // Append mode: one header per run
    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(csv.lines().filter(|line| *line == CSV_HEADER).count(), 2);
    assert_eq!(data_rows(&csv).len(), 2);
    assert!(cache_dir.join("teststore").is_dir());
}

#[tokio::test]
async fn test_no_cache_flag_bypasses_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("products.csv");
    let cache_dir = dir.path().join("cache");

    for _ in 0..2 {
        let config = create_test_config(&mock_server.uri(), 1, &csv_path, Some(&cache_dir));
        Coordinator::new(config, false)
            .expect("Failed to create coordinator")
            .run()
            .await
            .expect("Scrape failed");
    }

    mock_server.verify().await;
    assert!(!cache_dir.exists());
}
