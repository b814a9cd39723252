//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a paginated job listing and run full
//! refresh sessions end-to-end, including persistence and the report.

use jobsift::classify::{BlacklistRules, Classifier};
use jobsift::config::{
    ClassifierConfig, Config, CrawlerConfig, ExtractorConfig, OutputConfig, SiteConfig,
};
use jobsift::crawler::{refresh_dataset, StopReason};
use jobsift::output::write_report;
use jobsift::storage::RecordStore;
use std::path::Path;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            origin: base_url.to_string(),
            start_url: format!("{}/tyopaikat/sivu/1", base_url),
        },
        crawler: CrawlerConfig {
            max_pages: 10,
            delay_ms: 100, // Very short for testing
            delay_jitter_ms: 0,
            request_timeout_secs: 5,
        },
        extractor: ExtractorConfig::default(),
        output: OutputConfig {
            dataset_path: dir.join("jobs.csv").display().to_string(),
            report_path: dir.join("jobs.xlsx").display().to_string(),
            rules_path: dir.join(".blacklist.dat").display().to_string(),
        },
        classifier: ClassifierConfig::default(),
    }
}

/// Renders one listing page: (slug, category, company) per job
fn listing_page(jobs: &[(&str, &str, &str)], next: Option<u32>) -> String {
    let mut html = String::from("<!DOCTYPE html><html><head><title>Työpaikat</title>");
    if let Some(n) = next {
        html.push_str(&format!(r#"<link rel="next" href="/tyopaikat/sivu/{}">"#, n));
    }
    html.push_str("</head><body><div class=\"grid\">");
    for (slug, category, company) in jobs {
        html.push_str(&format!(
            r#"<div class="job-box">
                 <a class="job-box__hover gtm-search-result" href="/tyopaikat/tyo/{slug}"
                    data-job-slug="{slug}" data-category="{category}" data-company="{company}">
                   <h3 class="job-box__title">Job {slug}</h3>
                   <div class="job-box__job-location">Helsinki</div>
                   <span class="job-box__job-posted">Julkaistu 3 pv</span>
                 </a>
               </div>"#
        ));
    }
    html.push_str("</div></body></html>");
    html
}

async fn mount_page(server: &MockServer, page: u32, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/tyopaikat/sivu/{}", page)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_refresh_session() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    mount_page(
        &mock_server,
        1,
        listing_page(&[("rust-dev-1", "IT", "Acme"), ("seller-2", "Myynti", "Shop")], Some(2)),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        2,
        listing_page(&[("nurse-3", "Hoiva", "Care Oy")], None),
        1,
    )
    .await;

    let (store, outcome) = refresh_dataset(&config, 10, CancellationToken::new())
        .await
        .expect("refresh should succeed");

    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records_added, 3);
    assert_eq!(outcome.stop, StopReason::NoNextPage);
    assert!(outcome.yielded_output());

    let first = &store.records()[0];
    assert_eq!(first.id, "rust-dev-1");
    assert_eq!(first.title, "Job rust-dev-1");
    assert_eq!(first.category, "IT");
    assert_eq!(first.company, "Acme");
    assert_eq!(first.posted, "pv");
    assert_eq!(
        first.url,
        format!("{}/tyopaikat/tyo/rust-dev-1", mock_server.uri())
    );

    // The dataset on disk matches the returned store
    let reloaded = RecordStore::load(Path::new(&config.output.dataset_path)).unwrap();
    assert_eq!(reloaded, store);
    assert!(reloaded.last_refresh().is_some());
}

#[tokio::test]
async fn test_second_session_stops_on_known_jobs() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    mount_page(&mock_server, 1, listing_page(&[("a-1", "IT", "A"), ("b-2", "IT", "B")], Some(2)), 1).await;
    mount_page(&mock_server, 2, listing_page(&[("c-3", "IT", "C"), ("d-4", "IT", "D")], Some(3)), 1).await;
    mount_page(&mock_server, 3, listing_page(&[("e-5", "IT", "E")], None), 1).await;

    let (first_store, _) = refresh_dataset(&config, 10, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(first_store.len(), 5);
    mock_server.verify().await;

    // One new job is pushed on top; everything else shifts down
    mock_server.reset().await;
    mount_page(&mock_server, 1, listing_page(&[("new-6", "IT", "F"), ("a-1", "IT", "A")], Some(2)), 1).await;
    mount_page(&mock_server, 2, listing_page(&[("b-2", "IT", "B"), ("c-3", "IT", "C")], Some(3)), 1).await;
    mount_page(&mock_server, 3, listing_page(&[("d-4", "IT", "D"), ("e-5", "IT", "E")], None), 0).await;

    let (store, outcome) = refresh_dataset(&config, 10, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records_added, 1);
    assert_eq!(outcome.stop, StopReason::NoNewRecords);
    assert_eq!(store.len(), 6);
    assert_eq!(store.records()[5].id, "new-6");
}

#[tokio::test]
async fn test_unchanged_listing_yields_no_output() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    mount_page(&mock_server, 1, listing_page(&[("a-1", "IT", "A")], Some(2)), 2).await;
    mount_page(&mock_server, 2, listing_page(&[("b-2", "IT", "B")], None), 2).await;

    refresh_dataset(&config, 10, CancellationToken::new())
        .await
        .unwrap();
    let before = RecordStore::load(Path::new(&config.output.dataset_path)).unwrap();

    let (store, outcome) = refresh_dataset(&config, 10, CancellationToken::new())
        .await
        .unwrap();

    assert!(!outcome.yielded_output());
    assert_eq!(store.records(), before.records());
}

#[tokio::test]
async fn test_page_limit_bounds_session() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    mount_page(&mock_server, 1, listing_page(&[("a-1", "IT", "A")], Some(2)), 1).await;
    mount_page(&mock_server, 2, listing_page(&[("b-2", "IT", "B")], Some(3)), 0).await;

    let (store, outcome) = refresh_dataset(&config, 1, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.stop, StopReason::PageLimit);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_server_error_is_an_empty_page() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (store, outcome) = refresh_dataset(&config, 10, CancellationToken::new())
        .await
        .expect("transport errors must not fail the session");

    assert_eq!(outcome.pages_fetched, 1);
    assert!(!outcome.yielded_output());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_refresh_then_report() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());
    std::fs::write(
        &config.output.rules_path,
        "#categories\nmyynti\n#companies\n#buzzwords\nrust\n",
    )
    .unwrap();

    mount_page(
        &mock_server,
        1,
        listing_page(
            &[
                ("rust-dev-1", "IT", "Acme"),
                ("java-dev-2", "IT", "Beta"),
                ("seller-3", "Myynti", "Shop"),
            ],
            None,
        ),
        1,
    )
    .await;

    let (store, _) = refresh_dataset(&config, 10, CancellationToken::new())
        .await
        .unwrap();

    let rules = BlacklistRules::load(Path::new(&config.output.rules_path)).unwrap();
    let view = Classifier::new(rules, &config.classifier).classify(&store);
    assert_eq!(view.len(), 2);
    assert_eq!(view.excluded(), 1);
    assert_eq!(view.buzz_count(), 1);

    let report = write_report(&view, Path::new(&config.output.report_path)).unwrap();
    let expected = format!("{}_jobs.xlsx", store.last_refresh().unwrap());
    assert_eq!(report.file_name().unwrap().to_str().unwrap(), expected);
    assert!(report.exists());
}
