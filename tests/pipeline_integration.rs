//! End-to-end pipeline tests against a mock archive: list, fetch, filter, write.

use std::sync::Arc;

use homebrew_catalog::{
    ArchiveClient, CatalogScraper, FetchError, FixedDelay, ScraperConfig, write_catalog,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

fn scraper_for(mock_server: &MockServer) -> CatalogScraper {
    let client = ArchiveClient::new(ScraperConfig::with_base_url(mock_server.uri())).unwrap();
    CatalogScraper::with_throttle(client, Arc::new(FixedDelay::disabled()))
}

async fn mount_listing(mock_server: &MockServer, identifiers: &[&str]) {
    let docs: Vec<Value> = identifiers
        .iter()
        .map(|id| json!({"identifier": id, "title": id}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/advancedsearch.php"))
        .and(query_param("q", "collection:psp-homebrew-library"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"numFound": identifiers.len(), "docs": docs}
        })))
        .mount(mock_server)
        .await;
}

async fn mount_item(mock_server: &MockServer, identifier: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/metadata/{identifier}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

fn files(names: &[&str]) -> Value {
    Value::Array(names.iter().map(|name| json!({"name": name})).collect())
}

#[tokio::test]
async fn test_only_items_with_download_are_cataloged() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    mount_listing(&mock_server, &["a", "b"]).await;
    mount_item(
        &mock_server,
        "a",
        json!({"metadata": {"title": "A"}, "files": files(&["a.zip"])}),
    )
    .await;
    mount_item(
        &mock_server,
        "b",
        json!({"metadata": {"title": "B"}, "files": files(&["b.iso", "b.txt"])}),
    )
    .await;

    let report = scraper_for(&mock_server).run().await;

    assert_eq!(report.enumerated, 2);
    assert_eq!(report.catalog.total_items(), 1);
    assert_eq!(report.catalog.items()[0].identifier, "a");
    assert_eq!(report.skipped_no_download, ["b"]);
    assert_eq!(
        report.catalog.items()[0].download_url.as_deref(),
        Some(format!("{}/download/a/a.zip", mock_server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_one_failing_item_does_not_abort_the_others() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    mount_listing(&mock_server, &["first", "broken", "third"]).await;
    mount_item(&mock_server, "first", json!({"files": files(&["first.zip"])})).await;
    Mock::given(method("GET"))
        .and(path("/metadata/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_item(&mock_server, "third", json!({"files": files(&["third.pbp"])})).await;

    let report = scraper_for(&mock_server).run().await;

    let ids: Vec<_> = report
        .catalog
        .items()
        .iter()
        .map(|item| item.identifier.as_str())
        .collect();
    assert_eq!(ids, ["first", "third"]);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].identifier, "broken");
    assert!(matches!(
        report.failures[0].error,
        FetchError::HttpStatus { status: 500, .. }
    ));
}

#[tokio::test]
async fn test_download_selection_rules_across_items() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    mount_listing(&mock_server, &["zip-last", "rar-first", "text-only"]).await;
    mount_item(
        &mock_server,
        "zip-last",
        json!({"files": files(&["game.rar", "game.7z", "game.zip"])}),
    )
    .await;
    mount_item(
        &mock_server,
        "rar-first",
        json!({"files": files(&["notes.txt", "game.rar", "game.7z", "EBOOT.pbp"])}),
    )
    .await;
    mount_item(&mock_server, "text-only", json!({"files": files(&["readme.txt"])})).await;

    let report = scraper_for(&mock_server).run().await;
    let items = report.catalog.items();
    let base = mock_server.uri();

    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0].download_url.as_deref(),
        Some(format!("{base}/download/zip-last/game.zip").as_str())
    );
    assert_eq!(
        items[1].download_url.as_deref(),
        Some(format!("{base}/download/rar-first/game.rar").as_str())
    );
    assert!(items.iter().all(|item| item.identifier != "text-only"));
    assert_eq!(report.catalog.total_items(), items.len());
}

#[tokio::test]
async fn test_record_fields_derived_from_metadata() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    mount_listing(&mock_server, &["snes9x-psp"]).await;
    mount_item(
        &mock_server,
        "snes9x-psp",
        json!({
            "metadata": {
                "title": ["Snes9x TYL", "alt title"],
                "subject": ["retro games", "Emulators"],
                "keywords": "Action"
            },
            "files": files(&["snes9x.zip"])
        }),
    )
    .await;

    let report = scraper_for(&mock_server).run().await;
    let item = &report.catalog.items()[0];

    assert_eq!(item.title, "Snes9x TYL");
    assert_eq!(item.category, "Games");
    assert_eq!(item.tags.len(), 3);
    assert!(item.tags.contains("Action"));
    assert_eq!(item.url, format!("{}/details/snes9x-psp", mock_server.uri()));
}

#[tokio::test]
async fn test_listing_failure_writes_empty_catalog() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/advancedsearch.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let report = scraper_for(&mock_server).run().await;
    assert!(matches!(
        report.enumeration_error,
        Some(FetchError::Decode { .. })
    ));

    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("catalog.json");
    write_catalog(&report.catalog, &output).unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["total_items"], 0);
    assert_eq!(written["items"], json!([]));
    assert!(written["scraped_at"].as_str().unwrap().ends_with(" UTC"));
}

#[tokio::test]
async fn test_written_catalog_matches_report() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    mount_listing(&mock_server, &["one", "two"]).await;
    mount_item(
        &mock_server,
        "one",
        json!({"metadata": {"title": "Café Racer", "subject": "Games"}, "files": files(&["one.zip"])}),
    )
    .await;
    mount_item(
        &mock_server,
        "two",
        json!({"metadata": {"subject": "Utilities"}, "files": files(&["two.7z"])}),
    )
    .await;

    let report = scraper_for(&mock_server).run().await;
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("nested").join("catalog.json");
    write_catalog(&report.catalog, &output).unwrap();

    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(raw.contains("Café Racer"));
    assert!(raw.contains("\n  \"total_items\": 2"));

    let written: Value = serde_json::from_str(&raw).unwrap();
    let items = written["items"].as_array().unwrap();
    assert_eq!(written["total_items"].as_u64(), Some(items.len() as u64));
    assert_eq!(items[1]["title"], "");
    assert_eq!(items[1]["category"], "Utilities");
}
