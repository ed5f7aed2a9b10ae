//! MetadataFetcher cache behavior, against a stub object-XML server.

use mods::Druid;
use rollatron::MetadataFetcher;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<publicObject id="druid:zb497jz4405"><mods xmlns="http://www.loc.gov/mods/v3"/></publicObject>
"#;

fn druid() -> Druid {
    "zb497jz4405".parse().unwrap()
}

#[tokio::test]
async fn test_fetch_downloads_and_caches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zb497jz4405.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RECORD))
        .expect(1)
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let fetcher = MetadataFetcher::new(&format!("{}/", server.uri()), cache.path().to_path_buf());

    let xml = fetcher.fetch(&druid(), false).await.unwrap();
    assert_eq!(xml, RECORD);
    let cached = std::fs::read_to_string(cache.path().join("zb497jz4405.xml")).unwrap();
    assert_eq!(cached, RECORD);

    // Second fetch must come from the cache: the mock allows a single hit
    let again = fetcher.fetch(&druid(), false).await.unwrap();
    assert_eq!(again, RECORD);
}

#[tokio::test]
async fn test_redownload_replaces_cached_copy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zb497jz4405.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RECORD))
        .expect(1)
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    std::fs::write(cache.path().join("zb497jz4405.xml"), "stale record").unwrap();

    let fetcher = MetadataFetcher::new(&format!("{}/", server.uri()), cache.path().to_path_buf());
    let xml = fetcher.fetch(&druid(), true).await.unwrap();
    assert_eq!(xml, RECORD);

    let cached = std::fs::read_to_string(cache.path().join("zb497jz4405.xml")).unwrap();
    assert_eq!(cached, RECORD);
}

#[tokio::test]
async fn test_error_status_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zb497jz4405.xml"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let cache = tempfile::tempdir().unwrap();
    let fetcher = MetadataFetcher::new(&format!("{}/", server.uri()), cache.path().to_path_buf());

    let err = fetcher.fetch(&druid(), false).await.unwrap_err();
    assert!(err.to_string().contains("404"));
    assert!(!cache.path().join("zb497jz4405.xml").exists());
}
