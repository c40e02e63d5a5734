//! Tests for the HTTP translation provider against a mock server.

#![cfg(feature = "http")]

use horizon_l10n::prelude::*;
use horizon_l10n::translation::HttpProvider;
use horizon_l10n::{ProviderConfig, ProviderError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetches_json_translations() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/i18n/fr-FR.json"))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "home": { "title": "Accueil" }, "count": 3 })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = HttpProvider::new(format!("{}/i18n/", mock_server.uri())).unwrap();
    let data = provider.get_translation("fr-FR", None).await.unwrap();

    assert_eq!(data.get("home.title"), Some("Accueil"));
    assert_eq!(data.get("count"), Some("3"));
}

#[tokio::test]
async fn test_path_and_prefix_shape_the_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/locale-de.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{ "ok": "Ja" }"#))
        .mount(&mock_server)
        .await;

    let provider = HttpProvider::new(mock_server.uri())
        .unwrap()
        .with_prefix("locale-");
    assert_eq!(
        provider.url_for("de", Some("admin")),
        format!("{}/admin/locale-de.json", mock_server.uri())
    );

    let data = provider.get_translation("de", Some("admin")).await.unwrap();
    assert_eq!(data.get("ok"), Some("Ja"));
}

#[tokio::test]
async fn test_error_status_is_provider_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/xx.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let provider = HttpProvider::new(mock_server.uri()).unwrap();
    let err = provider.get_translation("xx", None).await.unwrap_err();
    assert!(matches!(err, ProviderError::Http { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let provider = HttpProvider::new(mock_server.uri()).unwrap();
    let err = provider.get_translation("en", None).await.unwrap_err();
    assert!(matches!(err, ProviderError::Parse { .. }));
}

#[tokio::test]
async fn test_configured_http_provider_feeds_service() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en-US.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{ "title": "Remote" }"#))
        .mount(&mock_server)
        .await;

    let config = L10nConfig::new()
        .with_storage(StorageStrategy::Disabled)
        .with_provider(ProviderConfig::Http {
            base_url: mock_server.uri(),
            prefix: String::new(),
        });
    let service = L10nService::new(config).unwrap();
    service.init().await.unwrap();

    assert_eq!(service.translate("title"), "Remote");
}
