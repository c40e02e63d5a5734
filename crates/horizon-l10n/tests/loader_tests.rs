//! Integration tests for translation loading from configured sources.

use std::path::Path;

use horizon_l10n::prelude::*;
use horizon_l10n::{MergeStrategy, ProviderConcurrency, ProviderConfig, ProviderFailurePolicy};

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("write translation file");
}

fn file_provider(dir: &Path) -> ProviderConfig {
    ProviderConfig::File {
        dir: dir.to_path_buf(),
        prefix: String::new(),
    }
}

/// Two translation directories: a base set and an override set.
fn layered() -> (tempfile::TempDir, tempfile::TempDir) {
    let base = tempfile::tempdir().unwrap();
    write(
        base.path(),
        "en-US.json",
        r#"{ "menu": { "open": "Open", "save": "Save" }, "title": "Editor" }"#,
    );
    let overrides = tempfile::tempdir().unwrap();
    write(
        overrides.path(),
        "en-US.toml",
        r#"
        title = "Editor Pro"
        [menu]
        save = "Save all"
        "#,
    );
    (base, overrides)
}

fn config(merge: MergeStrategy, base: &Path, overrides: &Path) -> L10nConfig {
    L10nConfig::new()
        .with_storage(StorageStrategy::Disabled)
        .with_merge(merge)
        .with_provider(file_provider(base))
        .with_provider(file_provider(overrides))
}

#[tokio::test]
async fn test_deep_merge_combines_nested_keys() {
    let (base, overrides) = layered();
    let service = L10nService::new(config(MergeStrategy::Deep, base.path(), overrides.path())).unwrap();
    service.init().await.unwrap();

    assert_eq!(service.translate("title"), "Editor Pro");
    assert_eq!(service.translate("menu.save"), "Save all");
    assert_eq!(service.translate("menu.open"), "Open");
}

#[tokio::test]
async fn test_shallow_merge_replaces_subtrees() {
    let (base, overrides) = layered();
    let service =
        L10nService::new(config(MergeStrategy::Shallow, base.path(), overrides.path())).unwrap();
    service.init().await.unwrap();

    assert_eq!(service.translate("menu.save"), "Save all");
    assert_eq!(service.translate("menu.open"), "menu.open");
}

#[tokio::test]
async fn test_fail_soft_skips_broken_provider() {
    let (base, overrides) = layered();
    write(overrides.path(), "en-US.json", "{ not json");

    for concurrency in [ProviderConcurrency::Sequential, ProviderConcurrency::Concurrent] {
        let mut config = config(MergeStrategy::Deep, base.path(), overrides.path());
        config.concurrency = concurrency;
        let service = L10nService::new(config).unwrap();
        service.init().await.unwrap();
        assert_eq!(service.translate("title"), "Editor");
    }
}

#[tokio::test]
async fn test_strict_policy_fails_init() {
    let (base, overrides) = layered();
    write(overrides.path(), "en-US.json", "{ not json");

    let config = config(MergeStrategy::Deep, base.path(), overrides.path())
        .with_provider_failure(ProviderFailurePolicy::Strict);
    let service = L10nService::new(config).unwrap();

    let err = service.init().await.unwrap_err();
    assert!(err.is_provider());
    assert_eq!(service.translate("title"), "title");
}

#[tokio::test]
async fn test_no_providers_is_empty_data() {
    let service = L10nService::new(L10nConfig::new().with_storage(StorageStrategy::Disabled)).unwrap();
    service.init().await.unwrap();
    assert!(service.store().get("en-US").unwrap().is_empty());
    assert_eq!(service.translate("anything"), "anything");
}

#[tokio::test]
async fn test_service_from_config_file() {
    let translations = tempfile::tempdir().unwrap();
    write(translations.path(), "locale-fr-FR.json", r#"{ "title": "Éditeur" }"#);
    let state = translations.path().join("state").join("locale.json");

    let document = format!(
        r#"
        default_locale = "fr-FR"
        default_currency = "EUR"
        default_timezone = "Europe/Paris"

        [storage]
        type = "file"
        path = {state}

        [[providers]]
        type = "file"
        dir = {dir}
        prefix = "locale-"
        "#,
        state = toml::Value::String(state.display().to_string()),
        dir = toml::Value::String(translations.path().display().to_string()),
    );
    let config_path = translations.path().join("l10n.toml");
    std::fs::write(&config_path, document).unwrap();

    let service = L10nService::new(L10nConfig::load(&config_path).unwrap()).unwrap();
    service.init().await.unwrap();
    assert_eq!(service.translate("title"), "Éditeur");
    service.set_currency("CHF").unwrap();

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(stored["horizon_l10n.language"], "fr-FR");
    assert_eq!(stored["horizon_l10n.currency"], "CHF");
}
