//! Property tests for key resolution, interpolation, merging and setters.

use std::collections::BTreeMap;
use std::sync::Arc;

use horizon_l10n::prelude::*;
use horizon_l10n::translation::{DefaultTranslationHandler, KeyResolver, interpolate};
use horizon_l10n::MergeStrategy;
use parking_lot::Mutex;
use proptest::prelude::*;

/// Two-segment keys, so no key is a prefix of another.
fn nested_key() -> impl Strategy<Value = String> {
    "[a-c]\\.[a-z]{1,6}"
}

fn brace_free_text() -> impl Strategy<Value = String> {
    "[^{}]{0,24}"
}

fn data_from(pairs: &BTreeMap<String, String>) -> TranslationData {
    pairs
        .iter()
        .fold(TranslationData::new(), |data, (key, text)| data.with(key, text.as_str()))
}

fn handler() -> Arc<DefaultTranslationHandler> {
    Arc::new(DefaultTranslationHandler::new())
}

proptest! {
    #[test]
    fn text_without_placeholders_is_unchanged(text in brace_free_text(), value in ".{0,8}") {
        let params = Params::from([("name", value)]);
        prop_assert_eq!(interpolate(&text, &params), text);
    }

    #[test]
    fn placeholders_are_substituted_once(
        prefix in brace_free_text(),
        suffix in brace_free_text(),
        value in ".{0,12}",
        padding in " {0,2}",
    ) {
        let template = format!("{prefix}{{{padding}name{padding}}}{suffix}");
        let params = Params::new().with("name", &value).with("other", "X");
        prop_assert_eq!(interpolate(&template, &params), format!("{prefix}{value}{suffix}"));
    }

    #[test]
    fn unmatched_placeholders_stay_verbatim(prefix in brace_free_text(), name in "[a-z]{1,8}") {
        let template = format!("{prefix}{{{name}}}");
        prop_assert_eq!(interpolate(&template, &Params::new()), template.clone());
    }

    #[test]
    fn resolving_present_keys_is_deterministic(
        pairs in prop::collection::btree_map("[a-z]{1,8}", brace_free_text(), 1..12),
    ) {
        let data = data_from(&pairs);
        let resolver = KeyResolver::new(MissingKeyPolicy::Key, handler());
        for (key, text) in &pairs {
            let first = resolver.resolve(key, None, "en", Some(&data), &[]);
            let second = resolver.resolve(key, None, "en", Some(&data), &[]);
            prop_assert_eq!(&first, text);
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn absent_keys_follow_policy(
        pairs in prop::collection::btree_map("[a-z]{1,8}", brace_free_text(), 0..8),
        missing in "[A-Z]{1,8}(\\.[a-z]{1,4})?",
        default in brace_free_text(),
    ) {
        let data = data_from(&pairs);

        let by_key = KeyResolver::new(MissingKeyPolicy::Key, handler());
        prop_assert_eq!(by_key.resolve(&missing, None, "en", Some(&data), &[]), missing.clone());

        let by_default = KeyResolver::new(MissingKeyPolicy::Default(default.clone()), handler());
        prop_assert_eq!(by_default.resolve(&missing, None, "en", Some(&data), &[]), default);

        let fallback = Arc::new(TranslationData::new().with(&missing, "from fallback"));
        let by_fallback = KeyResolver::new(MissingKeyPolicy::Fallback(vec!["en".into()]), handler());
        prop_assert_eq!(
            by_fallback.resolve(&missing, None, "de", Some(&data), &[fallback]),
            "from fallback"
        );
    }

    #[test]
    fn deep_merge_is_a_keyed_union_with_later_winning(
        first in prop::collection::btree_map(nested_key(), "[a-z]{1,6}", 0..10),
        second in prop::collection::btree_map(nested_key(), "[a-z]{1,6}", 0..10),
    ) {
        let mut merged = data_from(&first);
        merged.merge(data_from(&second), MergeStrategy::Deep);

        let mut expected = first.clone();
        expected.extend(second.clone());
        prop_assert_eq!(merged.len(), expected.len());
        for (key, text) in &expected {
            prop_assert_eq!(merged.get(key), Some(text.as_str()));
        }
    }

    #[test]
    fn setting_a_valid_currency_reads_back(code in "[A-Za-z]{3}") {
        let service = L10nService::new(L10nConfig::new().with_storage(StorageStrategy::Disabled)).unwrap();
        let seen = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&seen);
        service.bus().attach(Channel::Currency, move |_| *counter.lock() += 1);

        let changed = service.set_currency(&code).unwrap();
        let upper = code.to_ascii_uppercase();
        prop_assert_eq!(service.currency(), upper.clone());
        prop_assert_eq!(*seen.lock(), usize::from(upper != "USD"));
        prop_assert_eq!(changed, upper != "USD");
    }

    #[test]
    fn setting_a_valid_language_reads_back(tag in "[a-z]{2,3}(-[A-Z]{2})?") {
        prop_assume!(tag != "en-US");
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let service = L10nService::new(L10nConfig::new().with_storage(StorageStrategy::Disabled)).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        service
            .bus()
            .attach(Channel::Language, move |change| sink.lock().push(change.value().to_string()));

        let changed = runtime.block_on(service.set_language(&tag)).unwrap();
        prop_assert!(changed);
        prop_assert_eq!(service.language(), tag.clone());
        prop_assert_eq!(seen.lock().clone(), vec![tag]);
    }
}
