use rosetta_core::{CollisionPolicy, TranslateError, TranslationStore, params};
use rosetta_manager::{ConfigError, I18n, I18nOptions, LocaleOptions, LocaleState};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn tags(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|tag| (*tag).to_owned()).collect()
}

fn locale_state(supported: &[&str], default: &str) -> LocaleState {
    LocaleState::new(
        LocaleOptions::builder()
            .supported_locales(tags(supported))
            .default_locale(default)
            .preferred_locales(Vec::new())
            .build(),
    )
    .unwrap()
}

/// Layered registrations for the same keys, merged with overwrite.
fn default_translations() -> Arc<TranslationStore> {
    let store = TranslationStore::with_collision_policy(CollisionPolicy::Overwrite);

    store
        .add_json_value("en", None, json!({ "hello": "hello", "foo": "bar" }))
        .unwrap();
    store
        .add_json_value("fr", None, json!({ "hello": "bonjour" }))
        .unwrap();
    store
        .add_json_value("en", None, json!({ "hello": "hello!", "world": "world!" }))
        .unwrap();
    store
        .add_json_value("fr", None, json!({ "hello": "bonjour !", "world": "monde !" }))
        .unwrap();
    store
        .add_json_value("fr-BE", None, json!({ "world": "monde !!" }))
        .unwrap();

    Arc::new(store)
}

#[test]
fn translations_follow_locale_changes() {
    let i18n = I18n::new(
        default_translations(),
        locale_state(&["en", "fr", "fr-BE"], "en"),
        I18nOptions::builder()
            .fallback_locales(tags(&["en"]))
            .build(),
    )
    .unwrap();
    let translate = i18n.scope(["foo", "bar"]);

    assert_eq!(translate.translate("hello").unwrap(), "hello!");
    assert_eq!(translate.translate("world").unwrap(), "world!");
    assert_eq!(translate.translate("foo").unwrap(), "bar");
    assert_eq!(translate.locale(), "en");

    i18n.set_locale("fr-BE").unwrap();

    assert_eq!(translate.locale(), "fr-BE");
    assert_eq!(translate.translate("hello").unwrap(), "bonjour !");
    assert_eq!(translate.translate("world").unwrap(), "monde !!");
    assert_eq!(translate.translate("foo").unwrap(), "bar");
}

#[test]
fn parameters_survive_locale_changes() {
    let store = Arc::new(TranslationStore::new());
    store
        .add_json_value(
            "en",
            None,
            json!({ "hello": "hello {{ name }}", "welcome": "welcome {{ name }}" }),
        )
        .unwrap();
    store
        .add_json_value("fr", None, json!({ "hello": "bonjour {{ name }}" }))
        .unwrap();

    let i18n = I18n::new(
        store,
        locale_state(&["en", "fr", "fr-BE"], "en"),
        I18nOptions::builder()
            .fallback_locales(tags(&["en"]))
            .build(),
    )
    .unwrap();
    let params = params! { "name": "John" };

    assert_eq!(i18n.translate_with("hello", &params).unwrap(), "hello John");

    i18n.set_locale("fr-BE").unwrap();
    assert_eq!(i18n.translate_with("hello", &params).unwrap(), "bonjour John");
    assert_eq!(i18n.translate_with("welcome", &params).unwrap(), "welcome John");
}

#[test]
fn nested_keys_in_a_namespace() {
    let store = Arc::new(TranslationStore::new());
    store
        .add_json_value(
            "en",
            Some("foo"),
            json!({ "welcome": { "hello": "hello!" }, "world": "world!" }),
        )
        .unwrap();
    store
        .add_json_value(
            "fr",
            Some("foo"),
            json!({ "welcome": { "hello": "bonjour !" }, "world": "monde !" }),
        )
        .unwrap();

    let i18n = I18n::new(
        store,
        locale_state(&["en", "fr", "fr-BE"], "en"),
        I18nOptions::builder().key_separator(".").build(),
    )
    .unwrap();
    let translate = i18n.scope(["foo"]);

    assert_eq!(translate.translate("welcome.hello").unwrap(), "hello!");
    assert_eq!(translate.translate("world").unwrap(), "world!");

    i18n.set_locale("fr-BE").unwrap();
    assert_eq!(translate.translate("welcome.hello").unwrap(), "bonjour !");
    assert_eq!(translate.translate("world").unwrap(), "monde !");
}

#[test]
fn nearest_scope_wins() {
    let store = Arc::new(TranslationStore::new());
    store
        .add_json_value("en", None, json!({ "title": "default", "footer": "footer" }))
        .unwrap();
    store
        .add_json_value("en", Some("page"), json!({ "title": "page" }))
        .unwrap();
    store
        .add_json_value("en", Some("dialog"), json!({ "title": "dialog" }))
        .unwrap();

    let i18n = I18n::new(store, locale_state(&["en"], "en"), I18nOptions::default()).unwrap();

    let page = i18n.scope(["page"]);
    let dialog = page.scope(["dialog"]);
    let page_again = dialog.scope(["page"]);

    assert_eq!(page.translate("title").unwrap(), "page");
    assert_eq!(dialog.translate("title").unwrap(), "dialog");
    assert_eq!(dialog.translate("footer").unwrap(), "footer");
    assert_eq!(page_again.translate("title").unwrap(), "page");
}

#[test]
fn scope_under_the_global_translator_keeps_every_namespace() {
    let store = Arc::new(TranslationStore::new());
    store
        .add_json_value("en", None, json!({ "title": "default" }))
        .unwrap();
    store
        .add_json_value("en", Some("page"), json!({ "title": "page" }))
        .unwrap();
    store
        .add_json_value("en", Some("inbox"), json!({ "title": "inbox", "inbox_only": "inbox!" }))
        .unwrap();

    let i18n = I18n::new(store, locale_state(&["en"], "en"), I18nOptions::default()).unwrap();
    let global = i18n.translator();
    let page = global.scope(["page"]);

    assert_eq!(global.translate("inbox_only").unwrap(), "inbox!");
    assert_eq!(global.translate("title").unwrap(), "inbox");

    assert_eq!(page.translate("inbox_only").unwrap(), "inbox!");
    assert_eq!(page.translate("title").unwrap(), "page");
    assert_eq!(page.scope(["inbox"]).translate("title").unwrap(), "inbox");
}

#[test]
fn missing_translation_is_an_error() {
    let i18n = I18n::new(
        default_translations(),
        locale_state(&["en", "fr"], "en"),
        I18nOptions::default(),
    )
    .unwrap();

    assert_eq!(
        i18n.translate("nope").unwrap_err(),
        TranslateError::NotFound {
            key: "nope".to_owned()
        }
    );
}

#[test]
fn plural_follows_the_current_locale() {
    let store = Arc::new(TranslationStore::new());
    store
        .add_json_value(
            "en",
            None,
            json!({ "messages": { "one": "One message.", "other": "{{count}} messages." } }),
        )
        .unwrap();
    store
        .add_json_value(
            "fr",
            None,
            json!({ "messages": { "one": "{{count}} message.", "other": "{{count}} messages." } }),
        )
        .unwrap();

    let i18n = I18n::new(store, locale_state(&["en", "fr"], "en"), I18nOptions::default()).unwrap();
    let zero = params! { "count": 0 };

    assert_eq!(i18n.translate_with("messages", &zero).unwrap(), "0 messages.");
    i18n.set_locale("fr").unwrap();
    assert_eq!(i18n.translate_with("messages", &zero).unwrap(), "0 message.");
}

#[test]
fn subscribers_see_each_change_once() {
    let i18n = I18n::new(
        default_translations(),
        locale_state(&["en", "fr"], "en"),
        I18nOptions::default(),
    )
    .unwrap();

    let changes = Arc::new(AtomicUsize::new(0));
    let translator = i18n.translator();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let _subscription = i18n.locale_state().subscribe({
        let changes = Arc::clone(&changes);
        let seen = Arc::clone(&seen);
        move |_| {
            changes.fetch_add(1, Ordering::SeqCst);
            seen.lock().push(translator.translate("hello").unwrap());
        }
    });

    i18n.set_locale("fr").unwrap();
    i18n.set_locale("fr").unwrap();
    i18n.set_locale("en").unwrap();

    assert_eq!(changes.load(Ordering::SeqCst), 2);
    assert_eq!(*seen.lock(), vec!["bonjour !", "hello!"]);
}

#[test]
fn unsupported_locale_is_rejected() {
    let i18n = I18n::new(
        default_translations(),
        locale_state(&["en", "fr"], "en"),
        I18nOptions::default(),
    )
    .unwrap();

    assert_eq!(
        i18n.set_locale("de").unwrap_err(),
        ConfigError::UnsupportedLocale("de".to_owned())
    );
    assert_eq!(i18n.locale(), "en");
}

#[test]
fn frozen_registry_rejects_late_translations() {
    let store = default_translations();
    let _i18n = I18n::new(
        Arc::clone(&store),
        locale_state(&["en", "fr"], "en"),
        I18nOptions::builder().freeze_registry(true).build(),
    )
    .unwrap();

    assert!(
        store
            .add_json_value("en", Some("late"), json!({ "late": "late" }))
            .is_err()
    );
}

#[test]
fn supported_locales_come_from_the_store() {
    let i18n = I18n::new(
        default_translations(),
        locale_state(&["en", "fr", "fr-BE"], "en"),
        I18nOptions::default(),
    )
    .unwrap();

    assert_eq!(i18n.supported_locales(), vec!["en", "fr", "fr-BE"]);
}
