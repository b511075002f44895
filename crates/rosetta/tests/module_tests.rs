use rosetta::{I18nConfig, TranslationStore, params};

rosetta::translation_module! {
    name: "common-en",
    locale: "en",
    payload: r#"{ "hello": "Hello {{ name }}!", "ok": "OK" }"#,
}

rosetta::translation_module! {
    name: "common-fr",
    locale: "fr",
    payload: r#"{ "hello": "Bonjour {{ name }} !" }"#,
}

rosetta::translation_module! {
    name: "inbox-en",
    locale: "en",
    namespace: "inbox",
    payload: r#"{ "messages": { "one": "One message.", "other": "{{ count }} messages." } }"#,
}

#[test]
fn modules_are_discovered() {
    let store = TranslationStore::new();

    assert_eq!(store.add_discovered_modules().unwrap(), 3);
    assert_eq!(store.supported_locales(), vec!["en", "fr"]);
    assert_eq!(store.namespaces("en"), vec!["__default", "inbox"]);
}

#[test]
fn init_registers_modules_without_assets() {
    let base = tempfile::tempdir().unwrap();
    let config = I18nConfig {
        fallback_locales: vec!["en".to_owned()],
        ..I18nConfig::default()
    };

    let i18n = rosetta::init(&config, Some(base.path()), Some(vec!["fr-CA".to_owned()])).unwrap();
    assert_eq!(i18n.locale(), "fr");

    let name = params! { "name": "Ada" };
    assert_eq!(i18n.translate_with("hello", &name).unwrap(), "Bonjour Ada !");
    assert_eq!(i18n.translate("ok").unwrap(), "OK");

    let inbox = i18n.scope(["inbox"]);
    i18n.set_locale("en").unwrap();
    assert_eq!(
        inbox
            .translate_with("messages", &params! { "count": 1 })
            .unwrap(),
        "One message."
    );
}
