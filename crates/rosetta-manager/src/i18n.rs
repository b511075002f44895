use crate::error::ConfigError;
use crate::locale::LocaleState;
use bon::Builder;
use rosetta_core::{
    Lookup, NamespaceSelection, Params, TranslateError, TranslationStore, resolve,
};
use rosetta_lang::derived_fallback;
use std::sync::Arc;

#[derive(Builder, Clone, Debug, Default, Eq, PartialEq)]
pub struct I18nOptions {
    /// Locales tried, in order, when neither the current locale nor its
    /// primary subtag has a key.
    #[builder(default)]
    pub fallback_locales: Vec<String>,
    /// Splits keys into paths through nested key trees. `None` or `""` keeps
    /// keys flat.
    #[builder(into)]
    pub key_separator: Option<String>,
    /// Freeze the store once the primitive is built.
    #[builder(default)]
    pub freeze_registry: bool,
}

#[derive(Debug)]
struct Inner {
    store: Arc<TranslationStore>,
    locale: LocaleState,
    fallback_locales: Vec<String>,
    key_separator: Option<String>,
}

/// Ties a [`TranslationStore`] to a [`LocaleState`].
///
/// Cheap to clone. Every translator it hands out reads the current locale on
/// each call.
#[derive(Clone, Debug)]
pub struct I18n {
    inner: Arc<Inner>,
}

impl I18n {
    pub fn new(
        store: Arc<TranslationStore>,
        locale: LocaleState,
        options: I18nOptions,
    ) -> Result<Self, ConfigError> {
        let I18nOptions {
            fallback_locales,
            key_separator,
            freeze_registry,
        } = options;

        if let Some(missing) = fallback_locales
            .iter()
            .find(|fallback| !store.has_locale(fallback))
        {
            return Err(ConfigError::UnsupportedFallbackLocale(missing.clone()));
        }

        for supported in locale.supported_locales() {
            let has_translations = store.has_locale(supported)
                || derived_fallback(supported).is_some_and(|primary| store.has_locale(primary));

            if !has_translations {
                tracing::warn!(
                    locale = %supported,
                    "Supported locale has no registered translations"
                );
            }
        }

        if freeze_registry {
            store.freeze();
        }

        tracing::debug!(
            locale = %locale.language_tag(),
            fallback_locales = ?fallback_locales,
            key_separator = ?key_separator,
            "I18n initialized"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                store,
                locale,
                fallback_locales,
                key_separator: key_separator.filter(|separator| !separator.is_empty()),
            }),
        })
    }

    pub fn store(&self) -> &Arc<TranslationStore> {
        &self.inner.store
    }

    pub fn locale_state(&self) -> &LocaleState {
        &self.inner.locale
    }

    pub fn locale(&self) -> String {
        self.inner.locale.language_tag()
    }

    pub fn set_locale(&self, tag: &str) -> Result<(), ConfigError> {
        self.inner.locale.set_locale(tag)
    }

    /// Locales with registered translations.
    pub fn supported_locales(&self) -> Vec<String> {
        self.inner.store.supported_locales()
    }

    pub fn fallback_locales(&self) -> &[String] {
        &self.inner.fallback_locales
    }

    pub fn key_separator(&self) -> Option<&str> {
        self.inner.key_separator.as_deref()
    }

    /// A translator over every namespace of the current locale.
    pub fn translator(&self) -> Translator {
        Translator {
            i18n: self.clone(),
            namespaces: NamespaceSelection::All,
        }
    }

    /// A translator over the default namespace and `namespaces`, later
    /// namespaces taking priority.
    pub fn scope<I, S>(&self, namespaces: I) -> Translator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Translator {
            i18n: self.clone(),
            namespaces: NamespaceSelection::scoped(namespaces),
        }
    }

    pub fn translate(&self, key: &str) -> Result<String, TranslateError> {
        self.translator().translate(key)
    }

    pub fn translate_with(&self, key: &str, params: &Params) -> Result<String, TranslateError> {
        self.translator().translate_with(key, params)
    }
}

/// Resolves keys for the current locale within a set of namespaces.
#[derive(Clone, Debug)]
pub struct Translator {
    i18n: I18n,
    namespaces: NamespaceSelection,
}

impl Translator {
    pub fn translate(&self, key: &str) -> Result<String, TranslateError> {
        self.resolve(key, None)
    }

    pub fn translate_with(&self, key: &str, params: &Params) -> Result<String, TranslateError> {
        self.resolve(key, Some(params))
    }

    /// A nested translator: this translator's namespaces followed by
    /// `namespaces`, which win on conflicting keys.
    pub fn scope<I, S>(&self, namespaces: I) -> Translator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Translator {
            i18n: self.i18n.clone(),
            namespaces: self.namespaces.extended(namespaces),
        }
    }

    pub fn namespaces(&self) -> &NamespaceSelection {
        &self.namespaces
    }

    pub fn locale(&self) -> String {
        self.i18n.locale()
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    fn resolve(&self, key: &str, params: Option<&Params>) -> Result<String, TranslateError> {
        let inner = &self.i18n.inner;
        let snapshot = inner.locale.snapshot();

        let lookup = Lookup::new(&snapshot.language_tag, &self.namespaces)
            .with_fallback_locales(&inner.fallback_locales)
            .with_key_separator(inner.key_separator.as_deref());

        resolve(&inner.store, &lookup, key, params)
    }
}
