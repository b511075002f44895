use crate::error::RegistryError;
use crate::value::Translations;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Namespace holding globally scoped keys. It is always merged in, with the
/// lowest priority.
pub const DEFAULT_NAMESPACE: &str = "__default";

/// What happens when a registered key is added again with a different value.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CollisionPolicy {
    /// Fail with [`RegistryError::Collision`] and leave the registry untouched.
    #[default]
    Reject,
    /// Replace the registered value.
    Overwrite,
}

/// The namespaces merged into a dictionary.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum NamespaceSelection {
    /// The default namespace, then every other namespace in registration order.
    All,
    /// Like [`NamespaceSelection::All`], then the listed namespaces again so
    /// that they win over every other namespace.
    AllThen(Vec<String>),
    /// The listed namespaces, later ones overriding earlier ones.
    Only(Vec<String>),
}

impl NamespaceSelection {
    /// The default namespace followed by `namespaces`, without duplicates.
    ///
    /// A namespace listed twice keeps its last position.
    pub fn scoped<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(Vec::new()).extended(namespaces)
    }

    /// Appends `namespaces` after the current ones, so they take priority.
    ///
    /// Extending a selection over every namespace keeps every namespace and
    /// puts `namespaces` on top.
    pub fn extended<I, S>(&self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Self::All => Self::AllThen(with_priority(Vec::new(), namespaces)),
            Self::AllThen(current) => Self::AllThen(with_priority(current.clone(), namespaces)),
            Self::Only(current) => {
                let mut merged = with_priority(current.clone(), namespaces);
                merged.insert(0, DEFAULT_NAMESPACE.to_owned());
                Self::Only(merged)
            },
        }
    }
}

/// Moves or appends every namespace to the end of `current`, leaving the
/// default namespace out.
fn with_priority<I, S>(mut current: Vec<String>, namespaces: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for namespace in namespaces {
        let namespace = namespace.into();
        current.retain(|existing| *existing != namespace);
        current.push(namespace);
    }

    current.retain(|namespace| namespace != DEFAULT_NAMESPACE);
    current
}

type Registry = IndexMap<String, IndexMap<String, Translations>>;
type CacheKey = (String, NamespaceSelection);

/// Per-locale, per-namespace translations plus a cache of merged dictionaries.
///
/// Every successful mutation evicts the cached dictionaries of the mutated
/// locale, under the registry write lock.
#[derive(Debug, Default)]
pub struct TranslationStore {
    registry: RwLock<Registry>,
    cache: RwLock<FxHashMap<CacheKey, Arc<Translations>>>,
    frozen: AtomicBool,
    collision_policy: CollisionPolicy,
}

impl TranslationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collision_policy(collision_policy: CollisionPolicy) -> Self {
        Self {
            collision_policy,
            ..Self::default()
        }
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    /// Adds a key tree to `namespace` of `locale`, or to the default namespace
    /// when `namespace` is `None`.
    ///
    /// Either every key is added or, on error, none is.
    pub fn add_translations(
        &self,
        locale: &str,
        namespace: Option<&str>,
        translations: Translations,
    ) -> Result<(), RegistryError> {
        let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE);

        if self.is_frozen() {
            return Err(RegistryError::Frozen {
                locale: locale.to_owned(),
            });
        }

        let mut registry = self.registry.write();

        let changed: Vec<String> = registry
            .get(locale)
            .and_then(|namespaces| namespaces.get(namespace))
            .map(|existing| changed_keys(existing, &translations))
            .unwrap_or_default();

        if !changed.is_empty() {
            match self.collision_policy {
                CollisionPolicy::Reject => {
                    return Err(RegistryError::Collision {
                        locale: locale.to_owned(),
                        namespace: namespace.to_owned(),
                        keys: changed,
                    });
                },
                CollisionPolicy::Overwrite => {
                    tracing::warn!(locale, namespace, keys = ?changed, "Overwriting translations");
                },
            }
        }

        let count = translations.len();
        registry
            .entry(locale.to_owned())
            .or_default()
            .entry(namespace.to_owned())
            .or_default()
            .extend(translations);

        self.evict(locale);
        tracing::debug!(locale, namespace, count, "Added translations");

        Ok(())
    }

    /// Decodes a JSON object into a key tree and adds it.
    pub fn add_json(
        &self,
        locale: &str,
        namespace: Option<&str>,
        json: &str,
    ) -> Result<(), RegistryError> {
        let translations = serde_json::from_str(json).map_err(|source| RegistryError::Payload {
            locale: locale.to_owned(),
            source,
        })?;
        self.add_translations(locale, namespace, translations)
    }

    /// Like [`TranslationStore::add_json`], from an already parsed value.
    pub fn add_json_value(
        &self,
        locale: &str,
        namespace: Option<&str>,
        value: serde_json::Value,
    ) -> Result<(), RegistryError> {
        let translations =
            serde_json::from_value(value).map_err(|source| RegistryError::Payload {
                locale: locale.to_owned(),
                source,
            })?;
        self.add_translations(locale, namespace, translations)
    }

    /// Locale tags with at least one registered namespace, in registration order.
    pub fn supported_locales(&self) -> Vec<String> {
        self.registry.read().keys().cloned().collect()
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.registry.read().contains_key(locale)
    }

    /// Namespaces registered for `locale`, in registration order.
    pub fn namespaces(&self, locale: &str) -> Vec<String> {
        self.registry
            .read()
            .get(locale)
            .map(|namespaces| namespaces.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Rejects every further mutation with [`RegistryError::Frozen`].
    pub fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::AcqRel) {
            tracing::debug!("Translation registry frozen");
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Clears every translation, the merge cache and the frozen flag.
    pub fn reset(&self) {
        let mut registry = self.registry.write();
        registry.clear();
        self.cache.write().clear();
        self.frozen.store(false, Ordering::Release);
        tracing::debug!("Translation registry reset");
    }

    /// Returns the dictionary of `locale` merged across `selection`.
    ///
    /// Namespaces fold left to right and a later namespace replaces the
    /// top-level keys of an earlier one. Unknown locales and namespaces
    /// contribute nothing.
    pub fn merged(&self, locale: &str, selection: &NamespaceSelection) -> Arc<Translations> {
        let registry = self.registry.read();
        let key = (locale.to_owned(), selection.clone());

        if let Some(cached) = self.cache.read().get(&key) {
            return Arc::clone(cached);
        }

        let merged = Arc::new(merge_namespaces(registry.get(locale), selection));
        self.cache.write().insert(key, Arc::clone(&merged));
        merged
    }

    #[cfg(test)]
    pub(crate) fn cached_entries(&self) -> usize {
        self.cache.read().len()
    }

    fn evict(&self, locale: &str) {
        let mut cache = self.cache.write();
        let before = cache.len();
        cache.retain(|(cached, _), _| cached != locale);

        let evicted = before - cache.len();
        if evicted > 0 {
            tracing::debug!(locale, evicted, "Evicted merged translations");
        }
    }
}

fn changed_keys(existing: &Translations, incoming: &Translations) -> Vec<String> {
    incoming
        .iter()
        .filter(|(key, value)| existing.get(*key).is_some_and(|current| current != *value))
        .map(|(key, _)| key.clone())
        .collect()
}

fn merge_namespaces(
    namespaces: Option<&IndexMap<String, Translations>>,
    selection: &NamespaceSelection,
) -> Translations {
    let mut merged = Translations::new();
    let Some(namespaces) = namespaces else {
        return merged;
    };

    let mut fold = |translations: &Translations| {
        merged.extend(
            translations
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    };

    let fold_all = |fold: &mut dyn FnMut(&Translations)| {
        if let Some(default) = namespaces.get(DEFAULT_NAMESPACE) {
            fold(default);
        }
        namespaces
            .iter()
            .filter(|(name, _)| *name != DEFAULT_NAMESPACE)
            .for_each(|(_, translations)| fold(translations));
    };

    match selection {
        NamespaceSelection::All => fold_all(&mut fold),
        NamespaceSelection::AllThen(names) => {
            fold_all(&mut fold);
            names
                .iter()
                .filter_map(|name| namespaces.get(name))
                .for_each(fold);
        },
        NamespaceSelection::Only(names) => names
            .iter()
            .filter_map(|name| namespaces.get(name))
            .for_each(fold),
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TranslationValue;
    use serde_json::json;

    fn store_with(policy: CollisionPolicy) -> TranslationStore {
        let store = TranslationStore::with_collision_policy(policy);
        store
            .add_json_value("en", None, json!({ "hello": "hello...", "bye": "bye" }))
            .unwrap();
        store
    }

    #[test]
    fn colliding_key_is_rejected_atomically() {
        let store = store_with(CollisionPolicy::Reject);

        let error = store
            .add_json_value("en", None, json!({ "new": "new", "hello": "b" }))
            .unwrap_err();

        assert!(matches!(
            &error,
            RegistryError::Collision { locale, namespace, keys }
                if locale == "en" && namespace == DEFAULT_NAMESPACE && keys == &["hello"]
        ));
        let merged = store.merged("en", &NamespaceSelection::All);
        assert_eq!(merged.get("new"), None);
        assert_eq!(merged["hello"], TranslationValue::from("hello..."));
    }

    #[test]
    fn identical_registration_is_accepted() {
        let store = store_with(CollisionPolicy::Reject);
        store
            .add_json_value("en", None, json!({ "hello": "hello..." }))
            .unwrap();
    }

    #[test]
    fn same_key_in_other_namespace_does_not_collide() {
        let store = store_with(CollisionPolicy::Reject);
        store
            .add_json_value("en", Some("foo"), json!({ "hello": "hello!" }))
            .unwrap();

        assert_eq!(store.namespaces("en"), vec![DEFAULT_NAMESPACE, "foo"]);
    }

    #[test]
    fn overwrite_policy_merges_last_write_wins() {
        let store = store_with(CollisionPolicy::Overwrite);
        store
            .add_json_value("en", None, json!({ "hello": "b" }))
            .unwrap();

        let merged = store.merged("en", &NamespaceSelection::All);
        assert_eq!(merged["hello"], TranslationValue::from("b"));
        assert_eq!(merged["bye"], TranslationValue::from("bye"));
    }

    #[test]
    fn merge_folds_left_to_right() {
        let store = TranslationStore::new();
        store
            .add_json_value("en", Some("foo"), json!({ "hello": "foo", "only_foo": "x" }))
            .unwrap();
        store
            .add_json_value("en", Some("bar"), json!({ "hello": "bar" }))
            .unwrap();
        store
            .add_json_value("en", None, json!({ "hello": "default" }))
            .unwrap();

        let scoped = store.merged("en", &NamespaceSelection::scoped(["foo", "bar"]));
        assert_eq!(scoped["hello"], TranslationValue::from("bar"));
        assert_eq!(scoped["only_foo"], TranslationValue::from("x"));

        let reversed = store.merged("en", &NamespaceSelection::scoped(["bar", "foo"]));
        assert_eq!(reversed["hello"], TranslationValue::from("foo"));

        let all = store.merged("en", &NamespaceSelection::All);
        assert_eq!(all["hello"], TranslationValue::from("bar"));
    }

    #[test]
    fn unknown_locale_merges_to_empty() {
        let store = TranslationStore::new();
        assert!(store.merged("xx", &NamespaceSelection::All).is_empty());
    }

    #[test]
    fn mutation_evicts_only_the_mutated_locale() {
        let store = store_with(CollisionPolicy::Reject);
        store.add_json_value("fr", None, json!({ "hello": "salut" })).unwrap();

        let before = store.merged("en", &NamespaceSelection::All);
        store.merged("fr", &NamespaceSelection::All);
        assert_eq!(store.cached_entries(), 2);
        assert!(Arc::ptr_eq(&before, &store.merged("en", &NamespaceSelection::All)));

        store.add_json_value("en", None, json!({ "late": "late" })).unwrap();
        assert_eq!(store.cached_entries(), 1);

        let after = store.merged("en", &NamespaceSelection::All);
        assert_eq!(after["late"], TranslationValue::from("late"));
    }

    #[test]
    fn freeze_and_reset() {
        let store = store_with(CollisionPolicy::Reject);
        store.freeze();

        let error = store
            .add_json_value("en", None, json!({ "late": "late" }))
            .unwrap_err();
        assert!(matches!(error, RegistryError::Frozen { locale } if locale == "en"));

        store.reset();
        assert!(!store.is_frozen());
        assert!(store.supported_locales().is_empty());
        assert!(store.merged("en", &NamespaceSelection::All).is_empty());
        store
            .add_json_value("en", None, json!({ "late": "late" }))
            .unwrap();
    }

    #[test]
    fn invalid_payload() {
        let store = TranslationStore::new();
        let error = store.add_json("en", None, "[1, 2]").unwrap_err();

        assert!(matches!(error, RegistryError::Payload { locale, .. } if locale == "en"));
        assert!(!store.has_locale("en"));
    }

    #[test]
    fn supported_locales_in_registration_order() {
        let store = TranslationStore::new();
        for locale in ["fr", "en", "fr-BE"] {
            store.add_json_value(locale, None, json!({ "k": "v" })).unwrap();
        }
        assert_eq!(store.supported_locales(), vec!["fr", "en", "fr-BE"]);
    }

    #[test]
    fn scoped_selection_pins_default_first() {
        let selection = NamespaceSelection::scoped(["foo", "bar"]);
        assert_eq!(
            selection,
            NamespaceSelection::Only(vec![
                DEFAULT_NAMESPACE.to_owned(),
                "foo".to_owned(),
                "bar".to_owned()
            ])
        );

        let nested = selection.extended(["baz", "foo"]);
        assert_eq!(
            nested,
            NamespaceSelection::Only(vec![
                DEFAULT_NAMESPACE.to_owned(),
                "bar".to_owned(),
                "baz".to_owned(),
                "foo".to_owned()
            ])
        );

    }

    #[test]
    fn extending_all_keeps_every_namespace() {
        let nested = NamespaceSelection::All.extended(["foo", DEFAULT_NAMESPACE]);
        assert_eq!(nested, NamespaceSelection::AllThen(vec!["foo".to_owned()]));

        let deeper = nested.extended(["bar", "foo"]);
        assert_eq!(
            deeper,
            NamespaceSelection::AllThen(vec!["bar".to_owned(), "foo".to_owned()])
        );
    }

    #[test]
    fn priority_namespaces_win_over_later_registrations() {
        let store = TranslationStore::new();
        store
            .add_json_value("en", Some("page"), json!({ "title": "page", "page_only": "p" }))
            .unwrap();
        store
            .add_json_value("en", Some("dialog"), json!({ "title": "dialog", "dialog_only": "d" }))
            .unwrap();

        let all = store.merged("en", &NamespaceSelection::All);
        assert_eq!(all["title"], TranslationValue::from("dialog"));

        let page_on_top = store.merged("en", &NamespaceSelection::All.extended(["page"]));
        assert_eq!(page_on_top["title"], TranslationValue::from("page"));
        assert_eq!(page_on_top["dialog_only"], TranslationValue::from("d"));
        assert_eq!(page_on_top["page_only"], TranslationValue::from("p"));
    }
}
