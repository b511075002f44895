use crate::error::RegistryError;
use crate::store::{CollisionPolicy, TranslationStore};

/// A translation payload embedded in the binary and registered at startup.
pub trait TranslationModule: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;
    fn locale(&self) -> &'static str;
    /// `None` targets the default namespace.
    fn namespace(&self) -> Option<&'static str>;
    /// JSON key tree.
    fn payload(&self) -> &'static str;
}

inventory::collect!(&'static dyn TranslationModule);

/// A [`TranslationModule`] built from constants, usually an `include_str!`
/// of a JSON file.
#[derive(Clone, Copy, Debug)]
pub struct StaticTranslationModule {
    name: &'static str,
    locale: &'static str,
    namespace: Option<&'static str>,
    payload: &'static str,
}

impl StaticTranslationModule {
    pub const fn new(
        name: &'static str,
        locale: &'static str,
        namespace: Option<&'static str>,
        payload: &'static str,
    ) -> Self {
        Self {
            name,
            locale,
            namespace,
            payload,
        }
    }
}

impl TranslationModule for StaticTranslationModule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn locale(&self) -> &'static str {
        self.locale
    }

    fn namespace(&self) -> Option<&'static str> {
        self.namespace
    }

    fn payload(&self) -> &'static str {
        self.payload
    }
}

/// Every submitted module, ordered by locale, namespace and name so that
/// registration does not depend on link order.
pub fn discovered_modules() -> Vec<&'static dyn TranslationModule> {
    let mut modules: Vec<&'static dyn TranslationModule> =
        inventory::iter::<&'static dyn TranslationModule>()
            .copied()
            .collect();
    modules.sort_by_key(|module| (module.locale(), module.namespace(), module.name()));
    modules
}

impl TranslationStore {
    /// Creates a store holding every discovered [`TranslationModule`].
    pub fn with_discovered_modules(
        collision_policy: CollisionPolicy,
    ) -> Result<Self, RegistryError> {
        let store = Self::with_collision_policy(collision_policy);
        store.add_discovered_modules()?;
        Ok(store)
    }

    /// Registers every discovered [`TranslationModule`] and returns how many
    /// were added.
    pub fn add_discovered_modules(&self) -> Result<usize, RegistryError> {
        let modules = discovered_modules();

        for module in &modules {
            tracing::info!(
                module = module.name(),
                locale = module.locale(),
                namespace = ?module.namespace(),
                "Loading translation module"
            );
            self.add_json(module.locale(), module.namespace(), module.payload())?;
        }

        Ok(modules.len())
    }
}
