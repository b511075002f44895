#![doc = include_str!("../README.md")]

pub mod context;

use std::path::Path;
use std::sync::Arc;

pub use context::{ContextError, clear_context, set_context};
pub use rosetta_core::{
    CollisionPolicy, DEFAULT_NAMESPACE, Lookup, NamespaceSelection, Params, PluralCategory,
    PluralForms, PluralRuleType, RegistryError, StaticTranslationModule, TranslateError,
    TranslationModule, TranslationStore, TranslationValue, Translations, interpolate, params,
    plural_category, resolve,
};
pub use rosetta_lang::{
    DateEndianness, DateFormat, FormatError, NumberFormat, NumberFormatOptions, ParseNumberOptions,
    TextDirection, TimeFormat, TimeFormatOptions, TimePrecision, closest_supported_language_tag,
    format_date, format_number, format_time, negotiate_locale, parse_number,
    system_preferred_locales, text_direction,
};
pub use rosetta_manager::{
    ConfigError, I18n, I18nOptions, LocaleOptions, LocaleSnapshot, LocaleState, Subscription,
    Translator,
};
pub use rosetta_toml::{I18nConfig, I18nConfigError};

#[doc(hidden)]
pub use rosetta_core::__inventory;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] I18nConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Locale(#[from] ConfigError),
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Builds an [`I18n`] from `config`.
///
/// Registers every [`translation_module!`] payload, then the JSON files under
/// the assets directory of `base_dir` (or `CARGO_MANIFEST_DIR`) if it exists.
/// Without `supported_locales` in the configuration, every locale with
/// registered translations is supported. `preferred_locales` of `None` reads
/// the operating system preferences.
pub fn init(
    config: &I18nConfig,
    base_dir: Option<&Path>,
    preferred_locales: Option<Vec<String>>,
) -> Result<I18n, Error> {
    config.validate()?;

    let store = config.create_store();
    let modules = store.add_discovered_modules()?;

    let assets_dir = config.assets_dir_from_base(base_dir)?;
    let files = if assets_dir.is_dir() {
        config.load_translations(&store, base_dir)?
    } else {
        tracing::debug!(assets = %assets_dir.display(), "No translation assets directory");
        0
    };

    let supported_locales = match &config.supported_locales {
        Some(locales) => locales.clone(),
        None => store.supported_locales(),
    };

    tracing::info!(modules, files, supported = ?supported_locales, "Initialized translations");

    let locale = LocaleState::new(
        LocaleOptions::builder()
            .supported_locales(supported_locales)
            .maybe_default_locale(config.default_locale.clone())
            .maybe_preferred_locales(preferred_locales)
            .build(),
    )?;

    let i18n = I18n::new(
        Arc::new(store),
        locale,
        I18nOptions::builder()
            .fallback_locales(config.fallback_locales.clone())
            .maybe_key_separator(config.key_separator.clone())
            .freeze_registry(config.freeze_registry)
            .build(),
    )?;

    Ok(i18n)
}

/// Embeds a JSON translation payload, registered by [`init`] and
/// [`TranslationStore::add_discovered_modules`].
///
/// ```ignore
/// rosetta::translation_module! {
///     name: "home-fr",
///     locale: "fr",
///     namespace: "home",
///     payload: include_str!("../i18n/fr/home.json"),
/// }
/// ```
#[macro_export]
macro_rules! translation_module {
    (
        name: $name:expr,
        locale: $locale:expr,
        namespace: $namespace:expr,
        payload: $payload:expr $(,)?
    ) => {
        $crate::translation_module!(@submit $name, $locale, ::core::option::Option::Some($namespace), $payload);
    };
    (
        name: $name:expr,
        locale: $locale:expr,
        payload: $payload:expr $(,)?
    ) => {
        $crate::translation_module!(@submit $name, $locale, ::core::option::Option::None, $payload);
    };
    (@submit $name:expr, $locale:expr, $namespace:expr, $payload:expr) => {
        const _: () = {
            static MODULE: $crate::StaticTranslationModule =
                $crate::StaticTranslationModule::new($name, $locale, $namespace, $payload);

            $crate::__inventory::submit! {
                &MODULE as &dyn $crate::TranslationModule
            }
        };
    };
}
