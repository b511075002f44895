#![doc = include_str!("../README.md")]

use fs_err as fs;
use rosetta_core::{CollisionPolicy, RegistryError, TranslationStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, io};
use thiserror::Error;
use unic_langid::{LanguageIdentifier, LanguageIdentifierError};

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "i18n.toml";

/// File stem of the payload holding the default namespace.
pub const DEFAULT_NAMESPACE_FILE: &str = "default";

const PAYLOAD_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum I18nConfigError {
    /// Configuration file not found.
    #[error("i18n.toml configuration file not found")]
    NotFound,
    /// Failed to read configuration or translation files.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] io::Error),
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A locale in the configuration or the assets directory is not a valid tag.
    #[error("Invalid language identifier '{name}'")]
    InvalidLanguageIdentifier {
        name: String,
        #[source]
        source: LanguageIdentifierError,
    },
    /// A locale parses but is not written in canonical form.
    #[error("Language identifier '{name}' is not supported: {reason}")]
    UnsupportedLanguageIdentifier { name: String, reason: String },
    #[error("supported_locales must not be empty")]
    NoSupportedLocales,
    #[error("Default locale '{name}' is not listed in supported_locales")]
    UnsupportedDefaultLocale { name: String },
    #[error("Fallback locale '{name}' is not listed in supported_locales")]
    UnsupportedFallbackLocale { name: String },
    /// A translation file could not be registered.
    #[error("Failed to load '{}': {source}", .path.display())]
    Translations {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },
}

/// The configuration for rosetta.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct I18nConfig {
    /// Locales the application can switch to. When absent, every locale
    /// directory under `assets_dir` is supported.
    #[serde(default)]
    pub supported_locales: Option<Vec<String>>,
    #[serde(default)]
    pub default_locale: Option<String>,
    #[serde(default)]
    pub fallback_locales: Vec<String>,
    /// Separator for nested keys, e.g. `"."`.
    #[serde(default)]
    pub key_separator: Option<String>,
    #[serde(default)]
    pub collision: CollisionPolicy,
    #[serde(default)]
    pub freeze_registry: bool,
    /// Path to the assets directory containing translation files.
    /// Expected structure: {assets_dir}/{locale}/{namespace}.json
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("i18n")
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            supported_locales: None,
            default_locale: None,
            fallback_locales: Vec::new(),
            key_separator: None,
            collision: CollisionPolicy::default(),
            freeze_registry: false,
            assets_dir: default_assets_dir(),
        }
    }
}

impl I18nConfig {
    /// Reads the configuration from a path.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, I18nConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(I18nConfigError::NotFound);
        }

        let content = fs::read_to_string(path)?;
        let config: I18nConfig = toml::from_str(&content)?;

        tracing::debug!(path = %path.display(), "Read i18n configuration");
        Ok(config)
    }

    /// Reads the configuration from the manifest directory.
    pub fn read_from_manifest_dir() -> Result<Self, I18nConfigError> {
        Self::from_manifest_dir(&manifest_dir()?)
    }

    /// Reads `i18n.toml` from `manifest_dir`.
    pub fn from_manifest_dir(manifest_dir: &Path) -> Result<Self, I18nConfigError> {
        Self::read_from_path(manifest_dir.join(CONFIG_FILE_NAME))
    }

    /// Returns the path to the assets directory from a base directory.
    /// If `base_dir` is `None`, uses `CARGO_MANIFEST_DIR` environment variable.
    pub fn assets_dir_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<PathBuf, I18nConfigError> {
        let base = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => manifest_dir()?,
        };

        Ok(base.join(&self.assets_dir))
    }

    /// Returns the locale directories under the assets directory, sorted.
    pub fn available_locales_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<Vec<String>, I18nConfigError> {
        let assets_path = self.assets_dir_from_base(base_dir)?;

        let mut locales = Vec::new();
        for entry in fs::read_dir(&assets_path)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let name = utf8_file_name(&entry.path())?;
            validate_language_tag(&name)?;
            locales.push(name);
        }

        locales.sort();
        locales.dedup();
        Ok(locales)
    }

    /// The configured supported locales, or the available ones when none are
    /// configured.
    pub fn supported_locales_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<Vec<String>, I18nConfigError> {
        match &self.supported_locales {
            Some(locales) => Ok(locales.clone()),
            None => self.available_locales_from_base(base_dir),
        }
    }

    /// Checks every configured locale tag and that the default and fallback
    /// locales are supported.
    pub fn validate(&self) -> Result<(), I18nConfigError> {
        let configured = self
            .supported_locales
            .iter()
            .flatten()
            .chain(&self.default_locale)
            .chain(&self.fallback_locales);
        for tag in configured {
            validate_language_tag(tag)?;
        }

        let Some(supported) = &self.supported_locales else {
            return Ok(());
        };

        if supported.is_empty() {
            return Err(I18nConfigError::NoSupportedLocales);
        }

        if let Some(default) = &self.default_locale
            && !supported.contains(default)
        {
            return Err(I18nConfigError::UnsupportedDefaultLocale {
                name: default.clone(),
            });
        }

        if let Some(fallback) = self
            .fallback_locales
            .iter()
            .find(|fallback| !supported.contains(fallback))
        {
            return Err(I18nConfigError::UnsupportedFallbackLocale {
                name: fallback.clone(),
            });
        }

        Ok(())
    }

    /// An empty store using the configured collision policy.
    pub fn create_store(&self) -> TranslationStore {
        TranslationStore::with_collision_policy(self.collision)
    }

    /// Registers every `{locale}/{namespace}.json` file under the assets
    /// directory and returns how many files were loaded.
    ///
    /// Locale directories missing from `supported_locales` are skipped when
    /// the list is configured.
    pub fn load_translations(
        &self,
        store: &TranslationStore,
        base_dir: Option<&Path>,
    ) -> Result<usize, I18nConfigError> {
        let assets_path = self.assets_dir_from_base(base_dir)?;
        let mut loaded = 0;

        for locale in self.available_locales_from_base(base_dir)? {
            if let Some(supported) = &self.supported_locales
                && !supported.contains(&locale)
            {
                tracing::debug!(locale = %locale, "Skipping unsupported locale directory");
                continue;
            }

            for path in payload_files(&assets_path.join(&locale))? {
                let stem = file_stem(&path)?;
                let namespace = (stem != DEFAULT_NAMESPACE_FILE).then_some(stem.as_str());

                let payload = fs::read_to_string(&path)?;
                store
                    .add_json(&locale, namespace, &payload)
                    .map_err(|source| I18nConfigError::Translations {
                        path: path.clone(),
                        source,
                    })?;

                tracing::debug!(locale = %locale, path = %path.display(), "Loaded translations");
                loaded += 1;
            }
        }

        tracing::info!(loaded, assets = %assets_path.display(), "Loaded translation files");
        Ok(loaded)
    }
}

fn manifest_dir() -> Result<PathBuf, I18nConfigError> {
    env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .map_err(|_| I18nConfigError::NotFound)
}

/// Sorted `*.json` files of a locale directory.
fn payload_files(locale_dir: &Path) -> Result<Vec<PathBuf>, I18nConfigError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(locale_dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file()
            && path.extension().is_some_and(|extension| extension == PAYLOAD_EXTENSION)
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn utf8_file_name(path: &Path) -> Result<String, I18nConfigError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| non_utf8(path))
}

fn file_stem(path: &Path) -> Result<String, I18nConfigError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
        .ok_or_else(|| non_utf8(path))
}

fn non_utf8(path: &Path) -> I18nConfigError {
    I18nConfigError::ReadError(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Assets directory contains a non UTF-8 entry: {}", path.display()),
    ))
}

/// Locale tags must parse and already be in canonical form, since they are
/// matched as plain strings.
fn validate_language_tag(tag: &str) -> Result<(), I18nConfigError> {
    let lang = tag.parse::<LanguageIdentifier>().map_err(|source| {
        I18nConfigError::InvalidLanguageIdentifier {
            name: tag.to_owned(),
            source,
        }
    })?;

    let canonical = lang.to_string();
    if canonical != tag {
        return Err(I18nConfigError::UnsupportedLanguageIdentifier {
            name: tag.to_owned(),
            reason: format!("use the canonical form '{canonical}'"),
        });
    }

    Ok(())
}
