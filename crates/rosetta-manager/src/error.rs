use thiserror::Error;

/// Setup and locale selection mistakes, raised eagerly.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("At least one supported locale is required")]
    NoSupportedLocales,
    #[error("Default locale '{0}' is not one of the supported locales")]
    UnsupportedDefaultLocale(String),
    #[error("Initial locale '{0}' is not one of the supported locales")]
    UnsupportedInitialLocale(String),
    #[error("Locale '{0}' is not one of the supported locales")]
    UnsupportedLocale(String),
    #[error("Fallback locale '{0}' has no registered translations")]
    UnsupportedFallbackLocale(String),
}
