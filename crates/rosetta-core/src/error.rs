use crate::plural::PluralCategory;
use thiserror::Error;

/// Errors raised while populating a [`crate::TranslationStore`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Keys already registered in the same locale and namespace with a different value.
    #[error(
        "Translation keys {keys:?} are already registered for locale '{locale}' in namespace '{namespace}'"
    )]
    Collision {
        locale: String,
        namespace: String,
        keys: Vec<String>,
    },
    /// The store no longer accepts translations.
    #[error("Cannot add translations for locale '{locale}': the translation registry is frozen")]
    Frozen { locale: String },
    /// A payload is not a valid translation tree.
    #[error("Invalid translation payload for locale '{locale}': {source}")]
    Payload {
        locale: String,
        source: serde_json::Error,
    },
}

/// Errors raised by a single translation call.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TranslateError {
    #[error("Translation '{key}' not found")]
    NotFound { key: String },
    /// The key resolves to a key tree instead of a message or plural map.
    #[error("Translation '{key}' is not a message or plural map, invalid keys: {keys:?}")]
    Validation { key: String, keys: Vec<String> },
    #[error("Missing parameter '{path}'")]
    MissingParameter { path: String },
    /// More than one plural parameter was supplied.
    #[error("Conflicting plural parameters {names:?}, supply only one")]
    ConflictingParameters { names: Vec<String> },
    #[error("Parameter '{path}' must be a string or a number, found {found}")]
    InvalidParameterType { path: String, found: &'static str },
    /// Supplied parameters the message never used.
    #[error("Too many parameters, unused {unused:?} in {params}")]
    TooManyParameters {
        params: serde_json::Value,
        unused: Vec<String>,
    },
    #[error("Translation '{key}' has no '{category}' plural form")]
    PluralFormNotFound {
        key: String,
        category: PluralCategory,
    },
}
