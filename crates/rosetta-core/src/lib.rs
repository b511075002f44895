#![doc = include_str!("../README.md")]

pub mod error;
pub mod interpolate;
pub mod module;
pub mod plural;
pub mod resolve;
pub mod store;
pub mod value;

pub use error::{RegistryError, TranslateError};
pub use interpolate::{Interpolated, interpolate};
pub use module::{StaticTranslationModule, TranslationModule, discovered_modules};
pub use plural::{PluralCategory, PluralRuleType, plural_category};
pub use resolve::{Lookup, resolve};
pub use store::{CollisionPolicy, DEFAULT_NAMESPACE, NamespaceSelection, TranslationStore};
pub use value::{PluralForms, TranslationValue, Translations};

#[doc(hidden)]
pub use inventory as __inventory;

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Interpolation parameters, a JSON object.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Builds [`Params`] with `serde_json::json!` object syntax.
///
/// ```
/// let params = rosetta_core::params! { "name": "John", "user": { "age": 25 } };
/// assert_eq!(params["name"], "John");
/// ```
#[macro_export]
macro_rules! params {
    ($($body:tt)*) => {
        $crate::__params_from_value($crate::__serde_json::json!({ $($body)* }))
    };
}

#[doc(hidden)]
pub fn __params_from_value(value: serde_json::Value) -> Params {
    match value {
        serde_json::Value::Object(params) => params,
        _ => Params::new(),
    }
}
