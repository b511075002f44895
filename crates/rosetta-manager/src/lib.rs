#![doc = include_str!("../README.md")]

pub mod error;
pub mod i18n;
pub mod locale;

pub use error::ConfigError;
pub use i18n::{I18n, I18nOptions, Translator};
pub use locale::{LocaleOptions, LocaleSnapshot, LocaleState, Subscription};
