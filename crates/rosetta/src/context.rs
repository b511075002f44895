//! A process-wide [`I18n`] for code that cannot thread one through.

use crate::Error;
use parking_lot::RwLock;
use rosetta_core::Params;
use rosetta_manager::I18n;

static CONTEXT: RwLock<Option<I18n>> = RwLock::new(None);

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ContextError {
    #[error("The global i18n context is already set")]
    AlreadySet,
    #[error("The global i18n context is not set")]
    NotSet,
}

/// Installs the global context. Fails if one is already installed.
pub fn set_context(i18n: I18n) -> Result<(), ContextError> {
    let mut context = CONTEXT.write();
    if context.is_some() {
        return Err(ContextError::AlreadySet);
    }

    tracing::debug!(locale = %i18n.locale(), "Installed global i18n context");
    *context = Some(i18n);
    Ok(())
}

pub fn context() -> Result<I18n, ContextError> {
    CONTEXT.read().clone().ok_or(ContextError::NotSet)
}

/// Removes the global context, returning it.
pub fn clear_context() -> Option<I18n> {
    CONTEXT.write().take()
}

pub fn translate(key: &str) -> Result<String, Error> {
    Ok(context()?.translate(key)?)
}

pub fn translate_with(key: &str, params: &Params) -> Result<String, Error> {
    Ok(context()?.translate_with(key, params)?)
}

pub fn set_locale(tag: &str) -> Result<(), Error> {
    Ok(context()?.set_locale(tag)?)
}

pub fn locale() -> Result<String, ContextError> {
    context().map(|i18n| i18n.locale())
}

