//! The current locale, as observable state.

use crate::error::ConfigError;
use arc_swap::ArcSwap;
use bon::Builder;
use parking_lot::Mutex;
use jiff::civil::{Date, Time};
use rosetta_lang::{
    DateFormat, FormatError, NumberFormat, NumberFormatOptions, ParseNumberOptions, TextDirection,
    TimeFormat, TimeFormatOptions, format_date, format_number, format_time, negotiate_locale,
    parse_number, system_preferred_locales, text_direction,
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

#[derive(Builder, Clone, Debug, Default, Eq, PartialEq)]
pub struct LocaleOptions {
    /// Locales the application can switch to. Must not be empty.
    pub supported_locales: Vec<String>,
    /// Used when no preferred locale is supported. Must be supported.
    #[builder(into)]
    pub default_locale: Option<String>,
    /// The user's locales, most preferred first. `None` reads the operating
    /// system preferences.
    pub preferred_locales: Option<Vec<String>>,
    /// Skips negotiation. Must be supported.
    #[builder(into)]
    pub initial_locale: Option<String>,
    #[builder(default)]
    pub number_format: NumberFormat,
    #[builder(default)]
    pub date_format: DateFormat,
    #[builder(default)]
    pub time_format: TimeFormat,
}

/// The current locale, its layout direction and formatting preferences.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LocaleSnapshot {
    pub language_tag: String,
    pub text_direction: TextDirection,
    pub number_format: NumberFormat,
    pub date_format: DateFormat,
    pub time_format: TimeFormat,
}

impl LocaleSnapshot {
    /// A snapshot of `language_tag` with the default formats.
    pub fn new(language_tag: impl Into<String>) -> Self {
        let language_tag = language_tag.into();
        let text_direction = text_direction(&language_tag);
        Self {
            language_tag,
            text_direction,
            number_format: NumberFormat::default(),
            date_format: DateFormat::default(),
            time_format: TimeFormat::default(),
        }
    }

    fn with_language_tag(&self, language_tag: &str) -> Self {
        Self {
            language_tag: language_tag.to_owned(),
            text_direction: text_direction(language_tag),
            ..self.clone()
        }
    }
}

type Listener = Arc<dyn Fn(&LocaleSnapshot) + Send + Sync>;

struct Inner {
    supported_locales: Vec<String>,
    default_locale: Option<String>,
    current: ArcSwap<LocaleSnapshot>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
}

/// Shared handle to the current locale.
///
/// Clones observe and update the same state. Updates replace the whole
/// [`LocaleSnapshot`] at once and notify every subscriber synchronously, once
/// per actual change.
#[derive(Clone)]
pub struct LocaleState {
    inner: Arc<Inner>,
}

impl LocaleState {
    pub fn new(options: LocaleOptions) -> Result<Self, ConfigError> {
        let LocaleOptions {
            supported_locales,
            default_locale,
            preferred_locales,
            initial_locale,
            number_format,
            date_format,
            time_format,
        } = options;

        if supported_locales.is_empty() {
            return Err(ConfigError::NoSupportedLocales);
        }

        if let Some(default) = &default_locale
            && !supported_locales.contains(default)
        {
            return Err(ConfigError::UnsupportedDefaultLocale(default.clone()));
        }

        let initial = match initial_locale {
            Some(initial) if supported_locales.contains(&initial) => initial,
            Some(initial) => return Err(ConfigError::UnsupportedInitialLocale(initial)),
            None => {
                let preferred_locales = preferred_locales.unwrap_or_else(system_preferred_locales);
                let negotiated = negotiate_locale(
                    &preferred_locales,
                    default_locale.as_deref(),
                    &supported_locales,
                )
                .ok_or(ConfigError::NoSupportedLocales)?
                .to_owned();

                tracing::info!(
                    locale = %negotiated,
                    preferred = ?preferred_locales,
                    "Selected initial locale"
                );
                negotiated
            },
        };

        let snapshot = LocaleSnapshot {
            number_format,
            date_format,
            time_format,
            ..LocaleSnapshot::new(initial)
        };

        Ok(Self {
            inner: Arc::new(Inner {
                supported_locales,
                default_locale,
                current: ArcSwap::from_pointee(snapshot),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        })
    }

    pub fn supported_locales(&self) -> &[String] {
        &self.inner.supported_locales
    }

    pub fn default_locale(&self) -> Option<&str> {
        self.inner.default_locale.as_deref()
    }

    pub fn is_supported(&self, tag: &str) -> bool {
        self.inner.supported_locales.iter().any(|supported| supported == tag)
    }

    /// The current state. It never changes once loaded.
    pub fn snapshot(&self) -> Arc<LocaleSnapshot> {
        self.inner.current.load_full()
    }

    pub fn language_tag(&self) -> String {
        self.inner.current.load().language_tag.clone()
    }

    pub fn text_direction(&self) -> TextDirection {
        self.inner.current.load().text_direction
    }

    pub fn number_format(&self) -> NumberFormat {
        self.inner.current.load().number_format
    }

    pub fn date_format(&self) -> DateFormat {
        self.inner.current.load().date_format
    }

    pub fn time_format(&self) -> TimeFormat {
        self.inner.current.load().time_format
    }

    /// Switches to `tag`, which must be supported.
    ///
    /// Setting the current locale again does not notify subscribers.
    pub fn set_locale(&self, tag: &str) -> Result<(), ConfigError> {
        if !self.is_supported(tag) {
            return Err(ConfigError::UnsupportedLocale(tag.to_owned()));
        }

        if let Some((previous, next)) = self.modify(|current| current.with_language_tag(tag)) {
            tracing::info!(
                from = %previous.language_tag,
                to = %next.language_tag,
                "Locale changed"
            );
        }

        Ok(())
    }

    pub fn set_number_format(&self, number_format: NumberFormat) {
        self.modify(|current| LocaleSnapshot {
            number_format,
            ..current.clone()
        });
    }

    pub fn set_date_format(&self, date_format: DateFormat) {
        self.modify(|current| LocaleSnapshot {
            date_format,
            ..current.clone()
        });
    }

    pub fn set_time_format(&self, time_format: TimeFormat) {
        self.modify(|current| LocaleSnapshot {
            time_format,
            ..current.clone()
        });
    }

    /// Formats `value` with the current number format.
    pub fn format_number(
        &self,
        value: f64,
        options: NumberFormatOptions,
    ) -> Result<String, FormatError> {
        format_number(value, self.number_format(), options)
    }

    /// Parses a number written in the current number format.
    pub fn parse_number(&self, input: &str, options: ParseNumberOptions) -> Result<f64, FormatError> {
        parse_number(input, self.number_format(), options)
    }

    pub fn format_date(&self, date: impl Into<Date>) -> String {
        format_date(date, self.date_format())
    }

    pub fn format_time(&self, time: impl Into<Time>, options: TimeFormatOptions) -> String {
        format_time(time, self.time_format(), options)
    }

    /// Computes the next locale from the current one.
    pub fn update<F>(&self, next: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&str) -> String,
    {
        let current = self.snapshot();
        self.set_locale(&next(&current.language_tag))
    }

    /// Calls `listener` after every locale change until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&LocaleSnapshot) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(listener)));

        Subscription {
            id,
            state: Arc::downgrade(&self.inner),
        }
    }

    /// Replaces the snapshot and notifies subscribers when it changed.
    fn modify<F>(&self, change: F) -> Option<(Arc<LocaleSnapshot>, Arc<LocaleSnapshot>)>
    where
        F: Fn(&LocaleSnapshot) -> LocaleSnapshot,
    {
        let mut next = None;
        let previous = self.inner.current.rcu(|current| {
            let changed = change(&**current);
            let snapshot = if changed == **current {
                Arc::clone(current)
            } else {
                Arc::new(changed)
            };
            next = Some(Arc::clone(&snapshot));
            snapshot
        });

        let next = next?;
        if Arc::ptr_eq(&previous, &next) {
            return None;
        }

        self.notify(&next);
        Some((previous, next))
    }

    fn notify(&self, snapshot: &LocaleSnapshot) {
        // Listeners may subscribe or change the locale themselves.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl fmt::Debug for LocaleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleState")
            .field("current", &*self.inner.current.load())
            .field("supported_locales", &self.inner.supported_locales)
            .field("default_locale", &self.inner.default_locale)
            .finish_non_exhaustive()
    }
}

/// Keeps a [`LocaleState::subscribe`] listener registered.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    state: Weak<Inner>,
}

impl Subscription {
    /// Keeps the listener registered for the lifetime of the state.
    pub fn detach(mut self) {
        self.state = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.state.upgrade() {
            inner.listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
