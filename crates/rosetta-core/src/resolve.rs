//! Key lookup through the locale fallback chain.

use crate::Params;
use crate::error::TranslateError;
use crate::interpolate::{interpolate, json_type_name, unused_parameters};
use crate::plural::{PluralCategory, PluralRuleType, plural_category};
use crate::store::{NamespaceSelection, TranslationStore};
use crate::value::{PluralForms, TranslationValue, Translations};
use serde_json::Value;

/// Parameters selecting a cardinal plural form.
pub const CARDINAL_PARAMETERS: [&str; 2] = ["count", "cardinal"];
/// Parameter selecting an ordinal plural form.
pub const ORDINAL_PARAMETER: &str = "ordinal";

/// Where a key is looked up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Lookup<'a> {
    /// The current locale. Plural categories are always selected for it.
    pub locale: &'a str,
    pub namespaces: &'a NamespaceSelection,
    /// Tried in order after the current locale and its primary subtag.
    pub fallback_locales: &'a [String],
    /// Splits keys into paths through nested key trees. `None` or an empty
    /// separator looks keys up as a whole.
    pub key_separator: Option<&'a str>,
}

impl<'a> Lookup<'a> {
    pub fn new(locale: &'a str, namespaces: &'a NamespaceSelection) -> Self {
        Self {
            locale,
            namespaces,
            fallback_locales: &[],
            key_separator: None,
        }
    }

    pub fn with_fallback_locales(self, fallback_locales: &'a [String]) -> Self {
        Self {
            fallback_locales,
            ..self
        }
    }

    pub fn with_key_separator(self, key_separator: Option<&'a str>) -> Self {
        Self {
            key_separator,
            ..self
        }
    }

    /// The current locale, its primary-subtag locale when registered, then the
    /// fallback locales, without duplicates.
    pub fn candidate_locales(&self, store: &TranslationStore) -> Vec<&'a str> {
        let mut locales = vec![self.locale];

        if let Some(primary) = rosetta_lang::derived_fallback(self.locale)
            && store.has_locale(primary)
        {
            locales.push(primary);
        }

        for fallback in self.fallback_locales {
            if !locales.contains(&fallback.as_str()) {
                locales.push(fallback);
            }
        }

        locales
    }

    fn segments<'k>(&self, key: &'k str) -> Vec<&'k str> {
        match self.key_separator {
            Some(separator) if !separator.is_empty() => key.split(separator).collect(),
            _ => vec![key],
        }
    }
}

/// A value reached while walking a key path.
#[derive(Clone, Copy)]
enum Node<'a> {
    Text(&'a str),
    Plural(&'a PluralForms),
    Nested(&'a Translations),
}

impl<'a> From<&'a TranslationValue> for Node<'a> {
    fn from(value: &'a TranslationValue) -> Self {
        match value {
            TranslationValue::Text(text) => Self::Text(text),
            TranslationValue::Plural(forms) => Self::Plural(forms),
            TranslationValue::Nested(tree) => Self::Nested(tree),
        }
    }
}

impl<'a> Node<'a> {
    fn child(self, segment: &str) -> Option<Self> {
        match self {
            Self::Nested(tree) => tree.get(segment).map(Node::from),
            Self::Plural(forms) => segment
                .parse::<PluralCategory>()
                .ok()
                .and_then(|category| forms.get(category))
                .map(Node::Text),
            Self::Text(_) => None,
        }
    }
}

/// Resolves `key` to its final text.
///
/// The first candidate locale whose merged dictionary holds the first key
/// segment is used for the whole path. Plural maps select their form with
/// the `count`, `cardinal` or `ordinal` parameter, then every `{{ path }}`
/// placeholder is filled from `params`. Every supplied parameter has to be
/// used.
pub fn resolve(
    store: &TranslationStore,
    lookup: &Lookup<'_>,
    key: &str,
    params: Option<&Params>,
) -> Result<String, TranslateError> {
    let no_params = Params::new();
    let params = params.unwrap_or(&no_params);
    let not_found = || TranslateError::NotFound {
        key: key.to_owned(),
    };

    let segments = lookup.segments(key);
    let (first, rest) = segments.split_first().ok_or_else(not_found)?;

    let dictionary = lookup
        .candidate_locales(store)
        .into_iter()
        .map(|locale| store.merged(locale, lookup.namespaces))
        .find(|dictionary| dictionary.contains_key(*first))
        .ok_or_else(not_found)?;

    let mut node = dictionary.get(*first).map(Node::from).ok_or_else(not_found)?;
    for segment in rest {
        node = node.child(segment).ok_or_else(not_found)?;
    }

    let (template, is_plural) = match node {
        Node::Text(text) => (text, false),
        Node::Plural(forms) => {
            let category = select_plural(lookup.locale, params)?;
            let text = forms
                .get(category)
                .ok_or_else(|| TranslateError::PluralFormNotFound {
                    key: key.to_owned(),
                    category,
                })?;
            (text, true)
        },
        Node::Nested(tree) => {
            return Err(TranslateError::Validation {
                key: key.to_owned(),
                keys: invalid_plural_keys(tree),
            });
        },
    };

    let mut interpolated = interpolate(template, params)?;
    if is_plural {
        // Null plural parameters are consumed too.
        for name in plural_parameters() {
            if let Some(value) = params.get(name) {
                interpolated.used.insert(name.to_owned(), value.clone());
            }
        }
    }

    let unused = unused_parameters(params, &interpolated.used);
    if !unused.is_empty() {
        return Err(TranslateError::TooManyParameters {
            params: Value::Object(params.clone()),
            unused,
        });
    }

    Ok(interpolated.text)
}

fn plural_parameters() -> impl Iterator<Item = &'static str> {
    CARDINAL_PARAMETERS.into_iter().chain([ORDINAL_PARAMETER])
}

fn select_plural(locale: &str, params: &Params) -> Result<PluralCategory, TranslateError> {
    let supplied: Vec<(&'static str, &Value)> = plural_parameters()
        .filter_map(|name| {
            params
                .get(name)
                .filter(|value| !value.is_null())
                .map(|value| (name, value))
        })
        .collect();

    match supplied.as_slice() {
        [] => Err(TranslateError::MissingParameter {
            path: CARDINAL_PARAMETERS[0].to_owned(),
        }),
        [(name, value)] => {
            let Value::Number(number) = value else {
                return Err(TranslateError::InvalidParameterType {
                    path: (*name).to_owned(),
                    found: json_type_name(value),
                });
            };

            let rule_type = if *name == ORDINAL_PARAMETER {
                PluralRuleType::Ordinal
            } else {
                PluralRuleType::Cardinal
            };

            Ok(plural_category(locale, rule_type, number))
        },
        _ => Err(TranslateError::ConflictingParameters {
            names: supplied.iter().map(|(name, _)| (*name).to_owned()).collect(),
        }),
    }
}

/// Keys that keep a key tree from being a plural map.
fn invalid_plural_keys(tree: &Translations) -> Vec<String> {
    let invalid: Vec<String> = tree
        .iter()
        .filter(|(key, value)| {
            key.parse::<PluralCategory>().is_err() || value.as_text().is_none()
        })
        .map(|(key, _)| key.clone())
        .collect();

    if invalid.is_empty() {
        tree.keys().cloned().collect()
    } else {
        invalid
    }
}
