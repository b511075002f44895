//! The translation value model.
//!
//! A JSON payload decodes into [`Translations`]: a string becomes
//! [`TranslationValue::Text`], an object made only of plural categories with
//! string forms becomes [`TranslationValue::Plural`], and any other object
//! becomes a [`TranslationValue::Nested`] key tree.

use crate::plural::PluralCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A key to value tree, in insertion order.
pub type Translations = IndexMap<String, TranslationValue>;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranslationValue {
    Text(String),
    Plural(PluralForms),
    Nested(Translations),
}

impl TranslationValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for TranslationValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for TranslationValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<PluralForms> for TranslationValue {
    fn from(forms: PluralForms) -> Self {
        Self::Plural(forms)
    }
}

impl From<Translations> for TranslationValue {
    fn from(tree: Translations) -> Self {
        Self::Nested(tree)
    }
}

/// The CLDR plural forms of one message.
///
/// At least one form is present once decoded from a payload.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "RawPluralForms")]
pub struct PluralForms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub few: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub many: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

impl PluralForms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the form for `category`.
    pub fn with(mut self, category: PluralCategory, text: impl Into<String>) -> Self {
        *self.slot(category) = Some(text.into());
        self
    }

    pub fn get(&self, category: PluralCategory) -> Option<&str> {
        match category {
            PluralCategory::Zero => self.zero.as_deref(),
            PluralCategory::One => self.one.as_deref(),
            PluralCategory::Two => self.two.as_deref(),
            PluralCategory::Few => self.few.as_deref(),
            PluralCategory::Many => self.many.as_deref(),
            PluralCategory::Other => self.other.as_deref(),
        }
    }

    fn slot(&mut self, category: PluralCategory) -> &mut Option<String> {
        match category {
            PluralCategory::Zero => &mut self.zero,
            PluralCategory::One => &mut self.one,
            PluralCategory::Two => &mut self.two,
            PluralCategory::Few => &mut self.few,
            PluralCategory::Many => &mut self.many,
            PluralCategory::Other => &mut self.other,
        }
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.zero,
            &self.one,
            &self.two,
            &self.few,
            &self.many,
            &self.other,
        ]
        .iter()
        .all(|form| form.is_none())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPluralForms {
    zero: Option<String>,
    one: Option<String>,
    two: Option<String>,
    few: Option<String>,
    many: Option<String>,
    other: Option<String>,
}

impl TryFrom<RawPluralForms> for PluralForms {
    type Error = &'static str;

    fn try_from(raw: RawPluralForms) -> Result<Self, Self::Error> {
        let forms = Self {
            zero: raw.zero,
            one: raw.one,
            two: raw.two,
            few: raw.few,
            many: raw.many,
            other: raw.other,
        };

        if forms.is_empty() {
            Err("plural map without any form")
        } else {
            Ok(forms)
        }
    }
}
