use fixed_decimal::Decimal;
use icu_locale_core::{Locale, locale};
use icu_plurals::{PluralOperands, PluralRules};
use serde_json::Number;

/// A CLDR plural category.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl From<icu_plurals::PluralCategory> for PluralCategory {
    fn from(category: icu_plurals::PluralCategory) -> Self {
        #[allow(unreachable_patterns)]
        match category {
            icu_plurals::PluralCategory::Zero => Self::Zero,
            icu_plurals::PluralCategory::One => Self::One,
            icu_plurals::PluralCategory::Two => Self::Two,
            icu_plurals::PluralCategory::Few => Self::Few,
            icu_plurals::PluralCategory::Many => Self::Many,
            icu_plurals::PluralCategory::Other => Self::Other,
            _ => Self::Other,
        }
    }
}

/// Which set of plural rules to apply.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PluralRuleType {
    /// Quantities: "1 message", "5 messages".
    Cardinal,
    /// Ranks: "1st", "2nd".
    Ordinal,
}

/// Selects the plural category of `number` in `locale`.
///
/// Negative numbers select like their absolute value. Tags the plural data
/// does not know fall back to the root rules, where everything is
/// [`PluralCategory::Other`].
pub fn plural_category(locale: &str, rule_type: PluralRuleType, number: &Number) -> PluralCategory {
    let Some(operands) = operands(number) else {
        tracing::warn!(%number, "Number cannot be used for plural selection");
        return PluralCategory::Other;
    };

    let locale = locale.parse::<Locale>().unwrap_or_else(|error| {
        tracing::debug!(locale, %error, "Unparsable locale, using root plural rules");
        locale!("und")
    });

    let rules = match rule_type {
        PluralRuleType::Cardinal => PluralRules::try_new_cardinal((&locale).into()),
        PluralRuleType::Ordinal => PluralRules::try_new_ordinal((&locale).into()),
    };

    match rules {
        Ok(rules) => rules.category_for(operands).into(),
        Err(error) => {
            tracing::warn!(%locale, %error, "Missing plural rules");
            PluralCategory::Other
        },
    }
}

fn operands(number: &Number) -> Option<PluralOperands> {
    if let Some(value) = number.as_u64() {
        return Some(value.into());
    }
    if let Some(value) = number.as_i64() {
        return Some(value.unsigned_abs().into());
    }

    let value = number.as_f64()?.abs();
    if value.fract() == 0.0 && value <= u64::MAX as f64 {
        return Some((value as u64).into());
    }
    let decimal = Decimal::try_from_str(&value.to_string()).ok()?;
    Some(PluralOperands::from(&decimal))
}
