//! Number, date and time formatting preferences.
//!
//! The preferences are independent of the language tag: a user may read
//! English with `1.000,01` numbers and day-first dates.

use icu::decimal::DecimalFormatter;
use icu::decimal::input::Decimal;
use icu::decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu::locale::{Locale, locale};
use jiff::civil::{Date, Time};
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FormatError {
    #[error("'{input}' is not a number in the {format} format")]
    InvalidNumber { input: String, format: NumberFormat },
    #[error("{value} cannot be formatted as a decimal number")]
    NonFiniteNumber { value: String },
    #[error("Missing number formatting data: {message}")]
    MissingData { message: String },
}

/// Thousands and decimal separators.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum NumberFormat {
    /// `1,000.01`
    #[default]
    CommaPeriod,
    /// `1.000,01`
    PeriodComma,
    /// `1 000,01`, grouped with a narrow no-break space.
    SpaceComma,
}

impl NumberFormat {
    pub fn decimal_separator(self) -> char {
        match self {
            Self::CommaPeriod => '.',
            Self::PeriodComma | Self::SpaceComma => ',',
        }
    }

    /// Separators accepted between digit groups when parsing.
    pub fn group_separators(self) -> &'static [char] {
        match self {
            Self::CommaPeriod => &[','],
            Self::PeriodComma => &['.'],
            Self::SpaceComma => &[' ', '\u{a0}', '\u{202f}'],
        }
    }

    fn formatting_locale(self) -> Locale {
        match self {
            Self::CommaPeriod => locale!("en-US"),
            Self::PeriodComma => locale!("de-DE"),
            Self::SpaceComma => locale!("fr-FR"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NumberFormatOptions {
    /// Separate thousands.
    pub use_grouping: bool,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self { use_grouping: true }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ParseNumberOptions {
    /// Accept group separators such as the `,` of `1,000.01`.
    pub allow_thousand_separator: bool,
    /// Round to this many fractional digits.
    pub precision: Option<u8>,
}

/// Formats `value` with the separators of `format`.
pub fn format_number(
    value: f64,
    format: NumberFormat,
    options: NumberFormatOptions,
) -> Result<String, FormatError> {
    if !value.is_finite() {
        return Err(FormatError::NonFiniteNumber {
            value: value.to_string(),
        });
    }

    let decimal = Decimal::try_from_str(&value.to_string()).map_err(|_| {
        FormatError::NonFiniteNumber {
            value: value.to_string(),
        }
    })?;

    let mut formatter_options = DecimalFormatterOptions::default();
    if !options.use_grouping {
        formatter_options.grouping_strategy = Some(GroupingStrategy::Never);
    }

    let formatter = DecimalFormatter::try_new((&format.formatting_locale()).into(), formatter_options)
        .map_err(|error| FormatError::MissingData {
            message: error.to_string(),
        })?;

    Ok(formatter.format_to_string(&decimal))
}

/// Parses a number written with the separators of `format`.
///
/// Group separators are rejected unless
/// [`ParseNumberOptions::allow_thousand_separator`] is set. The decimal
/// separator of another format is always rejected.
pub fn parse_number(
    input: &str,
    format: NumberFormat,
    options: ParseNumberOptions,
) -> Result<f64, FormatError> {
    let invalid = || FormatError::InvalidNumber {
        input: input.to_owned(),
        format,
    };

    let decimal_separator = format.decimal_separator();
    let mut normalized = String::with_capacity(input.len());

    for ch in input.trim().chars() {
        if ch == decimal_separator {
            normalized.push('.');
        } else if format.group_separators().contains(&ch) {
            if !options.allow_thousand_separator {
                return Err(invalid());
            }
        } else if matches!(ch, '.' | ',') || ch.is_whitespace() {
            return Err(invalid());
        } else {
            normalized.push(ch);
        }
    }

    let value: f64 = normalized.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }

    Ok(match options.precision {
        Some(precision) => {
            let factor = 10_f64.powi(i32::from(precision));
            (value * factor).round() / factor
        },
        None => value,
    })
}

/// Order of day, month and year.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum DateEndianness {
    /// `31/12/2000`
    LittleEndian,
    /// `12/31/2000`
    MiddleEndian,
    /// `2000-12-31`
    #[default]
    BigEndian,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct DateFormat {
    pub endianness: DateEndianness,
}

pub fn format_date(date: impl Into<Date>, format: DateFormat) -> String {
    let pattern = match format.endianness {
        DateEndianness::LittleEndian => "%d/%m/%Y",
        DateEndianness::MiddleEndian => "%m/%d/%Y",
        DateEndianness::BigEndian => "%Y-%m-%d",
    };

    date.into().strftime(pattern).to_string()
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TimeFormat {
    pub is_24_hour_clock: bool,
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self {
            is_24_hour_clock: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TimePrecision {
    #[default]
    Minute,
    Second,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TimeFormatOptions {
    pub precision: TimePrecision,
    /// Leave out trailing units that are zero. Minutes are always shown on a
    /// 24-hour clock.
    pub omit_zero_units: bool,
}

/// Formats `time` as `13:05` or `1:05 PM`.
pub fn format_time(time: impl Into<Time>, format: TimeFormat, options: TimeFormatOptions) -> String {
    let time = time.into();
    let (hour, minute, second) = (time.hour(), time.minute(), time.second());

    let show_seconds = options.precision == TimePrecision::Second
        && !(options.omit_zero_units && second == 0);

    let mut text = if format.is_24_hour_clock {
        format!("{hour:02}:{minute:02}")
    } else {
        let show_minutes = show_seconds || !(options.omit_zero_units && minute == 0);
        let clock_hour = match hour % 12 {
            0 => 12,
            other => other,
        };

        let mut text = clock_hour.to_string();
        if show_minutes {
            let _ = write!(text, ":{minute:02}");
        }
        text
    };

    if show_seconds {
        let _ = write!(text, ":{second:02}");
    }

    if !format.is_24_hour_clock {
        text.push_str(if hour < 12 { " AM" } else { " PM" });
    }

    text
}
