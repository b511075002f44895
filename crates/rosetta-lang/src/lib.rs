#![doc = include_str!("../README.md")]

mod direction;
mod format;
mod negotiate;
mod system;
mod tag;

pub use direction::{TextDirection, text_direction};
pub use format::{
    DateEndianness, DateFormat, FormatError, NumberFormat, NumberFormatOptions, ParseNumberOptions,
    TimeFormat, TimeFormatOptions, TimePrecision, format_date, format_number, format_time,
    parse_number,
};
pub use negotiate::{closest_supported_language_tag, negotiate_locale};
pub use system::system_preferred_locales;
pub use tag::{SUBTAG_SEPARATOR, derived_fallback, is_part_of_language_tag, primary_subtag};
