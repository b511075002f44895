use crate::tag::is_part_of_language_tag;

/// Primary subtags of languages written right-to-left.
const RTL_LANGUAGES: &[&str] = &["ar", "dv", "fa", "ha", "he", "ks", "ku", "ps", "ur", "yi"];

/// Layout direction of a locale.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }
}

/// Returns the text direction for a language tag.
pub fn text_direction(tag: &str) -> TextDirection {
    if RTL_LANGUAGES
        .iter()
        .any(|rtl| is_part_of_language_tag(tag, rtl))
    {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}
