//! Subtag-level comparisons on plain language tags.
//!
//! Tags are handled as strings rather than parsed identifiers: a registry may
//! be keyed by any tag, and only the `-` separated subtags matter here.

/// Separator between the subtags of a language tag.
pub const SUBTAG_SEPARATOR: char = '-';

/// Returns the primary language subtag.
///
/// For `fr-BE` this returns `fr`; a tag without subtags is returned as is.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split_once(SUBTAG_SEPARATOR)
        .map_or(tag, |(primary, _)| primary)
}

/// Returns the primary-subtag fallback of a tag that carries region, script
/// or variant subtags.
///
/// `fr-BE` falls back to `fr`, while `fr` has no derived fallback.
pub fn derived_fallback(tag: &str) -> Option<&str> {
    tag.split_once(SUBTAG_SEPARATOR)
        .map(|(primary, _)| primary)
        .filter(|primary| !primary.is_empty())
}

struct ParsedTag<'a> {
    primary: &'a str,
    region: Option<&'a str>,
    subtags: Vec<&'a str>,
}

impl<'a> ParsedTag<'a> {
    fn parse(tag: &'a str) -> Self {
        let subtags: Vec<&str> = tag.split(SUBTAG_SEPARATOR).collect();
        let region = subtags.iter().copied().find(|subtag| is_region_subtag(subtag));

        Self {
            primary: primary_subtag(tag),
            region,
            subtags,
        }
    }
}

fn is_region_subtag(subtag: &str) -> bool {
    subtag.chars().count() == 2 && subtag.to_uppercase() == subtag
}

/// Returns `true` when `candidate` is satisfied by `parent`.
///
/// A more specific tag is part of a less specific one: `en-US` satisfies a
/// requirement of `en`, but `en` does not satisfy `en-US`.
///
/// ```
/// use rosetta_lang::is_part_of_language_tag;
///
/// assert!(is_part_of_language_tag("en-US", "en"));
/// assert!(!is_part_of_language_tag("en", "en-US"));
/// assert!(is_part_of_language_tag("en-Xxx-Yyy-US", "en-Yyy-US"));
/// ```
pub fn is_part_of_language_tag(parent: &str, candidate: &str) -> bool {
    if parent == candidate {
        return true;
    }

    let parent = ParsedTag::parse(parent);
    let candidate = ParsedTag::parse(candidate);

    if parent.primary != candidate.primary {
        return false;
    }

    if candidate
        .region
        .is_some_and(|region| parent.region != Some(region))
    {
        return false;
    }

    if candidate.subtags.len() <= 2 {
        return true;
    }

    if parent.subtags.len() < candidate.subtags.len() {
        return false;
    }

    candidate
        .subtags
        .iter()
        .all(|subtag| parent.subtags.contains(subtag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", "en", true)]
    #[case("en-US", "en-US", true)]
    #[case("en-US", "en", true)]
    #[case("en", "en-US", false)]
    #[case("en-Xxx-US", "en-Xxx-US", true)]
    #[case("en-Xxx-US", "en-US", true)]
    #[case("en-US", "en-Xxx-US", false)]
    #[case("en-Xxx-US", "en-Yyy-US", false)]
    #[case("en-Yyy-US", "en-Xxx-US", false)]
    #[case("en-Xxx-Yyy-US", "en-Xxx-US", true)]
    #[case("en-Xxx-Yyy-US", "en-Yyy-US", true)]
    #[case("en-Xxx-US", "en-Xxx-Yyy-US", false)]
    #[case("en-Yyy-US", "en-Xxx-Yyy-US", false)]
    #[case("en", "fr", false)]
    #[case("en-FR", "fr-FR", false)]
    #[case("en-US", "en-UK", false)]
    #[case("en-UK", "en-US", false)]
    fn part_of_language_tag(#[case] parent: &str, #[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(is_part_of_language_tag(parent, candidate), expected);
    }

    #[test]
    fn primary_subtag_strips_region() {
        assert_eq!(primary_subtag("fr-BE"), "fr");
        assert_eq!(primary_subtag("zh-Hans-CN"), "zh");
        assert_eq!(primary_subtag("fr"), "fr");
    }

    #[test]
    fn derived_fallback_only_for_tags_with_subtags() {
        assert_eq!(derived_fallback("fr-BE"), Some("fr"));
        assert_eq!(derived_fallback("fr"), None);
        assert_eq!(derived_fallback("-BE"), None);
    }
}
