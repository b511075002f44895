//! Picks a supported locale from a list of user preferences.

use crate::tag::{is_part_of_language_tag, primary_subtag};

const ENGLISH: &str = "en";

/// English tags picked in this order before any other regional English.
const PREFERRED_ENGLISH: [&str; 3] = [ENGLISH, "en-US", "en-GB"];

/// Finds the supported tag closest to a single requested tag.
///
/// Resolution order:
/// 1. an exact match,
/// 2. a supported tag the request is part of (`fr-BE` requested, `fr` supported),
/// 3. a supported tag that is part of the request (`fr` requested, `fr-BE` supported),
/// 4. a supported tag sharing the primary subtag (`fr-BE` requested, `fr-FR` supported).
pub fn closest_supported_language_tag<'a, S>(requested: &str, supported: &'a [S]) -> Option<&'a str>
where
    S: AsRef<str>,
{
    let mut tags = supported.iter().map(S::as_ref);

    tags.clone()
        .find(|tag| *tag == requested)
        .or_else(|| {
            tags.clone()
                .find(|tag| is_part_of_language_tag(requested, tag))
        })
        .or_else(|| {
            tags.clone()
                .find(|tag| is_part_of_language_tag(tag, requested))
        })
        .or_else(|| tags.find(|tag| primary_subtag(tag) == primary_subtag(requested)))
}

/// Picks the initial locale among the supported ones.
///
/// The first preference with a close supported tag wins, then the explicit
/// default, then English (`en`, `en-US`, `en-GB`, then any other regional
/// English), then the first supported tag. Returns `None` only when nothing is supported.
pub fn negotiate_locale<'a, P, S>(
    preferred: &[P],
    default: Option<&str>,
    supported: &'a [S],
) -> Option<&'a str>
where
    P: AsRef<str>,
    S: AsRef<str>,
{
    let tags = || supported.iter().map(S::as_ref);

    preferred
        .iter()
        .find_map(|tag| closest_supported_language_tag(tag.as_ref(), supported))
        .or_else(|| default.and_then(|default| tags().find(|tag| *tag == default)))
        .or_else(|| {
            PREFERRED_ENGLISH
                .iter()
                .find_map(|english| tags().find(|tag| tag == english))
        })
        .or_else(|| tags().find(|tag| primary_subtag(tag) == ENGLISH))
        .or_else(|| tags().next())
}
