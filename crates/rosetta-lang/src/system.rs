/// Returns the operating system's preferred locales, most preferred first.
///
/// Platforms that report POSIX-style values (`fr_BE`) are normalized to
/// `-` separated tags. Values without a language (`C`, `POSIX`) are skipped.
pub fn system_preferred_locales() -> Vec<String> {
    let locales: Vec<String> = sys_locale::get_locales()
        .filter_map(|locale| normalize_system_locale(&locale))
        .collect();

    tracing::debug!(?locales, "Read system preferred locales");
    locales
}

fn normalize_system_locale(raw: &str) -> Option<String> {
    // Drop encoding and modifier suffixes such as `.UTF-8` or `@euro`.
    let tag = raw
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('_', "-");

    match tag.as_str() {
        "" | "C" | "POSIX" => None,
        _ => Some(tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en-US", Some("en-US"))]
    #[case("fr_BE", Some("fr-BE"))]
    #[case("de_DE.UTF-8", Some("de-DE"))]
    #[case("ca_ES@valencia", Some("ca-ES"))]
    #[case("C", None)]
    #[case("POSIX", None)]
    #[case("", None)]
    fn normalizes_system_values(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_system_locale(raw).as_deref(), expected);
    }
}
