//! Catalogs compiled into the binary, used when no file is found on disk.

/// Russian catalog for the acquisition front end.
const RU_RU: &str = include_str!("../../../translations/ru_RU.ts");

/// (locale name, TS document) pairs, most specific names first.
const BUNDLED: &[(&str, &str)] = &[("ru_RU", RU_RU)];

/// TS document bundled for `name` (`ru_RU`), if any.
pub fn bundled(name: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(locale, _)| *locale == name)
        .map(|(_, text)| *text)
}

/// Locale names with a bundled catalog.
pub fn bundled_locales() -> impl Iterator<Item = &'static str> {
    BUNDLED.iter().map(|(locale, _)| *locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ru_ru_is_bundled() {
        let text = bundled("ru_RU").unwrap();
        assert!(text.contains("<TS version=\"2.1\" language=\"ru_RU\">"));
        assert!(bundled_locales().any(|l| l == "ru_RU"));
    }

    #[test]
    fn test_unknown_locale_not_bundled() {
        assert!(bundled("de_DE").is_none());
    }
}
