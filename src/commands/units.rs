//! `si`: value formatting with localized prefixes.

use lingo_core::config::CatalogConfig;
use lingo_units::SiPrefixes;

use super::load_or_untranslated;

/// How `si` renders a value.
pub struct SiStyle<'a> {
    pub suffix: &'a str,
    pub precision: usize,
    /// Fixed decimals; overrides `precision`.
    pub decimals: Option<usize>,
    pub ascii: bool,
}

pub fn handle_si(
    cfg: &CatalogConfig,
    locale: Option<&str>,
    value: f64,
    style: &SiStyle<'_>,
) -> String {
    let translator = load_or_untranslated(cfg, locale);
    let prefixes = SiPrefixes::from_translator(&*translator);
    match style.decimals {
        Some(decimals) => {
            prefixes.format_fixed_with(value, decimals, style.suffix, !style.ascii)
        }
        None => prefixes.format_with(value, style.precision, style.suffix, !style.ascii),
    }
}
