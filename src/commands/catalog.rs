//! Catalog queries: lookup, sources, audit.

use lingo_catalog::CoverageReport;
use lingo_core::config::CatalogConfig;
use lingo_core::error::LingoError;
use lingo_core::traits::Translatable;

use super::{load_catalog, load_or_untranslated};

pub fn handle_lookup(
    cfg: &CatalogConfig,
    locale: Option<&str>,
    context: &str,
    source: &str,
    comment: Option<&str>,
) -> String {
    let translator = load_or_untranslated(cfg, locale);
    translator.lookup(context, source, comment).into_owned()
}

pub fn handle_sources(
    cfg: &CatalogConfig,
    locale: Option<&str>,
    context: &str,
) -> Result<String, LingoError> {
    let catalog = load_catalog(cfg, locale)?;
    Ok(catalog
        .all_source_texts(context)
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn handle_audit(
    cfg: &CatalogConfig,
    locale: Option<&str>,
    json: bool,
) -> Result<String, LingoError> {
    let catalog = load_catalog(cfg, locale)?;
    let report = CoverageReport::from_catalog(&catalog);
    if json {
        return report.to_json();
    }

    let mut out = format!(
        "{}: {:.1}% translated ({}/{} live entries)",
        report.language,
        report.percent_translated(),
        report.translated(),
        report.live()
    );
    for c in &report.contexts {
        out.push_str(&format!(
            "\n  {}: {} total, {} finished, {} unfinished, {} obsolete, {} empty",
            c.name, c.total, c.finished, c.unfinished, c.obsolete, c.empty
        ));
        for source in &c.untranslated {
            out.push_str(&format!("\n    untranslated: {source}"));
        }
    }
    Ok(out)
}
