//! CLI command handlers. Each returns the text to print.

mod catalog;
mod files;
mod units;


pub use catalog::{handle_audit, handle_lookup, handle_sources};
pub use files::{handle_check, handle_normalize};
pub use units::{handle_si, SiStyle};

use lingo_catalog::{Catalog, CatalogLoader};
use lingo_core::config::CatalogConfig;
use lingo_core::error::LingoError;
use lingo_core::traits::{Translatable, Untranslated};
use tracing::warn;

/// Load the catalog for the requested (or configured) locale.
fn load_catalog(cfg: &CatalogConfig, locale: Option<&str>) -> Result<Catalog, LingoError> {
    let locale = cfg.resolve_locale(locale)?;
    let (catalog, _) = CatalogLoader::new(cfg).load_locale(&locale)?;
    Ok(catalog)
}

/// Like [`load_catalog`], but a failed load degrades to untranslated text.
fn load_or_untranslated(cfg: &CatalogConfig, locale: Option<&str>) -> Box<dyn Translatable> {
    match load_catalog(cfg, locale) {
        Ok(catalog) => Box::new(catalog),
        Err(e) => {
            warn!("no catalog available, showing source text: {e}");
            Box::new(Untranslated)
        }
    }
}
