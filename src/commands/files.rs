//! Operations on explicit TS files: check, normalize.

use std::path::Path;

use lingo_catalog::CatalogLoader;
use lingo_core::config::CatalogConfig;
use lingo_core::error::LingoError;
use tracing::info;

pub fn handle_check(cfg: &CatalogConfig, path: &Path) -> Result<String, LingoError> {
    let loader = CatalogLoader::new(cfg);
    let (_, report) = loader.load_path(path)?;

    let mut out = format!(
        "{}: ok ({} policy), language {}, {} contexts, {} messages",
        report.origin,
        loader.policy().display_name(),
        report.language,
        report.contexts,
        report.messages
    );
    for entry in &report.skipped {
        out.push_str(&format!("\n  skipped: {entry}"));
    }
    Ok(out)
}

/// Re-emit `path` in canonical TS form, to `output` or as the returned text.
pub fn handle_normalize(
    cfg: &CatalogConfig,
    path: &Path,
    output: Option<&Path>,
) -> Result<String, LingoError> {
    let (catalog, _) = CatalogLoader::new(cfg).load_path(path)?;
    let text = catalog.to_ts_string()?;
    match output {
        Some(out) => {
            std::fs::write(out, &text)?;
            info!("wrote {}", out.display());
            Ok(String::new())
        }
        None => Ok(text.trim_end().to_string()),
    }
}
