//! Locale → TS document resolution and loading.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use lingo_core::config::{CatalogConfig, LoadPolicy};
use lingo_core::error::LingoError;
use lingo_core::locale::Locale;

use crate::bundled::bundled;
use crate::catalog::Catalog;
use crate::parse::{parse_ts, parse_ts_bytes, Parsed};

/// Summary of one successful load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// File path, or `bundled:<locale>`.
    pub origin: String,
    /// Language attribute of the loaded document.
    pub language: String,
    pub contexts: usize,
    pub messages: usize,
    /// Entries dropped under the lenient policy.
    pub skipped: Vec<String>,
}

/// Finds and loads the catalog for a locale.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    dir: PathBuf,
    prefix: String,
    policy: LoadPolicy,
    include_unfinished: bool,
    use_bundled: bool,
}

impl CatalogLoader {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            dir: config.translations_path(),
            prefix: config.file_prefix.clone(),
            policy: config.policy,
            include_unfinished: config.include_unfinished,
            use_bundled: config.use_bundled,
        }
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Files tried for `locale`, in order: `{prefix}ru_RU.ts`, `{prefix}ru.ts`.
    pub fn candidates(&self, locale: &Locale) -> Vec<PathBuf> {
        locale
            .fallback_chain()
            .into_iter()
            .map(|name| self.dir.join(format!("{}{name}.ts", self.prefix)))
            .collect()
    }

    /// Load the catalog for `locale_identifier` (e.g. `ru_RU`).
    pub fn load(&self, locale_identifier: &str) -> Result<Catalog, LingoError> {
        self.load_with_report(locale_identifier)
            .map(|(catalog, _)| catalog)
    }

    /// Like [`load`](Self::load), also returning what was loaded from where.
    pub fn load_with_report(
        &self,
        locale_identifier: &str,
    ) -> Result<(Catalog, LoadReport), LingoError> {
        let locale: Locale = locale_identifier.parse()?;
        self.load_locale(&locale)
    }

    pub fn load_locale(&self, locale: &Locale) -> Result<(Catalog, LoadReport), LingoError> {
        let (catalog, report) = match self.candidates(locale).into_iter().find(|p| p.is_file()) {
            Some(path) => self.load_path(&path)?,
            None => self.load_bundled(locale)?,
        };

        match catalog.language().parse::<Locale>() {
            Ok(declared) if declared.same_language(locale) => {}
            Ok(declared) => warn!(
                "{}: declares language {declared}, requested {locale}",
                report.origin
            ),
            Err(_) => warn!(
                "{}: missing or invalid language attribute '{}'",
                report.origin,
                catalog.language()
            ),
        }
        Ok((catalog, report))
    }

    /// Load an explicit TS file.
    pub fn load_path(&self, path: &Path) -> Result<(Catalog, LoadReport), LingoError> {
        let bytes = std::fs::read(path).map_err(|e| {
            LingoError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {e}", path.display()),
            ))
        })?;
        let origin = path.display().to_string();
        let parsed = parse_ts_bytes(&bytes, &origin, self.policy)?;
        Ok(self.finish(parsed, origin))
    }

    /// Load a TS document already in memory.
    pub fn load_str(&self, text: &str, origin: &str) -> Result<(Catalog, LoadReport), LingoError> {
        let parsed = parse_ts(text, origin, self.policy)?;
        Ok(self.finish(parsed, origin.to_string()))
    }

    fn load_bundled(&self, locale: &Locale) -> Result<(Catalog, LoadReport), LingoError> {
        let tried = self
            .candidates(locale)
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        if !self.use_bundled {
            return Err(LingoError::LocaleNotFound(format!(
                "{locale} (tried {tried})"
            )));
        }
        for name in locale.fallback_chain() {
            if let Some(text) = bundled(&name) {
                return self.load_str(text, &format!("bundled:{name}"));
            }
        }
        Err(LingoError::LocaleNotFound(format!(
            "{locale} (tried {tried} and bundled catalogs)"
        )))
    }

    fn finish(&self, parsed: Parsed, origin: String) -> (Catalog, LoadReport) {
        let catalog = parsed.catalog.with_include_unfinished(self.include_unfinished);
        let report = LoadReport {
            origin,
            language: catalog.language().to_string(),
            contexts: catalog.contexts().len(),
            messages: catalog.message_count(),
            skipped: parsed.skipped,
        };
        info!(
            "loaded {} catalog from {}: {} contexts, {} messages{}",
            report.language,
            report.origin,
            report.contexts,
            report.messages,
            if report.skipped.is_empty() {
                String::new()
            } else {
                format!(", {} skipped", report.skipped.len())
            }
        );
        (catalog, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="de">
<context>
    <name>GUI</name>
    <message>
        <source>Start</source>
        <translation>Start</translation>
    </message>
    <message>
        <source>Stop</source>
        <translation>Halt</translation>
    </message>
</context>
</TS>
"#;

    fn loader_for(dir: &Path) -> CatalogLoader {
        CatalogLoader::new(&CatalogConfig {
            translations_dir: dir.to_string_lossy().into_owned(),
            ..Default::default()
        })
    }

    #[test]
    fn test_candidates_follow_fallback_chain() {
        let loader = CatalogLoader::new(&CatalogConfig {
            translations_dir: "/i18n".into(),
            file_prefix: "daq_".into(),
            ..Default::default()
        });
        let locale: Locale = "ru_RU".parse().unwrap();
        assert_eq!(
            loader.candidates(&locale),
            vec![
                PathBuf::from("/i18n/daq_ru_RU.ts"),
                PathBuf::from("/i18n/daq_ru.ts")
            ]
        );
    }

    #[test]
    fn test_language_only_file_serves_territory_locale() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("de.ts"), DE).unwrap();
        let (cat, report) = loader_for(dir.path()).load_with_report("de_AT").unwrap();
        assert_eq!(cat.lookup("GUI", "Stop", None), "Halt");
        assert!(report.origin.ends_with("de.ts"));
        assert_eq!(report.contexts, 1);
        assert_eq!(report.messages, 2);
    }

    #[test]
    fn test_file_overrides_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let custom = DE.replace("language=\"de\"", "language=\"ru_RU\"");
        std::fs::write(dir.path().join("ru_RU.ts"), custom).unwrap();
        let cat = loader_for(dir.path()).load("ru_RU").unwrap();
        assert_eq!(cat.lookup("GUI", "Stop", None), "Halt");
    }

    #[test]
    fn test_falls_back_to_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let (cat, report) = loader_for(dir.path()).load_with_report("ru_RU").unwrap();
        assert_eq!(report.origin, "bundled:ru_RU");
        assert_eq!(cat.lookup("GUI", "Start", None), "ПУСК");
    }

    #[test]
    fn test_missing_locale_without_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CatalogLoader::new(&CatalogConfig {
            translations_dir: dir.path().to_string_lossy().into_owned(),
            use_bundled: false,
            ..Default::default()
        });
        let err = loader.load("ru_RU").unwrap_err();
        assert!(matches!(err, LingoError::LocaleNotFound(_)), "{err}");

        let err = loader_for(dir.path()).load("fr_FR").unwrap_err();
        assert!(err.to_string().contains("bundled"), "{err}");
    }

    #[test]
    fn test_corrupt_file_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("de.ts"), &DE[..DE.len() - 20]).unwrap();
        let err = loader_for(dir.path()).load("de").unwrap_err();
        assert!(err.is_catalog_error(), "{err}");
    }

    #[test]
    fn test_invalid_locale_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader_for(dir.path()).load("C").unwrap_err();
        assert!(matches!(err, LingoError::Config(_)), "{err}");
    }

    #[test]
    fn test_include_unfinished_applied() {
        let dir = tempfile::tempdir().unwrap();
        let doc = DE.replace(
            "<translation>Halt</translation>",
            "<translation type=\"unfinished\">Halt</translation>",
        );
        std::fs::write(dir.path().join("de.ts"), doc).unwrap();
        let loader = CatalogLoader::new(&CatalogConfig {
            translations_dir: dir.path().to_string_lossy().into_owned(),
            include_unfinished: false,
            ..Default::default()
        });
        let cat = loader.load("de").unwrap();
        assert_eq!(cat.lookup("GUI", "Stop", None), "Stop");
    }

    #[test]
    fn test_lenient_policy_reports_skipped() {
        let loader = CatalogLoader::new(&CatalogConfig {
            policy: LoadPolicy::Lenient,
            ..Default::default()
        });
        let doc = DE.replace("<source>Stop</source>", "");
        let (cat, report) = loader.load_str(&doc, "inline").unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(cat.message_count(), 1);
    }
}
