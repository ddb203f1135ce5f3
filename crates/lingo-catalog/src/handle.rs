//! Shared, atomically replaceable reference to the active catalog.

use std::borrow::Cow;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

use lingo_core::error::LingoError;
use lingo_core::traits::Translatable;

use crate::catalog::Catalog;
use crate::loader::{CatalogLoader, LoadReport};

/// Cheap-to-clone handle to the catalog of the active locale.
///
/// A locale switch builds a complete new [`Catalog`] first and then swaps one
/// `Arc`; lookups in flight keep using the snapshot they started with and
/// never see a half-built catalog. The lock guards only the pointer.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    inner: Arc<RwLock<Arc<Catalog>>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// Handle over an empty catalog: every lookup falls back to the source text.
    pub fn untranslated() -> Self {
        Self::new(Catalog::new(""))
    }

    /// Snapshot of the active catalog.
    pub fn current(&self) -> Arc<Catalog> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in `catalog`, returning the previous one.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Load `locale` and swap it in. On failure the active catalog is kept.
    pub fn reload(&self, loader: &CatalogLoader, locale: &str) -> Result<LoadReport, LingoError> {
        match loader.load_with_report(locale) {
            Ok((catalog, report)) => {
                let previous = self.replace(catalog);
                info!(
                    "switched catalog from '{}' to '{}'",
                    previous.language(),
                    report.language
                );
                Ok(report)
            }
            Err(e) => {
                warn!(
                    "reload of {locale} failed, keeping '{}': {e}",
                    self.current().language()
                );
                Err(e)
            }
        }
    }
}

impl Translatable for CatalogHandle {
    fn lookup<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> Cow<'a, str> {
        let catalog = self.current();
        match catalog.translate(context, source, comment) {
            Some(text) => Cow::Owned(text.to_string()),
            None => Cow::Borrowed(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Context, MessageEntry};
    use lingo_core::config::CatalogConfig;

    fn catalog(language: &str, start: &str) -> Catalog {
        let mut cat = Catalog::new(language);
        let mut gui = Context::new("GUI").unwrap();
        gui.insert(MessageEntry::new("Start", start)).unwrap();
        cat.push_context(gui).unwrap();
        cat
    }

    #[test]
    fn test_untranslated_handle_falls_back() {
        let handle = CatalogHandle::untranslated();
        assert_eq!(handle.tr("GUI", "Start"), "Start");
    }

    #[test]
    fn test_replace_is_seen_by_clones() {
        let handle = CatalogHandle::new(catalog("de", "Start"));
        let other = handle.clone();
        let old = handle.replace(catalog("ru_RU", "ПУСК"));
        assert_eq!(old.language(), "de");
        assert_eq!(other.tr("GUI", "Start"), "ПУСК");
    }

    #[test]
    fn test_snapshot_survives_swap() {
        let handle = CatalogHandle::new(catalog("de", "Los"));
        let snapshot = handle.current();
        handle.replace(catalog("ru_RU", "ПУСК"));
        assert_eq!(snapshot.lookup("GUI", "Start", None), "Los");
        assert_eq!(handle.current().lookup("GUI", "Start", None), "ПУСК");
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CatalogLoader::new(&CatalogConfig {
            translations_dir: dir.path().to_string_lossy().into_owned(),
            use_bundled: false,
            ..Default::default()
        });
        let handle = CatalogHandle::new(catalog("de", "Los"));
        assert!(handle.reload(&loader, "ru_RU").is_err());
        assert_eq!(handle.tr("GUI", "Start"), "Los");
    }

    #[test]
    fn test_reload_from_bundled() {
        let loader = CatalogLoader::new(&CatalogConfig {
            translations_dir: "/nonexistent/lingo".into(),
            ..Default::default()
        });
        let handle = CatalogHandle::untranslated();
        let report = handle.reload(&loader, "ru_RU").unwrap();
        assert_eq!(report.language, "ru_RU");
        assert_eq!(handle.tr("GUI", "Start"), "ПУСК");
    }

    #[test]
    fn test_concurrent_lookups_during_swaps() {
        let handle = CatalogHandle::new(catalog("de", "Los"));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let h = handle.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let text = h.tr("GUI", "Start").into_owned();
                        assert!(text == "Los" || text == "ПУСК", "saw {text}");
                    }
                })
            })
            .collect();
        for i in 0..100 {
            let next = if i % 2 == 0 {
                catalog("ru_RU", "ПУСК")
            } else {
                catalog("de", "Los")
            };
            handle.replace(next);
        }
        for r in readers {
            r.join().unwrap();
        }
    }
}
