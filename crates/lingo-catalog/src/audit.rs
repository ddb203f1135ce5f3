//! Translation coverage audit.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lingo_core::error::LingoError;

use crate::catalog::Catalog;
use crate::model::{Context, TranslationType};

/// Per-context translation counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContextCoverage {
    pub name: String,
    pub total: usize,
    pub finished: usize,
    pub unfinished: usize,
    /// Obsolete or vanished entries; never served by lookups.
    pub obsolete: usize,
    /// Live entries with an empty translation.
    pub empty: usize,
    /// Source texts a lookup would show untranslated, in catalog order.
    pub untranslated: Vec<String>,
}

impl ContextCoverage {
    fn from_context(context: &Context, include_unfinished: bool) -> Self {
        let mut cov = Self {
            name: context.name().to_string(),
            total: context.len(),
            ..Default::default()
        };
        for m in context.messages() {
            match m.translation_type {
                TranslationType::Finished => cov.finished += 1,
                TranslationType::Unfinished => cov.unfinished += 1,
                TranslationType::Obsolete | TranslationType::Vanished => {
                    cov.obsolete += 1;
                    continue;
                }
            }
            if m.translation_text.is_empty() {
                cov.empty += 1;
            }
            if m.translation_text.is_empty()
                || !m.translation_type.is_resolvable(include_unfinished)
            {
                cov.untranslated.push(m.source_text.clone());
            }
        }
        cov
    }

    /// Live (non-obsolete) entries.
    pub fn live(&self) -> usize {
        self.total - self.obsolete
    }
}

/// Coverage of a whole catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub language: String,
    pub generated_at: DateTime<Utc>,
    pub contexts: Vec<ContextCoverage>,
}

impl CoverageReport {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            language: catalog.language().to_string(),
            generated_at: Utc::now(),
            contexts: catalog
                .contexts()
                .iter()
                .map(|c| ContextCoverage::from_context(c, catalog.include_unfinished()))
                .collect(),
        }
    }

    /// Live entries across all contexts.
    pub fn live(&self) -> usize {
        self.contexts.iter().map(ContextCoverage::live).sum()
    }

    /// Live entries a lookup would translate.
    pub fn translated(&self) -> usize {
        self.contexts
            .iter()
            .map(|c| c.live() - c.untranslated.len())
            .sum()
    }

    /// Share of live entries that translate, 0–100. An empty catalog is 100.
    pub fn percent_translated(&self) -> f64 {
        match self.live() {
            0 => 100.0,
            live => self.translated() as f64 * 100.0 / live as f64,
        }
    }

    pub fn to_json(&self) -> Result<String, LingoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
