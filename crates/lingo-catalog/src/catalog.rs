//! The per-locale Translation Catalog and its lookup operations.

use std::borrow::Cow;
use std::collections::HashMap;

use lingo_core::error::LingoError;
use lingo_core::traits::Translatable;

use crate::diagnostics::{LookupStats, MissReason, StatsSnapshot};
use crate::model::{Context, MessageEntry};

/// TS format version written by current Qt Linguist.
pub const TS_VERSION: &str = "2.1";

/// All contexts and message entries for one locale.
///
/// Built once (by the parser or by hand), then shared read-only; lookups take
/// `&self` and never lock.
#[derive(Debug)]
pub struct Catalog {
    version: String,
    language: String,
    source_language: Option<String>,
    contexts: Vec<Context>,
    by_name: HashMap<String, usize>,
    include_unfinished: bool,
    stats: LookupStats,
}

impl Catalog {
    /// Empty catalog for `language` (e.g. `ru_RU`).
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            version: TS_VERSION.to_string(),
            language: language.into(),
            source_language: None,
            contexts: Vec::new(),
            by_name: HashMap::new(),
            include_unfinished: true,
            stats: LookupStats::default(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_source_language(mut self, source_language: Option<String>) -> Self {
        self.source_language = source_language.filter(|s| !s.is_empty());
        self
    }

    /// Whether `unfinished` translations resolve (default: yes, like lrelease).
    pub fn with_include_unfinished(mut self, include: bool) -> Self {
        self.include_unfinished = include;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Target locale named by the document, as written.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    pub fn include_unfinished(&self) -> bool {
        self.include_unfinished
    }

    /// Add a context. Names are unique within a catalog.
    pub fn push_context(&mut self, context: Context) -> Result<(), LingoError> {
        if self.by_name.contains_key(context.name()) {
            return Err(LingoError::SchemaViolation(format!(
                "duplicate context '{}'",
                context.name()
            )));
        }
        self.by_name
            .insert(context.name().to_string(), self.contexts.len());
        self.contexts.push(context);
        Ok(())
    }

    /// Contexts in document order.
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// Exact, case-sensitive context lookup.
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.by_name.get(name).map(|&i| &self.contexts[i])
    }

    /// Total number of message entries across all contexts.
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(Context::len).sum()
    }

    /// Resolve a phrase, recording the outcome. `None` on any miss.
    pub fn translate(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&str> {
        match self.resolve(context, source, comment) {
            Ok(text) => {
                self.stats.record_hit();
                Some(text)
            }
            Err(reason) => {
                self.stats.record_miss(reason, context, source);
                None
            }
        }
    }

    /// Resolve a phrase, falling back to `source` unchanged when nothing
    /// usable is stored. Never fails.
    pub fn lookup<'a>(&'a self, context: &str, source: &'a str, comment: Option<&str>) -> &'a str {
        self.translate(context, source, comment).unwrap_or(source)
    }

    /// Source texts registered for `context`, in insertion order. Empty for
    /// unknown contexts. Clone the iterator (or call again) to restart.
    pub fn all_source_texts(&self, context: &str) -> SourceTexts<'_> {
        let messages = self
            .context(context)
            .map(Context::messages)
            .unwrap_or_default();
        SourceTexts {
            inner: messages.iter(),
        }
    }

    /// Counters accumulated by lookups on this catalog so far.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn resolve(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
    ) -> Result<&str, MissReason> {
        let ctx = self.context(context).ok_or(MissReason::UnknownContext)?;
        let entry = ctx
            .find(source, comment)
            .ok_or(MissReason::UnknownMessage)?;
        if entry.translation_text.is_empty()
            || !entry
                .translation_type
                .is_resolvable(self.include_unfinished)
        {
            return Err(MissReason::Untranslated);
        }
        Ok(&entry.translation_text)
    }
}

impl Translatable for Catalog {
    fn lookup<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> Cow<'a, str> {
        Cow::Borrowed(Catalog::lookup(self, context, source, comment))
    }
}

/// Lazy iterator over one context's source texts.
#[derive(Debug, Clone)]
pub struct SourceTexts<'a> {
    inner: std::slice::Iter<'a, MessageEntry>,
}

impl<'a> Iterator for SourceTexts<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|m| m.source_text.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for SourceTexts<'_> {}
