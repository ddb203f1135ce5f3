//! Catalog data model: contexts and the message entries they own.

use serde::Serialize;
use std::collections::HashMap;

use lingo_core::error::LingoError;

/// Translator workflow state of a message, from the TS `type` attribute.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationType {
    /// No `type` attribute: the translation is approved.
    #[default]
    Finished,
    /// Translated (or not) but not yet approved.
    Unfinished,
    /// The source string no longer exists in the code.
    Obsolete,
    /// Newer spelling of `obsolete`.
    Vanished,
}

impl TranslationType {
    /// Parse the `type` attribute value; `None` for values Qt does not define.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::Finished),
            "unfinished" => Some(Self::Unfinished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            _ => None,
        }
    }

    /// Attribute value to write back, `None` for finished entries.
    pub fn as_attr(&self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    /// Whether a lookup may return a translation in this state.
    pub fn is_resolvable(&self, include_unfinished: bool) -> bool {
        match self {
            Self::Finished => true,
            Self::Unfinished => include_unfinished,
            Self::Obsolete | Self::Vanished => false,
        }
    }
}

/// Where a message was extracted from. Provenance only, never used by lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: Option<u32>,
}

/// One translatable phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    /// Original-language phrase. Never empty once inside a [`Context`].
    pub source_text: String,
    /// Localized phrase; empty means untranslated.
    pub translation_text: String,
    /// Distinguishes entries sharing `source_text` (e.g. `"s"` as seconds).
    pub disambiguation_comment: Option<String>,
    pub locations: Vec<Location>,
    pub translation_type: TranslationType,
    /// Developer note for translators (`<extracomment>`).
    pub extra_comment: Option<String>,
    /// Translator's own note (`<translatorcomment>`).
    pub translator_comment: Option<String>,
    /// Plural message; `translation_text` mirrors the first form.
    pub numerus: bool,
    pub numerus_forms: Vec<String>,
}

impl MessageEntry {
    /// A finished entry with no comment or provenance.
    pub fn new(source_text: impl Into<String>, translation_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            translation_text: translation_text.into(),
            disambiguation_comment: None,
            locations: Vec::new(),
            translation_type: TranslationType::Finished,
            extra_comment: None,
            translator_comment: None,
            numerus: false,
            numerus_forms: Vec::new(),
        }
    }

    /// Set the disambiguation comment. An empty comment counts as none.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.disambiguation_comment = normalize_comment(Some(comment.into()));
        self
    }

    /// Append a provenance location.
    pub fn with_location(mut self, file: impl Into<String>, line: Option<u32>) -> Self {
        self.locations.push(Location {
            file: file.into(),
            line,
        });
        self
    }

    pub fn with_type(mut self, translation_type: TranslationType) -> Self {
        self.translation_type = translation_type;
        self
    }

    /// Turn this into a plural message with the given forms.
    pub fn with_numerus_forms(mut self, forms: Vec<String>) -> Self {
        self.translation_text = forms.first().cloned().unwrap_or_default();
        self.numerus = true;
        self.numerus_forms = forms;
        self
    }

    /// First extraction file, if any.
    pub fn origin_file(&self) -> Option<&str> {
        self.locations.first().map(|l| l.file.as_str())
    }

    /// First extraction line, if any.
    pub fn origin_line(&self) -> Option<u32> {
        self.locations.first().and_then(|l| l.line)
    }

    fn matches(&self, source: &str, comment: Option<&str>) -> bool {
        self.source_text == source && self.disambiguation_comment.as_deref() == comment
    }
}

/// Treat `Some("")` the same as `None`: Qt writes both for "no comment".
pub(crate) fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment.filter(|c| !c.is_empty())
}

/// A named group of messages belonging to one UI component.
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    messages: Vec<MessageEntry>,
    /// source text -> indexes into `messages`; comments are scanned linearly.
    by_source: HashMap<String, Vec<usize>>,
}

impl Context {
    /// Create an empty context. The name must not be empty.
    pub fn new(name: impl Into<String>) -> Result<Self, LingoError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LingoError::SchemaViolation(
                "context has an empty <name>".to_string(),
            ));
        }
        Ok(Self {
            name,
            messages: Vec::new(),
            by_source: HashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> &[MessageEntry] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Add a message, enforcing a non-empty source and a unique
    /// (source, comment) key.
    pub fn insert(&mut self, mut entry: MessageEntry) -> Result<(), LingoError> {
        if entry.source_text.is_empty() {
            return Err(LingoError::SchemaViolation(format!(
                "message in context '{}' has an empty <source>",
                self.name
            )));
        }
        entry.disambiguation_comment = normalize_comment(entry.disambiguation_comment.take());

        if self
            .find(&entry.source_text, entry.disambiguation_comment.as_deref())
            .is_some()
        {
            return Err(LingoError::SchemaViolation(format!(
                "duplicate message '{}'{} in context '{}'",
                entry.source_text,
                entry
                    .disambiguation_comment
                    .as_deref()
                    .map(|c| format!(" (comment '{c}')"))
                    .unwrap_or_default(),
                self.name
            )));
        }

        let idx = self.messages.len();
        self.by_source
            .entry(entry.source_text.clone())
            .or_default()
            .push(idx);
        self.messages.push(entry);
        Ok(())
    }

    /// Exact match on source text and comment. `None` only matches entries
    /// without a comment; an empty comment is treated as `None`.
    pub fn find(&self, source: &str, comment: Option<&str>) -> Option<&MessageEntry> {
        let comment = comment.filter(|c| !c.is_empty());
        self.by_source
            .get(source)?
            .iter()
            .map(|&i| &self.messages[i])
            .find(|m| m.matches(source, comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context_name_rejected() {
        let err = Context::new("").unwrap_err();
        assert!(matches!(err, LingoError::SchemaViolation(_)));
    }

    #[test]
    fn test_empty_source_rejected() {
        let mut ctx = Context::new("GUI").unwrap();
        let err = ctx.insert(MessageEntry::new("", "x")).unwrap_err();
        assert!(matches!(err, LingoError::SchemaViolation(_)));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_comment_disambiguates() {
        let mut ctx = Context::new("GUI").unwrap();
        ctx.insert(MessageEntry::new("s", "сек").with_comment("unit: seconds"))
            .unwrap();
        ctx.insert(MessageEntry::new("s", "с")).unwrap();
        assert_eq!(ctx.len(), 2);
        assert_eq!(
            ctx.find("s", Some("unit: seconds")).unwrap().translation_text,
            "сек"
        );
        assert_eq!(ctx.find("s", None).unwrap().translation_text, "с");
        assert!(ctx.find("s", Some("unit: samples")).is_none());
    }

    #[test]
    fn test_none_does_not_match_commented_entry() {
        let mut ctx = Context::new("GUI").unwrap();
        ctx.insert(MessageEntry::new("s", "сек").with_comment("unit: seconds"))
            .unwrap();
        assert!(ctx.find("s", None).is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut ctx = Context::new("GUI").unwrap();
        ctx.insert(MessageEntry::new("Start", "ПУСК")).unwrap();
        let err = ctx.insert(MessageEntry::new("Start", "СТАРТ")).unwrap_err();
        assert!(err.to_string().contains("duplicate message 'Start'"));
        // Empty comment collides with no comment.
        let err = ctx
            .insert(MessageEntry::new("Start", "x").with_comment(""))
            .unwrap_err();
        assert!(matches!(err, LingoError::SchemaViolation(_)));
    }

    #[test]
    fn test_origin_is_first_location() {
        let m = MessageEntry::new("Start", "ПУСК")
            .with_location("../gui/gui.py", Some(112))
            .with_location("../gui/app.py", Some(3));
        assert_eq!(m.origin_file(), Some("../gui/gui.py"));
        assert_eq!(m.origin_line(), Some(112));
        assert_eq!(MessageEntry::new("a", "b").origin_file(), None);
    }

    #[test]
    fn test_translation_type_attr() {
        assert_eq!(
            TranslationType::from_attr("unfinished"),
            Some(TranslationType::Unfinished)
        );
        assert_eq!(TranslationType::from_attr("bogus"), None);
        assert_eq!(TranslationType::Finished.as_attr(), None);
        assert!(!TranslationType::Vanished.is_resolvable(true));
        assert!(!TranslationType::Unfinished.is_resolvable(false));
    }

    #[test]
    fn test_numerus_forms_mirror_first() {
        let m = MessageEntry::new("%n file(s)", "")
            .with_numerus_forms(vec!["%n файл".into(), "%n файла".into()]);
        assert!(m.numerus);
        assert_eq!(m.translation_text, "%n файл");
    }
}
