//! TS document reader.
//!
//! Walks the `quick-xml` event stream once, building drafts for the current
//! context and message and validating each when its end tag arrives. Markup
//! errors are always fatal (`MalformedCatalog`); schema errors are fatal under
//! [`LoadPolicy::Strict`] and skipped with a warning under
//! [`LoadPolicy::Lenient`].


use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::cell::Cell;
use std::collections::HashMap;
use tracing::warn;

use lingo_core::config::LoadPolicy;
use lingo_core::error::LingoError;

use crate::catalog::{Catalog, TS_VERSION};
use crate::model::{normalize_comment, Context, Location, MessageEntry, TranslationType};

/// Parsed catalog plus the descriptions of anything skipped in lenient mode.
#[derive(Debug)]
pub struct Parsed {
    pub catalog: Catalog,
    pub skipped: Vec<String>,
}

/// Parse a TS document. `origin` names the document in error messages.
pub fn parse_ts(text: &str, origin: &str, policy: LoadPolicy) -> Result<Parsed, LingoError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut parser = TsParser::new(text, origin, policy);
    parser.run()?;
    let catalog = parser.catalog.ok_or_else(|| {
        LingoError::MalformedCatalog(format!("{origin}: document has no <TS> root element"))
    })?;
    Ok(Parsed {
        catalog,
        skipped: parser.skipped,
    })
}

/// Parse raw bytes, rejecting anything that is not UTF-8.
pub fn parse_ts_bytes(bytes: &[u8], origin: &str, policy: LoadPolicy) -> Result<Parsed, LingoError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        LingoError::MalformedCatalog(format!("{origin}: not valid UTF-8: {e}"))
    })?;
    parse_ts(text, origin, policy)
}

/// Leaf elements whose text content we keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ContextName,
    Source,
    Comment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
}

#[derive(Debug, Default)]
struct ContextDraft {
    name: Option<String>,
    line: usize,
    messages: Vec<(usize, MessageEntry)>,
}

#[derive(Debug, Default)]
struct MessageDraft {
    line: usize,
    source: Option<String>,
    translation: Option<String>,
    comment: Option<String>,
    extra_comment: Option<String>,
    translator_comment: Option<String>,
    locations: Vec<Location>,
    translation_type: TranslationType,
    numerus: bool,
    forms: Vec<String>,
    errors: Vec<String>,
}

impl MessageDraft {
    fn finish(self) -> Result<MessageEntry, String> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        let source = match self.source {
            None => return Err(format!("message at line {} has no <source>", self.line)),
            Some(s) if s.is_empty() => {
                return Err(format!("message at line {} has an empty <source>", self.line))
            }
            Some(s) => s,
        };
        let Some(translation) = self.translation else {
            return Err(format!(
                "message '{source}' at line {} has no <translation>",
                self.line
            ));
        };

        let mut entry = MessageEntry::new(source, translation);
        entry.disambiguation_comment = normalize_comment(self.comment);
        entry.extra_comment = self.extra_comment;
        entry.translator_comment = self.translator_comment;
        entry.locations = self.locations;
        entry.translation_type = self.translation_type;
        if self.numerus {
            entry = entry.with_numerus_forms(self.forms);
        }
        Ok(entry)
    }
}

struct TsParser<'a> {
    text: &'a str,
    origin: &'a str,
    policy: LoadPolicy,
    catalog: Option<Catalog>,
    stack: Vec<String>,
    context: Option<ContextDraft>,
    message: Option<MessageDraft>,
    /// Field being captured and the stack depth of its element.
    capture: Option<(Field, usize)>,
    buf: String,
    /// Last absolute line per file, for relative `line="+N"` locations.
    last_line: HashMap<String, u32>,
    last_file: Option<String>,
    /// (byte offset, line) of the last `line_at` answer; offsets mostly grow.
    line_cursor: Cell<(usize, usize)>,
    skipped: Vec<String>,
}

impl<'a> TsParser<'a> {
    fn new(text: &'a str, origin: &'a str, policy: LoadPolicy) -> Self {
        Self {
            text,
            origin,
            policy,
            catalog: None,
            stack: Vec::new(),
            context: None,
            message: None,
            capture: None,
            buf: String::new(),
            last_line: HashMap::new(),
            last_file: None,
            line_cursor: Cell::new((0, 1)),
            skipped: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), LingoError> {
        let mut reader = Reader::from_str(self.text);
        loop {
            let pos = reader.buffer_position() as usize;
            let event = reader
                .read_event()
                .map_err(|e| self.malformed(pos, &e.to_string()))?;
            match event {
                Event::Start(e) => {
                    let name = element_name(&e);
                    let attrs = self.attributes(&e, pos)?;
                    self.open(&name, &attrs, pos)?;
                    self.stack.push(name);
                }
                Event::Empty(e) => {
                    let name = element_name(&e);
                    let attrs = self.attributes(&e, pos)?;
                    self.open(&name, &attrs, pos)?;
                    self.stack.push(name);
                    self.close(pos)?;
                }
                Event::End(_) => self.close(pos)?,
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| self.malformed(pos, &e.to_string()))?;
                    self.handle_text(&text, pos)?;
                }
                Event::CData(c) => {
                    let text = std::str::from_utf8(&c)
                        .map_err(|e| self.malformed(pos, &e.to_string()))?;
                    self.handle_text(text, pos)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(self.malformed(self.text.len(), &format!("unclosed <{open}>")));
        }
        Ok(())
    }

    fn open(&mut self, name: &str, attrs: &Attrs, pos: usize) -> Result<(), LingoError> {
        let depth = self.stack.len();
        let parent = self.stack.last().cloned();

        match (parent.as_deref(), name) {
            (None, _) if self.catalog.is_some() => {
                return Err(self.malformed(pos, "more than one root element"));
            }
            (None, "TS") => {
                let version = attrs.get("version").unwrap_or(TS_VERSION);
                let language = attrs.get("language").unwrap_or_default();
                self.catalog = Some(
                    Catalog::new(language)
                        .with_version(version)
                        .with_source_language(attrs.get("sourcelanguage").map(str::to_string)),
                );
            }
            (None, other) => {
                return Err(self.malformed(
                    pos,
                    &format!("root element is <{other}>, expected <TS>"),
                ));
            }
            (Some("TS"), "context") => {
                self.context = Some(ContextDraft {
                    line: self.line_at(pos),
                    ..Default::default()
                });
            }
            (Some("context"), "name") => self.start_capture(Field::ContextName, depth),
            (Some("context"), "message") => {
                self.message = Some(MessageDraft {
                    line: self.line_at(pos),
                    numerus: attrs.get("numerus") == Some("yes"),
                    ..Default::default()
                });
            }
            (Some("message"), "location") => self.open_location(attrs, pos),
            (Some("message"), "source") => self.start_capture(Field::Source, depth),
            (Some("message"), "comment") => self.start_capture(Field::Comment, depth),
            (Some("message"), "extracomment") => self.start_capture(Field::ExtraComment, depth),
            (Some("message"), "translatorcomment") => {
                self.start_capture(Field::TranslatorComment, depth)
            }
            (Some("message"), "translation") => {
                let line = self.line_at(pos);
                if let Some(msg) = self.message.as_mut() {
                    let raw = attrs.get("type").unwrap_or_default();
                    match TranslationType::from_attr(raw) {
                        Some(t) => msg.translation_type = t,
                        None => msg.errors.push(format!(
                            "unknown translation type '{raw}' at line {line}"
                        )),
                    }
                    // Numerus text lives in <numerusform> children.
                    if msg.numerus {
                        msg.translation = Some(String::new());
                    }
                }
                if !self.message.as_ref().is_some_and(|m| m.numerus) {
                    self.start_capture(Field::Translation, depth);
                }
            }
            (Some("translation"), "numerusform") => {
                if self.message.as_ref().is_some_and(|m| m.numerus) {
                    self.start_capture(Field::NumerusForm, depth);
                }
            }
            // <byte value="x9"/> encodes a control character inside text.
            (_, "byte") if self.capture.is_some() => {
                if let Some(c) = attrs.get("value").and_then(parse_byte_value) {
                    self.buf.push(c);
                }
            }
            // Anything else (dependencies, oldsource, userdata, extra-*) is
            // carried by Qt tooling but irrelevant to lookups.
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, pos: usize) -> Result<(), LingoError> {
        let Some(name) = self.stack.pop() else {
            return Err(self.malformed(pos, "unexpected closing tag"));
        };
        let depth = self.stack.len();

        if let Some((field, at)) = self.capture {
            if at == depth {
                self.capture = None;
                let text = std::mem::take(&mut self.buf);
                self.store(field, text);
                return Ok(());
            }
        }

        match name.as_str() {
            "message" if self.stack.last().map(String::as_str) == Some("context") => {
                self.close_message()
            }
            "context" if depth == 1 => self.close_context(),
            _ => Ok(()),
        }
    }

    /// Text outside a captured field: whitespace anywhere, content only
    /// inside elements we don't interpret (`oldsource`, `userdata`, `extra-*`).
    fn handle_text(&mut self, text: &str, pos: usize) -> Result<(), LingoError> {
        if self.capture.is_some() {
            self.buf.push_str(text);
            return Ok(());
        }
        if text.trim().is_empty() {
            return Ok(());
        }
        let excerpt: String = text.trim().chars().take(24).collect();
        match self.stack.last().map(String::as_str) {
            None => Err(self.malformed(
                pos,
                &format!("text outside the root element: '{excerpt}'"),
            )),
            Some(parent @ ("TS" | "context" | "message")) => Err(self.malformed(
                pos,
                &format!("unexpected text in <{parent}>: '{excerpt}'"),
            )),
            Some(_) => Ok(()),
        }
    }

    /// All attributes of `e`, unescaped. A bad attribute is a markup error.
    fn attributes(&self, e: &BytesStart<'_>, pos: usize) -> Result<Attrs, LingoError> {
        let mut attrs = Vec::new();
        for a in e.attributes() {
            let a = a.map_err(|err| self.malformed(pos, &err.to_string()))?;
            let value = a
                .unescape_value()
                .map_err(|err| self.malformed(pos, &err.to_string()))?;
            attrs.push((
                String::from_utf8_lossy(a.key.as_ref()).into_owned(),
                value.into_owned(),
            ));
        }
        Ok(Attrs(attrs))
    }

    fn start_capture(&mut self, field: Field, depth: usize) {
        self.capture = Some((field, depth));
        self.buf.clear();
    }

    fn store(&mut self, field: Field, text: String) {
        if field == Field::ContextName {
            if let Some(ctx) = self.context.as_mut() {
                ctx.name = Some(text);
            }
            return;
        }
        let Some(msg) = self.message.as_mut() else {
            return;
        };
        match field {
            Field::Source => msg.source = Some(text),
            Field::Comment => msg.comment = Some(text),
            Field::ExtraComment => msg.extra_comment = Some(text),
            Field::TranslatorComment => msg.translator_comment = Some(text),
            Field::Translation => msg.translation = Some(text),
            Field::NumerusForm => msg.forms.push(text),
            Field::ContextName => {}
        }
    }

    fn open_location(&mut self, attrs: &Attrs, pos: usize) {
        let line_no = self.line_at(pos);
        let file = attrs
            .get("filename")
            .map(str::to_string)
            .or_else(|| self.last_file.clone());
        let Some(file) = file else {
            if let Some(msg) = self.message.as_mut() {
                msg.errors
                    .push(format!("<location> without filename at line {line_no}"));
            }
            return;
        };

        let line = match attrs.get("line") {
            None => Ok(None),
            Some(raw) => {
                let base = self.last_line.get(&file).copied().unwrap_or(0);
                resolve_line(raw, base)
                    .map(Some)
                    .ok_or_else(|| format!("invalid location line '{raw}' at line {line_no}"))
            }
        };

        match line {
            Ok(line) => {
                if let Some(l) = line {
                    self.last_line.insert(file.clone(), l);
                }
                self.last_file = Some(file.clone());
                if let Some(msg) = self.message.as_mut() {
                    msg.locations.push(Location { file, line });
                }
            }
            Err(err) => {
                if let Some(msg) = self.message.as_mut() {
                    msg.errors.push(err);
                }
            }
        }
    }

    fn close_message(&mut self) -> Result<(), LingoError> {
        let Some(draft) = self.message.take() else {
            return Ok(());
        };
        let line = draft.line;
        match draft.finish() {
            Ok(entry) => {
                if let Some(ctx) = self.context.as_mut() {
                    ctx.messages.push((line, entry));
                }
                Ok(())
            }
            Err(reason) => self.violation(reason),
        }
    }

    fn close_context(&mut self) -> Result<(), LingoError> {
        let Some(draft) = self.context.take() else {
            return Ok(());
        };
        let name = draft.name.unwrap_or_default();
        let mut context = match Context::new(name) {
            Ok(c) => c,
            Err(_) => {
                return self.violation(format!(
                    "context at line {} has no <name> ({} messages)",
                    draft.line,
                    draft.messages.len()
                ));
            }
        };

        for (line, entry) in draft.messages {
            if let Err(e) = context.insert(entry) {
                self.violation(format!("{} at line {line}", strip_kind(&e)))?;
            }
        }

        let pushed = match self.catalog.as_mut() {
            Some(catalog) => catalog.push_context(context),
            None => Ok(()),
        };
        if let Err(e) = pushed {
            self.violation(format!("{} at line {}", strip_kind(&e), draft.line))?;
        }
        Ok(())
    }

    /// Fail (strict) or record and continue (lenient).
    fn violation(&mut self, reason: String) -> Result<(), LingoError> {
        match self.policy {
            LoadPolicy::Strict => Err(LingoError::SchemaViolation(format!(
                "{}: {reason}",
                self.origin
            ))),
            LoadPolicy::Lenient => {
                warn!("{}: skipping: {reason}", self.origin);
                self.skipped.push(reason);
                Ok(())
            }
        }
    }

    fn malformed(&self, pos: usize, reason: &str) -> LingoError {
        LingoError::MalformedCatalog(format!(
            "{}: line {}: {reason}",
            self.origin,
            self.line_at(pos)
        ))
    }

    /// 1-based line number of a byte offset.
    fn line_at(&self, pos: usize) -> usize {
        let end = pos.min(self.text.len());
        let (from, line) = match self.line_cursor.get() {
            (from, line) if from <= end => (from, line),
            _ => (0, 1),
        };
        let line = line
            + self.text.as_bytes()[from..end]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
        self.line_cursor.set((end, line));
        line
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Unescaped attributes of one element, in document order.
struct Attrs(Vec<(String, String)>);

impl Attrs {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// `"24"` is absolute; `"+3"` / `"-2"` are relative to `base`.
fn resolve_line(raw: &str, base: u32) -> Option<u32> {
    let raw = raw.trim();
    if let Some(delta) = raw.strip_prefix('+') {
        base.checked_add(delta.parse().ok()?)
    } else if let Some(delta) = raw.strip_prefix('-') {
        base.checked_sub(delta.parse().ok()?)
    } else {
        raw.parse().ok()
    }
}

/// `<byte value="x9"/>` (hex) or `<byte value="9"/>` (decimal).
fn parse_byte_value(raw: &str) -> Option<char> {
    let code = match raw.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => raw.parse().ok()?,
    };
    char::from_u32(code)
}

/// Drop the "schema violation: " prefix so messages don't repeat it.
fn strip_kind(e: &LingoError) -> String {
    match e {
        LingoError::SchemaViolation(msg) => msg.clone(),
        other => other.to_string(),
    }
}
