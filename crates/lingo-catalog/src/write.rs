//! TS document writer.

use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;
use std::io::Write;

use lingo_core::error::LingoError;

use crate::catalog::Catalog;
use crate::model::{Context, MessageEntry};

fn xml_err<E: Display>(e: E) -> LingoError {
    LingoError::Io(std::io::Error::other(format!("failed to write TS: {e}")))
}

impl Catalog {
    /// Serialize as a TS 2.1 document. Location lines are written absolute.
    pub fn to_ts_string(&self) -> Result<String, LingoError> {
        let mut out = Vec::new();
        self.write_ts(&mut out)?;
        String::from_utf8(out).map_err(xml_err)
    }

    /// Serialize as a TS document into `sink`.
    pub fn write_ts<W: Write>(&self, sink: W) -> Result<(), LingoError> {
        let mut writer = Writer::new_with_indent(sink, b' ', 4);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_err)?;
        writer
            .write_event(Event::DocType(BytesText::from_escaped("TS")))
            .map_err(xml_err)?;

        let mut root = BytesStart::new("TS");
        root.push_attribute(("version", self.version()));
        root.push_attribute(("language", self.language()));
        if let Some(src) = self.source_language() {
            root.push_attribute(("sourcelanguage", src));
        }
        writer.write_event(Event::Start(root)).map_err(xml_err)?;

        for context in self.contexts() {
            write_context(&mut writer, context)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("TS")))
            .map_err(xml_err)?;
        writer.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

fn write_context<W: Write>(writer: &mut Writer<W>, context: &Context) -> Result<(), LingoError> {
    writer
        .write_event(Event::Start(BytesStart::new("context")))
        .map_err(xml_err)?;
    write_text(writer, BytesStart::new("name"), context.name())?;
    for message in context.messages() {
        write_message(writer, message)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("context")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_message<W: Write>(writer: &mut Writer<W>, m: &MessageEntry) -> Result<(), LingoError> {
    let mut start = BytesStart::new("message");
    start.push_attribute(("encoding", "utf-8"));
    if m.numerus {
        start.push_attribute(("numerus", "yes"));
    }
    writer.write_event(Event::Start(start)).map_err(xml_err)?;

    for loc in &m.locations {
        let mut el = BytesStart::new("location");
        el.push_attribute(("filename", loc.file.as_str()));
        if let Some(line) = loc.line {
            el.push_attribute(("line", line.to_string().as_str()));
        }
        writer.write_event(Event::Empty(el)).map_err(xml_err)?;
    }

    write_text(writer, BytesStart::new("source"), &m.source_text)?;
    if let Some(c) = &m.disambiguation_comment {
        write_text(writer, BytesStart::new("comment"), c)?;
    }
    if let Some(c) = &m.extra_comment {
        write_text(writer, BytesStart::new("extracomment"), c)?;
    }
    if let Some(c) = &m.translator_comment {
        write_text(writer, BytesStart::new("translatorcomment"), c)?;
    }

    let mut translation = BytesStart::new("translation");
    if let Some(t) = m.translation_type.as_attr() {
        translation.push_attribute(("type", t));
    }
    if m.numerus && !m.numerus_forms.is_empty() {
        writer
            .write_event(Event::Start(translation))
            .map_err(xml_err)?;
        for form in &m.numerus_forms {
            write_text(writer, BytesStart::new("numerusform"), form)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("translation")))
            .map_err(xml_err)?;
    } else {
        write_text(writer, translation, &m.translation_text)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("message")))
        .map_err(xml_err)?;
    Ok(())
}

/// `<el>text</el>`, or `<el/>` when empty so indentation never leaks into the value.
fn write_text<W: Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), LingoError> {
    if text.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_err);
    }
    let end = BytesEnd::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    // One text event: an element event here would let the indenter break the line.
    let content = escape_text(text);
    writer
        .write_event(Event::Text(BytesText::from_escaped(content.as_str())))
        .map_err(xml_err)?;
    writer.write_event(Event::End(end)).map_err(xml_err)?;
    Ok(())
}

/// Escape `text` for element content. Control characters XML 1.0 cannot
/// carry become `<byte value="xN"/>`, as lupdate writes them.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0;
    for (i, c) in text.char_indices() {
        if c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r') {
            out.push_str(&escape(&text[run..i]));
            out.push_str(&format!("<byte value=\"x{:x}\"/>", c as u32));
            run = i + c.len_utf8();
        }
    }
    out.push_str(&escape(&text[run..]));
    out
}
