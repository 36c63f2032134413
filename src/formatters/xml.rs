use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesStart, BytesText, Event},
};

use crate::core::data::Content;

/// Value of `name` on `element`, unescaped.
pub(super) fn attribute(element: &BytesStart, name: &str) -> Result<Option<String>> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

pub(super) fn required_attribute(element: &BytesStart, name: &str) -> Result<String> {
    match attribute(element, name)? {
        Some(value) if !value.is_empty() => Ok(value),
        _ => bail!(
            "Expected <{}> to have a non-empty {} attribute",
            tag_name(element),
            name
        ),
    }
}

pub(super) fn tag_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

/// Short description of an event for error messages.
pub(super) fn describe(event: &Event) -> String {
    match event {
        Event::Start(e) | Event::Empty(e) => format!("<{}>", tag_name(e)),
        Event::End(e) => format!("</{}>", String::from_utf8_lossy(e.name().as_ref())),
        Event::PI(_) => "processing instruction".to_string(),
        Event::DocType(_) => "doctype".to_string(),
        _ => "node".to_string(),
    }
}

/// Append text, merging with a preceding text segment.
pub(super) fn push_text(contents: &mut Vec<Content>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Content::Text(last)) = contents.last_mut() {
        last.push_str(text);
    } else {
        contents.push(Content::text(text));
    }
}

/// Read the body of a placeholder element whose start tag was just consumed.
/// The body must be exactly one text node.
pub(super) fn read_placeholder_text(reader: &mut Reader<&[u8]>, tag: &str) -> Result<String> {
    let mut text: Option<String> = None;
    let mut nodes = 0;
    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Text(t) => {
                nodes += 1;
                text = Some(t.unescape()?.into_owned());
            }
            Event::CData(c) => {
                nodes += 1;
                text = Some(c.decode()?.into_owned());
            }
            Event::End(e) if e.name().as_ref() == tag.as_bytes() => break,
            Event::Eof => bail!("Unexpected end of document in <{}>", tag),
            _ => nodes += 2,
        }
    }
    match text {
        Some(text) if nodes == 1 => Ok(text),
        _ => Err(anyhow!("Expected <{}> to have exactly one text node", tag)),
    }
}

/// A writer positioned after the XML declaration.
pub(super) fn new_document() -> Result<Writer<Vec<u8>>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(writer)
}

/// Newline followed by `level` two-space indents.
pub(super) fn indent(writer: &mut Writer<Vec<u8>>, level: usize) -> Result<()> {
    let whitespace = format!("\n{}", "  ".repeat(level));
    writer.write_event(Event::Text(BytesText::from_escaped(whitespace)))?;
    Ok(())
}

/// Text content; only `<`, `>` and `&` are escaped.
pub(super) fn text(writer: &mut Writer<Vec<u8>>, value: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(value))))?;
    Ok(())
}

/// Write a finished document to `path`, creating parent directories.
pub(super) fn save(writer: Writer<Vec<u8>>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory: {}", parent.display()))?;
    }
    fs::write(path, writer.into_inner())
        .with_context(|| format!("Error writing file: {}", path.display()))
}
