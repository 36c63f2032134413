//! XLIFF 1.2: one `<locale>.xlf` document per target locale.
//!
//! Each `<trans-unit>` carries the source text and, once translated, a
//! `<target>`. Re-running extraction keeps existing targets in place.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use quick_xml::{
    Reader, Writer,
    events::{BytesEnd, BytesStart, Event},
};

use super::Formatter;
use super::xml::{
    describe, indent, new_document, push_text, read_placeholder_text, required_attribute, save,
    text,
};
use crate::config::PlaceholderStyle;
use crate::core::data::{Bundle, Content, Message, ProgramMessage, TranslationMap};

const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";

pub struct XliffFormatter {
    source_locale: String,
    target_locales: Vec<String>,
    xliff_dir: PathBuf,
    placeholder_style: PlaceholderStyle,
}

impl XliffFormatter {
    pub fn new(
        source_locale: &str,
        target_locales: &[String],
        xliff_dir: &Path,
        placeholder_style: PlaceholderStyle,
    ) -> Self {
        Self {
            source_locale: source_locale.to_string(),
            target_locales: target_locales.to_vec(),
            xliff_dir: xliff_dir.to_path_buf(),
            placeholder_style,
        }
    }

    fn locale_path(&self, locale: &str) -> PathBuf {
        self.xliff_dir.join(format!("{locale}.xlf"))
    }

    fn encode_locale(
        &self,
        source: &[ProgramMessage],
        locale: &str,
        translations: &[Message],
    ) -> Result<Writer<Vec<u8>>> {
        let mut writer = new_document()?;
        indent(&mut writer, 0)?;

        let mut xliff = BytesStart::new("xliff");
        xliff.push_attribute(("version", "1.2"));
        xliff.push_attribute(("xmlns", XLIFF_NAMESPACE));
        writer.write_event(Event::Start(xliff))?;
        indent(&mut writer, 0)?;

        let mut file = BytesStart::new("file");
        file.push_attribute(("target-language", locale));
        file.push_attribute(("source-language", self.source_locale.as_str()));
        file.push_attribute(("original", "lit-localize-inputs"));
        file.push_attribute(("datatype", "plaintext"));
        writer.write_event(Event::Start(file))?;
        indent(&mut writer, 0)?;
        writer.write_event(Event::Start(BytesStart::new("body")))?;
        indent(&mut writer, 0)?;

        for message in source {
            let mut unit = BytesStart::new("trans-unit");
            unit.push_attribute(("id", message.name()));
            writer.write_event(Event::Start(unit))?;

            indent(&mut writer, 1)?;
            writer.write_event(Event::Start(BytesStart::new("source")))?;
            self.encode_contents(&mut writer, message.contents())?;
            writer.write_event(Event::End(BytesEnd::new("source")))?;

            // First translation of a repeated name wins.
            if let Some(translation) = translations.iter().find(|t| t.name == message.name()) {
                indent(&mut writer, 1)?;
                writer.write_event(Event::Start(BytesStart::new("target")))?;
                self.encode_contents(&mut writer, &translation.contents)?;
                writer.write_event(Event::End(BytesEnd::new("target")))?;
            }

            if let Some(desc) = message.desc() {
                indent(&mut writer, 1)?;
                writer.write_event(Event::Start(BytesStart::new("note")))?;
                text(&mut writer, &desc)?;
                writer.write_event(Event::End(BytesEnd::new("note")))?;
            }

            indent(&mut writer, 0)?;
            writer.write_event(Event::End(BytesEnd::new("trans-unit")))?;
            indent(&mut writer, 0)?;
        }

        writer.write_event(Event::End(BytesEnd::new("body")))?;
        indent(&mut writer, 0)?;
        writer.write_event(Event::End(BytesEnd::new("file")))?;
        indent(&mut writer, 0)?;
        writer.write_event(Event::End(BytesEnd::new("xliff")))?;
        indent(&mut writer, 0)?;
        Ok(writer)
    }

    /// Placeholder ids restart at 0 within each `<source>` and `<target>`.
    fn encode_contents(&self, writer: &mut Writer<Vec<u8>>, contents: &[Content]) -> Result<()> {
        let mut index = 0;
        for content in contents {
            let ph = match content {
                Content::Text(value) => {
                    text(writer, value)?;
                    continue;
                }
                Content::Placeholder(ph) => ph,
            };
            let id = index.to_string();
            index += 1;
            match self.placeholder_style {
                PlaceholderStyle::X => {
                    let mut x = BytesStart::new("x");
                    x.push_attribute(("id", id.as_str()));
                    x.push_attribute(("equiv-text", ph.untranslatable.as_str()));
                    writer.write_event(Event::Empty(x))?;
                }
                PlaceholderStyle::Ph => {
                    let mut start = BytesStart::new("ph");
                    start.push_attribute(("id", id.as_str()));
                    writer.write_event(Event::Start(start))?;
                    text(writer, &ph.untranslatable)?;
                    writer.write_event(Event::End(BytesEnd::new("ph")))?;
                }
            }
        }
        Ok(())
    }
}

impl Formatter for XliffFormatter {
    fn read_translations(&self) -> Result<Vec<Bundle>> {
        let mut bundles = Vec::new();
        for locale in &self.target_locales {
            let path = self.locale_path(locale);
            let xml = match fs::read_to_string(&path) {
                Ok(xml) => xml,
                // Nothing translated for this locale yet.
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to read {}", path.display()));
                }
            };
            let bundle = parse_xliff(&xml)
                .with_context(|| format!("Failed to parse XLIFF file {}", path.display()))?;
            bundles.push(bundle);
        }
        Ok(bundles)
    }

    fn write_output(&self, source: &[ProgramMessage], translations: &TranslationMap) -> Result<()> {
        for locale in &self.target_locales {
            let existing = translations.get(locale).map(Vec::as_slice).unwrap_or_default();
            let xml = self.encode_locale(source, locale, existing)?;
            save(xml, &self.locale_path(locale))?;
        }
        Ok(())
    }
}

fn parse_xliff(xml: &str) -> Result<Bundle> {
    let mut reader = Reader::from_str(xml);
    let mut locale: Option<String> = None;
    let mut messages = Vec::new();

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"file" => {
                    if locale.is_some() {
                        bail!("Expected exactly one <file>");
                    }
                    locale = Some(required_attribute(e, "target-language")?);
                }
                b"trans-unit" => {
                    let name = required_attribute(e, "id")?;
                    if matches!(event, Event::Start(_))
                        && let Some(contents) = read_trans_unit(&mut reader)?
                    {
                        messages.push(Message::new(name, contents));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let Some(locale) = locale else {
        bail!("Expected exactly one <file>");
    };
    Ok(Bundle { locale, messages })
}

/// Contents of the unit's `<target>`, or `None` when it has not been
/// translated yet.
fn read_trans_unit(reader: &mut Reader<&[u8]>) -> Result<Option<Vec<Content>>> {
    let mut target: Option<Vec<Content>> = None;
    let mut target_count = 0;
    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) if e.name().as_ref() == b"target" => {
                target_count += 1;
                target = Some(read_target_contents(reader)?);
            }
            Event::Empty(e) if e.name().as_ref() == b"target" => {
                target_count += 1;
                target = Some(Vec::new());
            }
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            }
            Event::End(e) if e.name().as_ref() == b"trans-unit" => break,
            Event::Eof => bail!("Unexpected end of document in <trans-unit>"),
            _ => {}
        }
    }
    if target_count > 1 {
        bail!("Expected 0 or 1 <target> in <trans-unit>, got {}", target_count);
    }
    Ok(target)
}

fn read_target_contents(reader: &mut Reader<&[u8]>) -> Result<Vec<Content>> {
    let mut contents = Vec::new();
    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Text(t) => push_text(&mut contents, &t.unescape()?),
            Event::CData(c) => push_text(&mut contents, &c.decode()?),
            Event::Empty(e) if e.name().as_ref() == b"x" => {
                required_attribute(e, "id")?;
                contents.push(Content::placeholder(required_attribute(e, "equiv-text")?));
            }
            Event::Start(e) if e.name().as_ref() == b"x" => {
                required_attribute(e, "id")?;
                contents.push(Content::placeholder(required_attribute(e, "equiv-text")?));
                reader.read_to_end(e.name())?;
            }
            Event::Start(e) if e.name().as_ref() == b"ph" => {
                required_attribute(e, "id")?;
                contents.push(Content::placeholder(read_placeholder_text(reader, "ph")?));
            }
            Event::End(e) if e.name().as_ref() == b"target" => break,
            Event::Comment(_) => {}
            Event::Eof => bail!("Unexpected end of document in <target>"),
            other => bail!("Unexpected node in <trans-unit>: {}", describe(other)),
        }
    }
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::core::data::{SourceContext, SourceLocation};

    fn program_message(name: &str, contents: Vec<Content>, desc: &[&str]) -> ProgramMessage {
        ProgramMessage {
            message: Message::new(name, contents),
            context: SourceContext::new(SourceLocation::new("src/app.ts", 1, 1), ""),
            desc_stack: desc.iter().map(|d| d.to_string()).collect(),
            params: None,
            is_template: true,
        }
    }

    fn source_messages() -> Vec<ProgramMessage> {
        vec![
            program_message(
                "bold",
                vec![
                    Content::text("Hello "),
                    Content::placeholder("<b>"),
                    Content::text("World"),
                    Content::placeholder("</b>"),
                ],
                &["Greeting"],
            ),
            program_message("plain", vec![Content::text("Bye")], &[]),
        ]
    }

    fn formatter(dir: &Path, style: PlaceholderStyle) -> XliffFormatter {
        XliffFormatter::new("en", &["es".to_string(), "de".to_string()], dir, style)
    }

    #[test]
    fn test_write_with_x_placeholders() {
        let dir = tempdir().unwrap();
        let translations = TranslationMap::from([(
            "es".to_string(),
            vec![Message::new(
                "bold",
                vec![
                    Content::text("Hola "),
                    Content::placeholder("<b>"),
                    Content::text("Mundo"),
                    Content::placeholder("</b>"),
                ],
            )],
        )]);
        formatter(dir.path(), PlaceholderStyle::X)
            .write_output(&source_messages(), &translations)
            .unwrap();

        let es = fs::read_to_string(dir.path().join("es.xlf")).unwrap();
        assert_eq!(
            es,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
<file target-language="es" source-language="en" original="lit-localize-inputs" datatype="plaintext">
<body>
<trans-unit id="bold">
  <source>Hello <x id="0" equiv-text="&lt;b&gt;"/>World<x id="1" equiv-text="&lt;/b&gt;"/></source>
  <target>Hola <x id="0" equiv-text="&lt;b&gt;"/>Mundo<x id="1" equiv-text="&lt;/b&gt;"/></target>
  <note>Greeting</note>
</trans-unit>
<trans-unit id="plain">
  <source>Bye</source>
</trans-unit>
</body>
</file>
</xliff>
"#
        );
        assert!(dir.path().join("de.xlf").exists());
    }

    #[test]
    fn test_write_with_ph_placeholders() {
        let dir = tempdir().unwrap();
        formatter(dir.path(), PlaceholderStyle::Ph)
            .write_output(&source_messages(), &TranslationMap::new())
            .unwrap();

        let de = fs::read_to_string(dir.path().join("de.xlf")).unwrap();
        assert!(de.contains(
            "<source>Hello <ph id=\"0\">&lt;b&gt;</ph>World<ph id=\"1\">&lt;/b&gt;</ph></source>"
        ));
        assert!(!de.contains("<target>"));
    }

    #[test]
    fn test_read_targets() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("es.xlf"),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
<file target-language="es" source-language="en" original="lit-localize-inputs" datatype="plaintext">
<body>
<trans-unit id="bold">
  <source>Hello <x id="0" equiv-text="&lt;b&gt;"/>World<x id="1" equiv-text="&lt;/b&gt;"/></source>
  <target>Hola <x id="0" equiv-text="&lt;b&gt;"/>Mundo<ph id="1">&lt;/b&gt;</ph></target>
  <note>Greeting</note>
</trans-unit>
<trans-unit id="plain">
  <source>Bye</source>
</trans-unit>
</body>
</file>
</xliff>"#,
        )
        .unwrap();

        // de.xlf does not exist yet.
        let bundles = formatter(dir.path(), PlaceholderStyle::X)
            .read_translations()
            .unwrap();
        assert_eq!(
            bundles,
            vec![Bundle {
                locale: "es".to_string(),
                messages: vec![Message::new(
                    "bold",
                    vec![
                        Content::text("Hola "),
                        Content::placeholder("<b>"),
                        Content::text("Mundo"),
                        Content::placeholder("</b>"),
                    ],
                )],
            }]
        );
    }

    #[test]
    fn test_two_targets_is_error() {
        let err = parse_xliff(
            r#"<xliff><file target-language="es"><body>
<trans-unit id="a"><source>A</source><target>B</target><target>C</target></trans-unit>
</body></file></xliff>"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected 0 or 1 <target> in <trans-unit>, got 2"
        );
    }

    #[test]
    fn test_missing_target_language_is_error() {
        let err = parse_xliff(r#"<xliff><file><body/></file></xliff>"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected <file> to have a non-empty target-language attribute"
        );
    }

    #[test]
    fn test_malformed_file_names_path() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("es.xlf"),
            r#"<xliff><file target-language="es"><body><trans-unit id="a"><target>x<g>y</g></target></trans-unit></body></file></xliff>"#,
        )
        .unwrap();
        let err = formatter(dir.path(), PlaceholderStyle::X)
            .read_translations()
            .unwrap_err();
        assert!(err.to_string().contains("es.xlf"));
        assert_eq!(
            err.root_cause().to_string(),
            "Unexpected node in <trans-unit>: <g>"
        );
    }
}
