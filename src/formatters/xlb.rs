//! XLB: `<localizationbundle>` documents with `<msg>` entries.
//!
//! Extraction writes one bundle in the source locale. Translators hand back
//! one bundle per locale; all files matching the configured glob are read.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::glob;
use quick_xml::{
    Reader,
    events::{BytesEnd, BytesStart, Event},
};

use super::Formatter;
use super::xml::{
    describe, indent, new_document, push_text, read_placeholder_text, required_attribute, save,
    text,
};
use crate::core::data::{Bundle, Content, Message, ProgramMessage, TranslationMap};

pub struct XlbFormatter {
    source_locale: String,
    root_dir: PathBuf,
    output_file: PathBuf,
    translations_glob: String,
}

impl XlbFormatter {
    pub fn new(source_locale: &str, root_dir: &Path, output_file: &str, translations_glob: &str) -> Self {
        Self {
            source_locale: source_locale.to_string(),
            root_dir: root_dir.to_path_buf(),
            output_file: root_dir.join(output_file),
            translations_glob: translations_glob.to_string(),
        }
    }
}

impl Formatter for XlbFormatter {
    fn read_translations(&self) -> Result<Vec<Bundle>> {
        let pattern = self.root_dir.join(&self.translations_glob);
        let entries = glob(&pattern.to_string_lossy())
            .with_context(|| format!("Invalid translationsGlob: {}", self.translations_glob))?;

        let mut bundles = Vec::new();
        for entry in entries {
            let path = entry?;
            let xml = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let bundle = parse_xlb(&xml)
                .with_context(|| format!("Failed to parse XLB file {}", path.display()))?;
            bundles.push(bundle);
        }
        Ok(bundles)
    }

    fn write_output(&self, source: &[ProgramMessage], _translations: &TranslationMap) -> Result<()> {
        let xml = encode_xlb(&self.source_locale, source)?;
        save(xml, &self.output_file)
    }
}

fn encode_xlb(
    source_locale: &str,
    messages: &[ProgramMessage],
) -> Result<quick_xml::Writer<Vec<u8>>> {
    let mut writer = new_document()?;
    indent(&mut writer, 0)?;

    let mut bundle = BytesStart::new("localizationbundle");
    bundle.push_attribute(("locale", source_locale));
    writer.write_event(Event::Start(bundle))?;
    indent(&mut writer, 1)?;
    writer.write_event(Event::Start(BytesStart::new("messages")))?;

    for message in messages {
        let mut msg = BytesStart::new("msg");
        msg.push_attribute(("name", message.name()));
        let desc = message.desc();
        if let Some(desc) = desc.as_deref() {
            msg.push_attribute(("desc", desc));
        }
        indent(&mut writer, 2)?;
        writer.write_event(Event::Start(msg))?;

        let mut index = 0;
        for content in message.contents() {
            match content {
                Content::Text(value) => text(&mut writer, value)?,
                Content::Placeholder(ph) => {
                    let mut start = BytesStart::new("ph");
                    start.push_attribute(("name", index.to_string().as_str()));
                    index += 1;
                    writer.write_event(Event::Start(start))?;
                    text(&mut writer, &ph.untranslatable)?;
                    writer.write_event(Event::End(BytesEnd::new("ph")))?;
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new("msg")))?;
    }

    indent(&mut writer, 1)?;
    writer.write_event(Event::End(BytesEnd::new("messages")))?;
    indent(&mut writer, 0)?;
    writer.write_event(Event::End(BytesEnd::new("localizationbundle")))?;
    indent(&mut writer, 0)?;
    Ok(writer)
}

fn parse_xlb(xml: &str) -> Result<Bundle> {
    let mut reader = Reader::from_str(xml);
    let mut locale: Option<String> = None;
    let mut messages = Vec::new();

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"localizationbundle" => {
                    if locale.is_some() {
                        bail!("Expected exactly one <localizationbundle>");
                    }
                    locale = Some(required_attribute(e, "locale")?);
                }
                b"msg" => {
                    let name = required_attribute(e, "name")?;
                    let contents = if matches!(event, Event::Start(_)) {
                        read_msg_contents(&mut reader)?
                    } else {
                        Vec::new()
                    };
                    messages.push(Message::new(name, contents));
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let Some(locale) = locale else {
        bail!("Expected exactly one <localizationbundle>");
    };
    Ok(Bundle { locale, messages })
}

fn read_msg_contents(reader: &mut Reader<&[u8]>) -> Result<Vec<Content>> {
    let mut contents = Vec::new();
    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Text(t) => push_text(&mut contents, &t.unescape()?),
            Event::CData(c) => push_text(&mut contents, &c.decode()?),
            Event::Start(e) if e.name().as_ref() == b"ph" => {
                contents.push(Content::placeholder(read_placeholder_text(reader, "ph")?));
            }
            Event::End(e) if e.name().as_ref() == b"msg" => break,
            Event::Comment(_) => {}
            Event::Eof => bail!("Unexpected end of document in <msg>"),
            other => bail!("Unexpected node in <msg>: {}", describe(other)),
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
            is_template: false,
        }
    }

    #[test]
    fn test_write_source_bundle() {
        let dir = tempdir().unwrap();
        let formatter = XlbFormatter::new("en", dir.path(), "data/localization/en.xlb", "xlb/*.xlb");
        let messages = vec![
            program_message("greeting", vec![Content::text("Hello & welcome")], &[]),
            program_message(
                "bold",
                vec![
                    Content::text("Hi "),
                    Content::placeholder("<b>"),
                    Content::text("there"),
                    Content::placeholder("</b>"),
                ],
                &["Home page", "Header"],
            ),
        ];
        formatter
            .write_output(&messages, &TranslationMap::new())
            .unwrap();

        let written = fs::read_to_string(dir.path().join("data/localization/en.xlb")).unwrap();
        assert_eq!(
            written,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<localizationbundle locale="en">
  <messages>
    <msg name="greeting">Hello &amp; welcome</msg>
    <msg name="bold" desc="Home page / Header">Hi <ph name="0">&lt;b&gt;</ph>there<ph name="1">&lt;/b&gt;</ph></msg>
  </messages>
</localizationbundle>
"#
        );
    }

    #[test]
    fn test_read_bundles_matching_glob() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("xlb")).unwrap();
        fs::write(
            dir.path().join("xlb/es.xlb"),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<localizationbundle locale="es">
  <messages>
    <msg name="bold">Hola <ph name="0">&lt;b&gt;</ph>a todos<ph name="1">&lt;/b&gt;</ph></msg>
    <msg name="empty"/>
  </messages>
</localizationbundle>"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("xlb/de.xlb"),
            r#"<localizationbundle locale="de"><messages><msg name="greeting">Hallo</msg></messages></localizationbundle>"#,
        )
        .unwrap();
        fs::write(dir.path().join("xlb/notes.txt"), "ignored").unwrap();

        let formatter = XlbFormatter::new("en", dir.path(), "en.xlb", "xlb/*.xlb");
        let bundles = formatter.read_translations().unwrap();
        assert_eq!(
            bundles,
            vec![
                Bundle {
                    locale: "de".to_string(),
                    messages: vec![Message::new("greeting", vec![Content::text("Hallo")])],
                },
                Bundle {
                    locale: "es".to_string(),
                    messages: vec![
                        Message::new(
                            "bold",
                            vec![
                                Content::text("Hola "),
                                Content::placeholder("<b>"),
                                Content::text("a todos"),
                                Content::placeholder("</b>"),
                            ]
                        ),
                        Message::new("empty", vec![]),
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_missing_locale_is_error() {
        let err = parse_xlb(r#"<localizationbundle><messages/></localizationbundle>"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected <localizationbundle> to have a non-empty locale attribute"
        );
    }

    #[test]
    fn test_unexpected_element_in_msg() {
        let err = parse_xlb(
            r#"<localizationbundle locale="es"><messages><msg name="a">x<b>y</b></msg></messages></localizationbundle>"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Unexpected node in <msg>: <b>");
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.xlb"), "<msg name=\"a\">").unwrap();
        let formatter = XlbFormatter::new("en", dir.path(), "en.xlb", "*.xlb");
        let err = formatter.read_translations().unwrap_err();
        assert!(err.to_string().contains("bad.xlb"));
    }
}
