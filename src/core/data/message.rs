//! Message model shared by extraction, interchange formats and code generation.
//!
//! A [`Message`] is what crosses the boundary to translators; a
//! [`ProgramMessage`] is the canonical, source-locale version of a message with
//! everything we learned about it while walking the program.

use std::collections::HashMap;

use super::source::SourceContext;

/// An opaque fragment (a markup tag or an expression reference such as `${name}`)
/// that translators may move around but never edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    pub untranslatable: String,
}

impl Placeholder {
    pub fn new(untranslatable: impl Into<String>) -> Self {
        Self {
            untranslatable: untranslatable.into(),
        }
    }
}

/// One segment of a message: translatable text or an untranslatable placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Content {
    Text(String),
    Placeholder(Placeholder),
}

impl Content {
    pub fn text(value: impl Into<String>) -> Self {
        Content::Text(value.into())
    }

    pub fn placeholder(value: impl Into<String>) -> Self {
        Content::Placeholder(Placeholder::new(value))
    }

    /// The literal text this segment contributes to the stitched template.
    pub fn as_str(&self) -> &str {
        match self {
            Content::Text(text) => text,
            Content::Placeholder(ph) => &ph.untranslatable,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Content::Placeholder(_))
    }
}

/// A translatable unit: a stable name plus ordered contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub contents: Vec<Content>,
}

impl Message {
    pub fn new(name: impl Into<String>, contents: Vec<Content>) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }

    /// Concatenate all segment texts, placeholders included.
    pub fn stitched(&self) -> String {
        self.contents.iter().map(Content::as_str).collect()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.contents.iter().filter_map(|c| match c {
            Content::Placeholder(ph) => Some(ph),
            Content::Text(_) => None,
        })
    }
}

/// A message extracted from the program, in the source locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramMessage {
    pub message: Message,
    /// Where the `msg()` call was found.
    pub context: SourceContext,
    /// Description annotations in effect at the call, outermost first.
    pub desc_stack: Vec<String>,
    /// Parameter names, in order, when the arrow-function form was used.
    pub params: Option<Vec<String>>,
    /// Whether the contents must be wrapped in the `html` tag on output.
    pub is_template: bool,
}

impl ProgramMessage {
    pub fn name(&self) -> &str {
        &self.message.name
    }

    pub fn contents(&self) -> &[Content] {
        &self.message.contents
    }

    /// Description as written to interchange files.
    pub fn desc(&self) -> Option<String> {
        if self.desc_stack.is_empty() {
            None
        } else {
            Some(self.desc_stack.join(" / "))
        }
    }
}

/// A locale plus its translated messages, the unit read from interchange files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub locale: String,
    pub messages: Vec<Message>,
}

/// Translations for all target locales, keyed by locale code.
pub type TranslationMap = HashMap<String, Vec<Message>>;

/// Index messages by name. Later entries with the same name win.
pub fn make_message_map<'a, T, F>(messages: &'a [T], name: F) -> HashMap<&'a str, &'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    messages.iter().map(|m| (name(m), m)).collect()
}

/// Order messages for interchange output: by description, then by file.
///
/// The sort is stable, so messages from the same file keep their source order.
pub fn sort_program_messages(messages: &mut [ProgramMessage]) {
    messages.sort_by(|a, b| {
        let a_desc = a.desc().unwrap_or_default();
        let b_desc = b.desc().unwrap_or_default();
        a_desc
            .cmp(&b_desc)
            .then_with(|| a.context.file_path().cmp(b.context.file_path()))
    });
}
