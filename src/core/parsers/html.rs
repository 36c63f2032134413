//! Best-effort HTML fragment parser for template text.
//!
//! Only structure matters here: which slices of the input are tags and which
//! are text. Tag nodes keep the exact source slice they came from, so walking
//! the tree and concatenating every slice reproduces the input byte-for-byte.
//! Entities are never decoded.

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Text(String),
    /// Comments, `<!...>` declarations and end tags with no open element.
    Markup(String),
    Element(HtmlElement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlElement {
    /// Lowercased tag name.
    pub name: String,
    /// Source slice of the start tag, attributes included.
    pub open_tag: String,
    /// Source slice of the end tag; empty for void, self-closing or
    /// implicitly closed elements.
    pub close_tag: String,
    pub children: Vec<HtmlNode>,
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Comment(&'a str),
    StartTag {
        name: String,
        raw: &'a str,
        self_closing: bool,
    },
    EndTag {
        name: String,
        raw: &'a str,
    },
}

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Parse a fragment of HTML into a tree.
pub fn parse_fragment(input: &str) -> Vec<HtmlNode> {
    TreeBuilder::default().build(tokenize(input))
}

/// Concatenate the source slices of a parsed tree.
pub fn serialize(nodes: &[HtmlNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            HtmlNode::Text(text) | HtmlNode::Markup(text) => out.push_str(text),
            HtmlNode::Element(el) => {
                out.push_str(&el.open_tag);
                out.push_str(&serialize(&el.children));
                out.push_str(&el.close_tag);
            }
        }
    }
    out
}

// ============================================================
// Tokenizer
// ============================================================

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }
        let Some((token, end)) = lex_markup(input, pos) else {
            pos += 1;
            continue;
        };
        if text_start < pos {
            tokens.push(Token::Text(&input[text_start..pos]));
        }

        let raw_text_name = match &token {
            Token::StartTag {
                name,
                self_closing: false,
                ..
            } if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => Some(name.clone()),
            _ => None,
        };
        tokens.push(token);
        pos = end;

        if let Some(name) = raw_text_name {
            let close_at = find_end_tag(input, pos, &name).unwrap_or(bytes.len());
            if close_at > pos {
                tokens.push(Token::Text(&input[pos..close_at]));
            }
            pos = close_at;
        }
        text_start = pos;
    }

    if text_start < bytes.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

/// Try to lex a tag, comment or declaration starting at `start` (a `<`).
/// Returns `None` when the `<` is just text.
fn lex_markup(input: &str, start: usize) -> Option<(Token<'_>, usize)> {
    let rest = &input[start..];
    let bytes = rest.as_bytes();

    if rest.starts_with("<!--") {
        let end = rest[4..]
            .find("-->")
            .map(|i| start + 4 + i + 3)
            .unwrap_or(input.len());
        return Some((Token::Comment(&input[start..end]), end));
    }

    if rest.starts_with("</") {
        if !bytes.get(2).is_some_and(u8::is_ascii_alphabetic) {
            return None;
        }
        let close = rest.find('>')?;
        let name = read_tag_name(&rest[2..]);
        let end = start + close + 1;
        return Some((
            Token::EndTag {
                name,
                raw: &input[start..end],
            },
            end,
        ));
    }

    if rest.starts_with("<!") || rest.starts_with("<?") {
        let end = rest.find('>').map(|i| start + i + 1).unwrap_or(input.len());
        return Some((Token::Comment(&input[start..end]), end));
    }

    if !bytes.get(1).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }

    let name = read_tag_name(&rest[1..]);
    let close = find_tag_close(bytes, 1 + name.len())?;
    let end = start + close + 1;
    let self_closing = close > 0 && bytes[close - 1] == b'/';
    Some((
        Token::StartTag {
            name,
            raw: &input[start..end],
            self_closing,
        },
        end,
    ))
}

/// Lowercased tag name at the start of `s`.
fn read_tag_name(s: &str) -> String {
    s.chars()
        .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Index of the `>` ending a start tag, skipping quoted attribute values.
fn find_tag_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    let mut after_eq = false;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i),
            b'=' => after_eq = true,
            quote @ (b'"' | b'\'') if after_eq => {
                let len = bytes[i + 1..].iter().position(|b| *b == quote)?;
                i += len + 1;
                after_eq = false;
            }
            b if b.is_ascii_whitespace() => {}
            _ => after_eq = false,
        }
        i += 1;
    }
    None
}

/// Position of `</name` (case-insensitive) at or after `from`.
fn find_end_tag(input: &str, from: usize, name: &str) -> Option<usize> {
    let haystack = input[from..].to_ascii_lowercase();
    let needle = format!("</{}", name);
    haystack.find(&needle).map(|i| from + i)
}

// ============================================================
// Tree construction
// ============================================================

struct OpenElement {
    name: String,
    open_tag: String,
    children: Vec<HtmlNode>,
}

impl OpenElement {
    fn close(self, close_tag: &str) -> HtmlNode {
        HtmlNode::Element(HtmlElement {
            name: self.name,
            open_tag: self.open_tag,
            close_tag: close_tag.to_string(),
            children: self.children,
        })
    }
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<OpenElement>,
    root: Vec<HtmlNode>,
}

impl TreeBuilder {
    fn build(mut self, tokens: Vec<Token<'_>>) -> Vec<HtmlNode> {
        for token in tokens {
            match token {
                Token::Text(text) => self.append(HtmlNode::Text(text.to_string())),
                Token::Comment(raw) => self.append(HtmlNode::Markup(raw.to_string())),
                Token::StartTag {
                    name,
                    raw,
                    self_closing,
                } => {
                    if self_closing || is_void_element(&name) {
                        self.append(HtmlNode::Element(HtmlElement {
                            name,
                            open_tag: raw.to_string(),
                            close_tag: String::new(),
                            children: Vec::new(),
                        }));
                    } else {
                        self.stack.push(OpenElement {
                            name,
                            open_tag: raw.to_string(),
                            children: Vec::new(),
                        });
                    }
                }
                Token::EndTag { name, raw } => {
                    match self.stack.iter().rposition(|open| open.name == name) {
                        Some(idx) => {
                            // Anything opened after the match is implicitly closed.
                            while self.stack.len() > idx + 1 {
                                self.close_top("");
                            }
                            self.close_top(raw);
                        }
                        None => self.append(HtmlNode::Markup(raw.to_string())),
                    }
                }
            }
        }
        while !self.stack.is_empty() {
            self.close_top("");
        }
        self.root
    }

    fn append(&mut self, node: HtmlNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn close_top(&mut self, close_tag: &str) {
        if let Some(open) = self.stack.pop() {
            let node = open.close(close_tag);
            self.append(node);
        }
    }
}
