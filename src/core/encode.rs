//! Placeholder encoding: template text → ordered text / placeholder segments.
//!
//! Expression spans of a parameterized template are first replaced by a
//! sentinel wrapping the referenced identifier, so the whole template can be
//! parsed as plain HTML. Markup becomes placeholders, sentinels become `${name}`
//! placeholders, and runs of adjacent placeholders are merged.
//!
//! Concatenating the output segments reproduces the input, with every sentinel
//! rendered back as `${name}`.

use crate::core::data::Content;
use crate::core::parsers::html::{self, HtmlNode};

/// Opens a sentinel. A Unicode noncharacter, never produced by authored text.
pub const SENTINEL_OPEN: char = '\u{FDD0}';
/// Closes a sentinel.
pub const SENTINEL_CLOSE: char = '\u{FDD1}';

/// Wrap an identifier in sentinel delimiters.
pub fn sentinel(ident: &str) -> String {
    format!("{SENTINEL_OPEN}{ident}{SENTINEL_CLOSE}")
}

pub fn contains_sentinel(text: &str) -> bool {
    text.contains([SENTINEL_OPEN, SENTINEL_CLOSE])
}

/// Join template text pieces, putting a sentinel for `idents[i]` between
/// `texts[i]` and `texts[i + 1]`.
pub fn substitute_sentinels(texts: &[String], idents: &[String]) -> String {
    let mut out = String::new();
    for (i, text) in texts.iter().enumerate() {
        out.push_str(text);
        if let Some(ident) = idents.get(i) {
            out.push_str(&sentinel(ident));
        }
    }
    out
}

/// Split template text into translatable text and untranslatable placeholders.
pub fn encode_template(text: &str) -> Vec<Content> {
    let nodes = html::parse_fragment(text);
    let mut segments = Vec::new();
    flatten_nodes(&nodes, &mut segments);

    let expanded = segments
        .into_iter()
        .flat_map(|segment| match segment {
            Content::Text(text) => split_sentinels(&text),
            placeholder => vec![placeholder],
        })
        .collect();
    combine_adjacent_placeholders(expanded)
}

/// Whether any markup in `text` holds a backtick, a backslash or `${`.
///
/// Markup placeholders are inserted verbatim into generated template source,
/// where those would no longer mean what the cooked text says.
pub fn markup_has_template_syntax(text: &str) -> bool {
    fn unsafe_slice(markup: &str) -> bool {
        markup.contains(['`', '\\']) || markup.contains("${")
    }
    fn walk(nodes: &[HtmlNode]) -> bool {
        nodes.iter().any(|node| match node {
            HtmlNode::Text(_) => false,
            HtmlNode::Markup(raw) => unsafe_slice(raw),
            HtmlNode::Element(el) => {
                unsafe_slice(&el.open_tag) || unsafe_slice(&el.close_tag) || walk(&el.children)
            }
        })
    }
    walk(&html::parse_fragment(text))
}

/// Encode a non-HTML template: only sentinels become placeholders, markup-like
/// text stays translatable.
pub fn encode_expressions(text: &str) -> Vec<Content> {
    combine_adjacent_placeholders(split_sentinels(text))
}

/// Depth-first walk emitting text and markup segments in document order.
fn flatten_nodes(nodes: &[HtmlNode], out: &mut Vec<Content>) {
    for node in nodes {
        match node {
            HtmlNode::Text(text) => out.push(Content::Text(text.clone())),
            HtmlNode::Markup(raw) => out.push(Content::placeholder(replace_sentinels(raw))),
            HtmlNode::Element(el) => {
                out.push(Content::placeholder(replace_sentinels(&el.open_tag)));
                flatten_nodes(&el.children, out);
                if !el.close_tag.is_empty() {
                    out.push(Content::placeholder(replace_sentinels(&el.close_tag)));
                }
            }
        }
    }
}

/// Rewrite sentinels inside markup as `${name}`, in place.
fn replace_sentinels(markup: &str) -> String {
    split_sentinels(markup)
        .iter()
        .map(Content::as_str)
        .collect()
}

/// Split text on sentinels; each wrapped identifier becomes a `${name}`
/// placeholder. Never yields an empty text segment.
fn split_sentinels(text: &str) -> Vec<Content> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(SENTINEL_OPEN) {
        let after_open = &rest[open + SENTINEL_OPEN.len_utf8()..];
        let Some(close) = after_open.find(SENTINEL_CLOSE) else {
            break;
        };
        if open > 0 {
            out.push(Content::text(&rest[..open]));
        }
        out.push(Content::placeholder(format!("${{{}}}", &after_open[..close])));
        rest = &after_open[close + SENTINEL_CLOSE.len_utf8()..];
    }
    if !rest.is_empty() {
        out.push(Content::text(rest));
    }
    out
}

/// Merge runs of placeholders into one placeholder. Whitespace-only text
/// directly following a placeholder joins the run.
fn combine_adjacent_placeholders(segments: Vec<Content>) -> Vec<Content> {
    let mut combined = Vec::new();
    let mut buffer = String::new();
    let mut buffering = false;

    for segment in segments {
        match segment {
            Content::Placeholder(ph) => {
                buffer.push_str(&ph.untranslatable);
                buffering = true;
            }
            Content::Text(text) if buffering && text.trim().is_empty() => {
                buffer.push_str(&text);
            }
            Content::Text(text) => {
                if buffering {
                    combined.push(Content::placeholder(std::mem::take(&mut buffer)));
                    buffering = false;
                }
                if !text.is_empty() {
                    combined.push(Content::Text(text));
                }
            }
        }
    }
    if buffering {
        combined.push(Content::placeholder(buffer));
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn joined(contents: &[Content]) -> String {
        contents.iter().map(Content::as_str).collect()
    }

    #[test]
    fn test_plain_text_is_single_segment() {
        assert_eq!(encode_template("Hello World"), vec![Content::text("Hello World")]);
    }

    #[test]
    fn test_markup_becomes_placeholders() {
        assert_eq!(
            encode_template("Hello <i>World</i>"),
            vec![
                Content::text("Hello "),
                Content::placeholder("<i>"),
                Content::text("World"),
                Content::placeholder("</i>"),
            ]
        );
    }

    #[test]
    fn test_adjacent_placeholders_combine_with_whitespace() {
        assert_eq!(
            encode_template("<b>bold</b> <i>italic</i>"),
            vec![
                Content::placeholder("<b>"),
                Content::text("bold"),
                Content::placeholder("</b> <i>"),
                Content::text("italic"),
                Content::placeholder("</i>"),
            ]
        );
        assert_eq!(
            encode_template("<p><b>x</b></p>\n"),
            vec![
                Content::placeholder("<p><b>"),
                Content::text("x"),
                Content::placeholder("</b></p>\n"),
            ]
        );
    }

    #[test]
    fn test_leading_whitespace_stays_text() {
        assert_eq!(
            encode_template("  <br>"),
            vec![Content::text("  "), Content::placeholder("<br>")]
        );
    }

    #[test]
    fn test_sentinels_become_expression_placeholders() {
        let text = substitute_sentinels(
            &["Hello ".to_string(), "!".to_string()],
            &["name".to_string()],
        );
        assert_eq!(
            encode_template(&text),
            vec![
                Content::text("Hello "),
                Content::placeholder("${name}"),
                Content::text("!"),
            ]
        );
    }

    #[test]
    fn test_sentinel_inside_attribute_fixed_in_place() {
        let text = substitute_sentinels(
            &[
                "Click <a href=\"".to_string(),
                "\">here</a>".to_string(),
            ],
            &["url".to_string()],
        );
        assert_eq!(
            encode_template(&text),
            vec![
                Content::text("Click "),
                Content::placeholder("<a href=\"${url}\">"),
                Content::text("here"),
                Content::placeholder("</a>"),
            ]
        );
    }

    #[test]
    fn test_sentinel_next_to_markup_merges() {
        let text = substitute_sentinels(
            &["<b>".to_string(), "</b> items".to_string()],
            &["count".to_string()],
        );
        assert_eq!(
            encode_template(&text),
            vec![
                Content::placeholder("<b>${count}</b>"),
                Content::text(" items"),
            ]
        );
    }

    #[test]
    fn test_no_empty_text_around_sentinels() {
        let text = substitute_sentinels(
            &[String::new(), String::new(), String::new()],
            &["a".to_string(), "b".to_string()],
        );
        assert_eq!(encode_template(&text), vec![Content::placeholder("${a}${b}")]);
    }

    #[test]
    fn test_round_trip_reproduces_input() {
        for input in [
            "",
            "Hello World",
            "Hello <b>big <i>World</i></b>!",
            "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>",
            "broken </i> markup <b>unclosed",
            "<img src=\"a.png\" alt='x'> caption <!-- note -->",
            "<custom-el foo=bar>custom</custom-el>",
        ] {
            assert_eq!(joined(&encode_template(input)), input);
        }
    }

    #[test]
    fn test_round_trip_with_sentinels() {
        let text = substitute_sentinels(
            &[
                "Hi <a href=\"".to_string(),
                "\">".to_string(),
                "</a>, you have ".to_string(),
                " new".to_string(),
            ],
            &["url".to_string(), "name".to_string(), "count".to_string()],
        );
        assert_eq!(
            joined(&encode_template(&text)),
            "Hi <a href=\"${url}\">${name}</a>, you have ${count} new"
        );
    }

    #[test]
    fn test_encode_expressions_ignores_markup() {
        let text = substitute_sentinels(
            &["<b>".to_string(), " ".to_string(), "</b>".to_string()],
            &["a".to_string(), "b".to_string()],
        );
        assert_eq!(
            encode_expressions(&text),
            vec![
                Content::text("<b>"),
                Content::placeholder("${a} ${b}"),
                Content::text("</b>"),
            ]
        );
    }

    #[test]
    fn test_contains_sentinel() {
        assert!(contains_sentinel("a\u{FDD0}b"));
        assert!(!contains_sentinel("plain"));
    }
}
