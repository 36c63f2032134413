//! Template-literal text helpers shared by both output strategies.
//!
//! Message text segments hold the template's cooked text; placeholder segments
//! hold template source text, where expression references appear as `${name}`.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::data::Content;

static EXPRESSION_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*\}").unwrap());

/// A piece of template source: literal text or a reference to an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePiece {
    Text(String),
    Ref(String),
}

/// Escape cooked text so it can sit inside a template literal unchanged.
pub fn escape_template_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            // Template literals normalize a raw CR or CRLF to LF.
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Stitch message contents into template-literal source text.
///
/// Text is escaped; placeholders are inserted verbatim.
pub fn stitch_template_source(contents: &[Content]) -> String {
    contents
        .iter()
        .map(|content| match content {
            Content::Text(text) => escape_template_text(text),
            Content::Placeholder(ph) => ph.untranslatable.clone(),
        })
        .collect()
}

/// Parse template-literal source text back into cooked text and `${name}`
/// references. The inverse of [`stitch_template_source`].
pub fn parse_template_source(source: &str) -> Vec<TemplatePiece> {
    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut rest = source;
    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            let (decoded, after) = unescape_sequence(&rest[1..]);
            text.push_str(&decoded);
            rest = after;
            continue;
        }
        if c == '$'
            && let Some(caps) = EXPRESSION_REF_REGEX.captures(rest)
            && let (Some(whole), Some(name)) = (caps.get(0), caps.get(1))
        {
            if !text.is_empty() {
                pieces.push(TemplatePiece::Text(std::mem::take(&mut text)));
            }
            pieces.push(TemplatePiece::Ref(name.as_str().to_string()));
            rest = &rest[whole.end()..];
            continue;
        }
        text.push(c);
        rest = &rest[c.len_utf8()..];
    }
    if !text.is_empty() {
        pieces.push(TemplatePiece::Text(text));
    }
    pieces
}

/// Decode one escape sequence; `after` starts just past the backslash.
/// Returns the decoded text (empty for a line continuation) and the rest.
fn unescape_sequence(after: &str) -> (String, &str) {
    let mut chars = after.chars();
    let Some(c) = chars.next() else {
        return ("\\".to_string(), "");
    };
    let rest = chars.as_str();
    let decoded = match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'v' => '\u{b}',
        '0' => '\0',
        '\r' => return (String::new(), rest.strip_prefix('\n').unwrap_or(rest)),
        '\n' | '\u{2028}' | '\u{2029}' => return (String::new(), rest),
        'x' => match rest.get(..2).and_then(hex_value) {
            Some(code) => return (decode_code_point(code).to_string(), &rest[2..]),
            None => 'x',
        },
        'u' => match unicode_escape(rest) {
            Some((code, after_code)) => return decode_unicode(code, after_code),
            None => 'u',
        },
        other => other,
    };
    (decoded.to_string(), rest)
}

fn hex_value(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// `XXXX` or `{X...}` following `\u`.
fn unicode_escape(rest: &str) -> Option<(u32, &str)> {
    if let Some(braced) = rest.strip_prefix('{') {
        let close = braced.find('}')?;
        let code = hex_value(&braced[..close]).filter(|code| *code <= 0x10FFFF)?;
        return Some((code, &braced[close + 1..]));
    }
    let code = hex_value(rest.get(..4)?)?;
    Some((code, &rest[4..]))
}

/// Join a `\uD8xx\uDCxx` surrogate pair into one character.
fn decode_unicode(code: u32, rest: &str) -> (String, &str) {
    if (0xD800..0xDC00).contains(&code)
        && let Some(after_slash) = rest.strip_prefix("\\u")
        && let Some((low, after_low)) = unicode_escape(after_slash)
        && (0xDC00..0xE000).contains(&low)
    {
        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
        return (decode_code_point(combined).to_string(), after_low);
    }
    (decode_code_point(code).to_string(), rest)
}

/// Lone surrogates have no `char`; they decode to U+FFFD.
fn decode_code_point(code: u32) -> char {
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Quote a value as a single-quoted JavaScript string literal.
pub fn quote_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_template_text() {
        assert_eq!(escape_template_text("plain"), "plain");
        assert_eq!(escape_template_text("a`b"), "a\\`b");
        assert_eq!(escape_template_text("c:\\dir"), "c:\\\\dir");
        assert_eq!(escape_template_text("cost ${x} $5"), "cost \\${x} $5");
    }

    #[test]
    fn test_stitch_keeps_placeholders_verbatim() {
        let contents = vec![
            Content::text("Hola `"),
            Content::placeholder("<b>${name}</b>"),
            Content::text("!"),
        ];
        assert_eq!(stitch_template_source(&contents), "Hola \\`<b>${name}</b>!");
    }

    #[test]
    fn test_parse_template_source_refs() {
        assert_eq!(
            parse_template_source("<a href=\"${url}\">${ label }"),
            vec![
                TemplatePiece::Text("<a href=\"".to_string()),
                TemplatePiece::Ref("url".to_string()),
                TemplatePiece::Text("\">".to_string()),
                TemplatePiece::Ref("label".to_string()),
            ]
        );
        assert_eq!(
            parse_template_source("<b>"),
            vec![TemplatePiece::Text("<b>".to_string())]
        );
    }

    #[test]
    fn test_parse_template_source_unescapes() {
        assert_eq!(
            parse_template_source("a\\`b \\${x} c:\\\\d"),
            vec![TemplatePiece::Text("a`b ${x} c:\\d".to_string())]
        );
    }

    #[test]
    fn test_stitch_then_parse_restores_text() {
        let contents = vec![
            Content::text("Cost: ${price} `quoted` \\ "),
            Content::placeholder("<b>${amount}</b>"),
        ];
        assert_eq!(
            parse_template_source(&stitch_template_source(&contents)),
            vec![
                TemplatePiece::Text("Cost: ${price} `quoted` \\ <b>".to_string()),
                TemplatePiece::Ref("amount".to_string()),
                TemplatePiece::Text("</b>".to_string()),
            ]
        );
    }

    #[test]
    fn test_escape_carriage_return() {
        assert_eq!(escape_template_text("a\r\nb"), "a\\r\nb");
        assert_eq!(
            parse_template_source(&escape_template_text("a\r\nb\rc")),
            vec![TemplatePiece::Text("a\r\nb\rc".to_string())]
        );
    }

    #[test]
    fn test_parse_template_source_decodes_all_escapes() {
        assert_eq!(
            parse_template_source(r"\x41\u0042\u{43}\uD83D\uDE00\b\v\f|\u{110000}\xZ"),
            vec![TemplatePiece::Text(
                "ABC\u{1F600}\u{8}\u{b}\u{c}|u{110000}xZ".to_string()
            )]
        );
        assert_eq!(
            parse_template_source("line\\\nnext\\\r\ncont"),
            vec![TemplatePiece::Text("linenextcont".to_string())]
        );
        assert_eq!(
            parse_template_source(r"lone \uD83D!"),
            vec![TemplatePiece::Text("lone \u{FFFD}!".to_string())]
        );
    }

    #[test]
    fn test_quote_js_string() {
        assert_eq!(quote_js_string("it's"), "'it\\'s'");
        assert_eq!(quote_js_string("a\nb"), "'a\\nb'");
    }
}
