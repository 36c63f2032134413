//! `msgdesc:` description comments.
//!
//! ```ignore
//! // msgdesc: Home page
//! class HomePage extends LitElement {
//!   render() {
//!     /* msgdesc: Greeting in the header */
//!     return msg('greeting', 'Hello');   // desc: "Home page / Greeting in the header"
//!   }
//! }
//! ```

use std::sync::LazyLock;

use regex::Regex;
use swc_common::{BytePos, comments::Comment};

static MSGDESC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"msgdesc:[ \t]*(.+)").unwrap());

/// A description annotation, identified by the source range of its comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub range: (BytePos, BytePos),
    pub text: String,
}

/// Parse the description carried by a comment, if any.
pub fn parse_description(comment: &Comment) -> Option<Description> {
    let caps = MSGDESC_REGEX.captures(&comment.text)?;
    let text = caps.get(1)?.as_str().trim();
    if text.is_empty() {
        return None;
    }
    Some(Description {
        range: (comment.span.lo, comment.span.hi),
        text: text.to_string(),
    })
}

/// Extend `stack` with descriptions from `comments` it does not already hold.
///
/// Returns `None` when nothing new was found, so callers can keep the parent's
/// stack untouched.
pub fn extend_descriptions(stack: &[Description], comments: &[Comment]) -> Option<Vec<Description>> {
    let mut extended: Option<Vec<Description>> = None;
    for desc in comments.iter().filter_map(parse_description) {
        let current = extended.as_deref().unwrap_or(stack);
        if current.iter().any(|d| d.range == desc.range) {
            continue;
        }
        extended.get_or_insert_with(|| stack.to_vec()).push(desc);
    }
    extended
}
