//! Fragment lists and minimal template rebuilding.
//!
//! A template is decomposed into text and expression fragments at its top
//! level; adjacent text merges, so a fully subsumed template collapses into a
//! single literal run.

use swc_atoms::{Atom, Wtf8Atom};
use swc_common::DUMMY_SP;
use swc_ecma_ast::{Expr, Ident, Lit, Str, TaggedTpl, Tpl, TplElement};

use crate::core::extract::call::cooked_quasis;
use crate::core::template::escape_template_text;

/// One top-level piece of a template: cooked text or a live expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Expr(Box<Expr>),
}

/// Append text, merging with a trailing text fragment.
pub fn push_text(fragments: &mut Vec<Fragment>, text: impl AsRef<str>) {
    let text = text.as_ref();
    if text.is_empty() {
        return;
    }
    match fragments.last_mut() {
        Some(Fragment::Text(last)) => last.push_str(text),
        _ => fragments.push(Fragment::Text(text.to_string())),
    }
}

/// Append fragments produced elsewhere, merging text at the seam.
pub fn splice(fragments: &mut Vec<Fragment>, spliced: Vec<Fragment>) {
    for fragment in spliced {
        match fragment {
            Fragment::Text(text) => push_text(fragments, text),
            expr => fragments.push(expr),
        }
    }
}

/// Whether the next expression would sit in an unquoted attribute value.
pub fn in_attribute_position(fragments: &[Fragment]) -> bool {
    matches!(fragments.last(), Some(Fragment::Text(text)) if text.ends_with('='))
}

/// Split a template literal into fragments without inspecting its expressions.
pub fn template_fragments(tpl: Tpl) -> Vec<Fragment> {
    let texts = cooked_quasis(&tpl);
    let mut exprs = tpl.exprs.into_iter();
    let mut fragments = Vec::new();
    for text in texts {
        push_text(&mut fragments, text);
        if let Some(expr) = exprs.next() {
            fragments.push(Fragment::Expr(expr));
        }
    }
    fragments
}

/// Build the smallest expression producing the fragments.
///
/// Text-only non-`html` results become a string literal; everything else is a
/// template literal, tagged with `html` when `is_html` is set.
pub fn build_template_expr(fragments: Vec<Fragment>, is_html: bool) -> Expr {
    let has_exprs = fragments.iter().any(|f| matches!(f, Fragment::Expr(_)));
    if !is_html && !has_exprs {
        let text: String = fragments
            .into_iter()
            .map(|f| match f {
                Fragment::Text(text) => text,
                Fragment::Expr(_) => String::new(),
            })
            .collect();
        return Expr::Lit(Lit::Str(Str::from(text)));
    }

    let mut quasis = Vec::new();
    let mut exprs = Vec::new();
    let mut pending = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => pending.push_str(&text),
            Fragment::Expr(expr) => {
                quasis.push(template_element(std::mem::take(&mut pending), false));
                exprs.push(expr);
            }
        }
    }
    quasis.push(template_element(pending, true));

    let tpl = Tpl {
        span: DUMMY_SP,
        exprs,
        quasis,
    };
    if is_html {
        Expr::TaggedTpl(TaggedTpl {
            span: DUMMY_SP,
            tag: Box::new(Expr::Ident(Ident::from("html"))),
            tpl: Box::new(tpl),
            ..Default::default()
        })
    } else {
        Expr::Tpl(tpl)
    }
}

fn template_element(cooked: String, tail: bool) -> TplElement {
    let raw = escape_template_text(&cooked);
    TplElement {
        span: DUMMY_SP,
        tail,
        cooked: Some(Wtf8Atom::from(Atom::from(cooked))),
        raw: Atom::from(raw),
    }
}
