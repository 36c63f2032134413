//! Shape classification of `msg()` calls.
//!
//! Both the extractor and the transformer go through [`classify_msg_call`], so
//! a call is either accepted by both or rejected by both with the same message.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{BlockStmtOrExpr, CallExpr, Expr, Lit, Pat, TaggedTpl, Tpl};

use crate::core::data::Content;
use crate::core::encode::{
    contains_sentinel, encode_expressions, encode_template, markup_has_template_syntax,
    substitute_sentinels,
};

/// A validated `msg()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgCall {
    pub name: String,
    /// Canonical contents, as authored at this call site.
    pub contents: Vec<Content>,
    /// Parameter names of the arrow-function form, in order.
    pub params: Option<Vec<String>>,
    /// Whether the template is `html`-tagged.
    pub is_template: bool,
}

/// A malformed `msg()` call, located at the offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallError {
    pub span: Span,
    pub message: String,
}

impl CallError {
    fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// Whether `tag` is the templating library's `html` tag.
pub fn is_html_tag(tag: &Expr) -> bool {
    matches!(tag, Expr::Ident(ident) if ident.sym.as_str() == "html")
}

/// Return the `html`-tagged template, if `expr` is one.
pub fn as_html_tagged(expr: &Expr) -> Option<&TaggedTpl> {
    match expr {
        Expr::TaggedTpl(tagged) if is_html_tag(&tagged.tag) => Some(tagged),
        _ => None,
    }
}

fn unwrap_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_parens(&paren.expr),
        other => other,
    }
}

/// Cooked text of each template element; falls back to the raw text for
/// elements with invalid escapes.
pub fn cooked_quasis(tpl: &Tpl) -> Vec<String> {
    tpl.quasis
        .iter()
        .map(|q| match &q.cooked {
            Some(cooked) => cooked.to_string_lossy().into_owned(),
            None => q.raw.to_string(),
        })
        .collect()
}

/// A static string: a string literal or a template literal without substitutions.
pub fn static_string(expr: &Expr) -> Option<String> {
    match unwrap_parens(expr) {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string_lossy().into_owned()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => Some(cooked_quasis(tpl).concat()),
        _ => None,
    }
}

/// Validate the shape of a call already resolved to the `msg` export.
pub fn classify_msg_call(call: &CallExpr) -> Result<MsgCall, CallError> {
    if call.args.len() < 2 {
        return Err(CallError::new(
            call.span,
            format!(
                "Expected at least 2 arguments to msg() call, got {}",
                call.args.len()
            ),
        ));
    }

    // Template arguments map one-to-one onto the arrow function's parameters.
    if let Some(spread) = call.args.iter().find_map(|arg| arg.spread) {
        return Err(CallError::new(
            spread,
            "Spread arguments are not supported in msg() calls",
        ));
    }

    let name_arg = &call.args[0].expr;
    let Some(name) = static_string(name_arg) else {
        return Err(CallError::new(
            name_arg.span(),
            "Expected first argument to msg() to be a static string",
        ));
    };
    if name.is_empty() {
        return Err(CallError::new(
            name_arg.span(),
            "Expected first argument to msg() to be a non-empty string",
        ));
    }

    let template_arg = unwrap_parens(&call.args[1].expr);
    let (contents, params, is_template) = match template_arg {
        Expr::Arrow(arrow) => {
            let params = arrow
                .params
                .iter()
                .map(|param| match param {
                    Pat::Ident(ident) => Ok(ident.id.sym.to_string()),
                    other => Err(CallError::new(
                        other.span(),
                        "Expected parameter of msg() template function to be an identifier",
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let body = match &*arrow.body {
                BlockStmtOrExpr::Expr(expr) => unwrap_parens(expr),
                BlockStmtOrExpr::BlockStmt(block) => {
                    return Err(return_type_error(block.span));
                }
            };
            let (contents, is_template) = parameterized_contents(body, &params)?;
            (contents, Some(params), is_template)
        }
        other => {
            let (contents, is_template) = static_contents(other)?;
            (contents, None, is_template)
        }
    };

    Ok(MsgCall {
        name,
        contents,
        params,
        is_template,
    })
}

fn expressions_error(span: Span) -> CallError {
    CallError::new(
        span,
        "String literal with expressions is not supported. Pass an arrow function to msg() and reference its parameters instead.",
    )
}

fn return_type_error(span: Span) -> CallError {
    CallError::new(
        span,
        "Expected msg() template function to return a string, template or html-tagged template",
    )
}

fn markup_syntax_error(span: Span) -> CallError {
    CallError::new(
        span,
        "Placeholder text cannot contain a backtick, backslash or ${",
    )
}

/// Encode `html` template text; markup must be safe to insert verbatim.
fn encode_html(text: &str, span: Span) -> Result<Vec<Content>, CallError> {
    if markup_has_template_syntax(text) {
        return Err(markup_syntax_error(span));
    }
    Ok(encode_template(text))
}

fn reserved_chars_error(span: Span) -> CallError {
    CallError::new(
        span,
        "Message template cannot contain reserved characters U+FDD0 or U+FDD1",
    )
}

/// Contents of the non-parameterized forms.
fn static_contents(arg: &Expr) -> Result<(Vec<Content>, bool), CallError> {
    if let Some(text) = static_string(arg) {
        if contains_sentinel(&text) {
            return Err(reserved_chars_error(arg.span()));
        }
        return Ok((vec![Content::text(text)], false));
    }
    match arg {
        Expr::TaggedTpl(tagged) if is_html_tag(&tagged.tag) => {
            if !tagged.tpl.exprs.is_empty() {
                return Err(expressions_error(tagged.span));
            }
            let text = cooked_quasis(&tagged.tpl).concat();
            if contains_sentinel(&text) {
                return Err(reserved_chars_error(tagged.span));
            }
            Ok((encode_html(&text, tagged.span)?, true))
        }
        Expr::Tpl(tpl) => Err(expressions_error(tpl.span)),
        other => Err(CallError::new(
            other.span(),
            "Expected second argument to msg() to be a string, html-tagged template or arrow function",
        )),
    }
}

/// Contents of an arrow-function body; every expression must be a parameter.
fn parameterized_contents(
    body: &Expr,
    params: &[String],
) -> Result<(Vec<Content>, bool), CallError> {
    if let Some(text) = static_string(body) {
        if contains_sentinel(&text) {
            return Err(reserved_chars_error(body.span()));
        }
        return Ok((vec![Content::text(text)], false));
    }
    let (tpl, is_template) = match body {
        Expr::Tpl(tpl) => (tpl, false),
        Expr::TaggedTpl(tagged) if is_html_tag(&tagged.tag) => (&*tagged.tpl, true),
        other => return Err(return_type_error(other.span())),
    };

    let idents = tpl
        .exprs
        .iter()
        .map(|expr| match unwrap_parens(expr) {
            Expr::Ident(ident) if params.iter().any(|p| p.as_str() == ident.sym.as_str()) => {
                Ok(ident.sym.to_string())
            }
            other => Err(CallError::new(
                other.span(),
                format!(
                    "Placeholder must be one of the following identifiers: {}",
                    params.join(", ")
                ),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let texts = cooked_quasis(tpl);
    if texts.iter().any(|t| contains_sentinel(t)) {
        return Err(reserved_chars_error(tpl.span));
    }
    let text = substitute_sentinels(&texts, &idents);
    let contents = if is_template {
        encode_html(&text, tpl.span)?
    } else {
        encode_expressions(&text)
    };
    Ok((contents, is_template))
}
