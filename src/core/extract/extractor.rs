//! Single-pass message extraction over one module.

use swc_common::{BytePos, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, CallExpr, CatchClause, ClassMember, Expr, ForInStmt, ForOfStmt,
    ForStmt, Function, ModuleItem, PropOrSpread, Stmt, VarDecl,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::api::{ApiExport, ApiScope};
use super::call::classify_msg_call;
use super::descriptions::{Description, extend_descriptions};
use crate::core::data::{Message, ProgramMessage, SourceContext};
use crate::core::parsers::source::{ExtractedComments, ParsedSource};
use crate::issues::{InvalidMsgCallIssue, Issue};

/// Messages and diagnostics found in one file.
#[derive(Debug, Default)]
pub struct FileExtraction {
    pub messages: Vec<ProgramMessage>,
    pub issues: Vec<Issue>,
}

/// Extract every `msg()` call of a parsed file, in source order.
pub fn extract_messages(
    parsed: &ParsedSource,
    file_path: &str,
    api_modules: &[String],
) -> FileExtraction {
    let mut extractor = MessageExtractor {
        file_path,
        source_map: &parsed.source_map,
        comments: &parsed.comments,
        scope: ApiScope::for_module(&parsed.module, api_modules),
        descriptions: Vec::new(),
        result: FileExtraction::default(),
    };
    parsed.module.visit_with(&mut extractor);
    extractor.result
}

struct MessageExtractor<'a> {
    file_path: &'a str,
    source_map: &'a SourceMap,
    comments: &'a ExtractedComments,
    scope: ApiScope,
    /// Descriptions in effect at the current node, outermost first.
    descriptions: Vec<Description>,
    result: FileExtraction,
}

impl MessageExtractor<'_> {
    fn context(&self, span: Span) -> SourceContext {
        SourceContext::from_span(self.source_map, self.file_path, span)
    }

    /// Visit children with descriptions from the comments leading `pos` in effect.
    fn with_descriptions(&mut self, pos: BytePos, visit: impl FnOnce(&mut Self)) {
        match extend_descriptions(&self.descriptions, self.comments.leading_at(pos)) {
            Some(extended) => {
                let parent = std::mem::replace(&mut self.descriptions, extended);
                visit(self);
                self.descriptions = parent;
            }
            None => visit(self),
        }
    }

    fn in_scope(&mut self, enter: impl FnOnce(&mut ApiScope), visit: impl FnOnce(&mut Self)) {
        enter(&mut self.scope);
        visit(self);
        self.scope.exit_scope();
    }

    fn record_call(&mut self, node: &CallExpr) {
        match classify_msg_call(node) {
            Ok(call) => {
                let message = ProgramMessage {
                    message: Message::new(call.name, call.contents),
                    context: self.context(node.span),
                    desc_stack: self.descriptions.iter().map(|d| d.text.clone()).collect(),
                    params: call.params,
                    is_template: call.is_template,
                };
                self.result.messages.push(message);
            }
            Err(err) => {
                let issue = InvalidMsgCallIssue {
                    context: self.context(err.span),
                    message: err.message,
                };
                self.result.issues.push(issue.into());
            }
        }
    }
}

impl Visit for MessageExtractor<'_> {
    fn visit_module_item(&mut self, node: &ModuleItem) {
        self.with_descriptions(node.span().lo, |this| node.visit_children_with(this));
    }

    fn visit_stmt(&mut self, node: &Stmt) {
        self.with_descriptions(node.span().lo, |this| node.visit_children_with(this));
    }

    fn visit_class_member(&mut self, node: &ClassMember) {
        self.with_descriptions(node.span().lo, |this| node.visit_children_with(this));
    }

    fn visit_prop_or_spread(&mut self, node: &PropOrSpread) {
        self.with_descriptions(node.span().lo, |this| node.visit_children_with(this));
    }

    fn visit_expr(&mut self, node: &Expr) {
        self.with_descriptions(node.span().lo, |this| node.visit_children_with(this));
    }

    fn visit_function(&mut self, node: &Function) {
        self.in_scope(|s| s.enter_function(node), |this| node.visit_children_with(this));
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.in_scope(|s| s.enter_arrow(node), |this| node.visit_children_with(this));
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.in_scope(|s| s.enter_block(node), |this| node.visit_children_with(this));
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        self.in_scope(|s| s.enter_catch(node), |this| node.visit_children_with(this));
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        self.in_scope(|s| s.enter_for(node), |this| node.visit_children_with(this));
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        self.in_scope(|s| s.enter_for_in(node), |this| node.visit_children_with(this));
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        self.in_scope(|s| s.enter_for_of(node), |this| node.visit_children_with(this));
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        node.visit_children_with(self);
        self.scope.register_aliases(node);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.scope.resolve_callee(&node.callee) == Some(ApiExport::Msg) {
            self.record_call(node);
        }
        node.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::data::Content;
    use crate::core::parsers::source::parse_source;
    use crate::issues::{Report, ReportLocation};
    use pretty_assertions::assert_eq;

    fn extract(code: &str) -> FileExtraction {
        let parsed = parse_source(code.to_string(), "src/app.ts", Arc::default()).unwrap();
        extract_messages(&parsed, "src/app.ts", &["@lit/localize".to_string()])
    }

    fn names(result: &FileExtraction) -> Vec<&str> {
        result.messages.iter().map(|m| m.name()).collect()
    }

    #[test]
    fn test_plain_message() {
        let result = extract(
            "import {msg} from '@lit/localize';\nconst greeting = msg('greeting', 'Hello World');",
        );
        assert!(result.issues.is_empty());
        let message = &result.messages[0];
        assert_eq!(message.name(), "greeting");
        assert_eq!(message.contents(), &[Content::text("Hello World")]);
        assert!(!message.is_template);
        assert_eq!(message.context.line(), 2);
        assert_eq!(message.context.col(), 18);
    }

    #[test]
    fn test_nested_messages_in_source_order() {
        let result = extract(
            r#"import {msg} from '@lit/localize';
import {html} from 'lit';
const t = html`<b>${msg('outer', html`Hello <i>World</i>`)}</b>`;
function render(name) {
  return msg('inner', (name) => html`Hi ${name}`, name);
}"#,
        );
        assert!(result.issues.is_empty());
        assert_eq!(names(&result), vec!["outer", "inner"]);
        assert_eq!(result.messages[1].params, Some(vec!["name".to_string()]));
        assert!(result.messages[1].is_template);
    }

    #[test]
    fn test_aliases_and_namespaces() {
        let result = extract(
            r#"import {msg as m} from '@lit/localize';
import * as L from './lit-localize.js';
const t = m;
m('a', 'A');
L.msg('b', 'B');
t('c', 'C');"#,
        );
        assert_eq!(names(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unrelated_msg_functions_ignored() {
        let result = extract(
            r#"import {msg} from '@lit/localize';
function local(msg) {
  msg('shadowed', 'x');
}
{
  const msg = (a, b) => a;
  msg('block', 'y');
}
msg('real', 'z');"#,
        );
        assert_eq!(names(&result), vec!["real"]);

        let local_only = extract("function msg(a, b) {}\nmsg('local', 'x');");
        assert!(local_only.messages.is_empty());
        assert!(local_only.issues.is_empty());
    }

    #[test]
    fn test_var_in_nested_block_shadows_import() {
        let result = extract(
            r#"import {msg} from '@lit/localize';
function f(a) {
  if (a) {
    var msg = (x, y) => x;
  }
  return msg('local', 'x');
}
const g = () => {
  for (const k of []) { var msg = k; }
  return msg('arrow', 'y');
};
msg('real', 'z');"#,
        );
        assert_eq!(names(&result), vec!["real"]);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_invalid_call_reported_and_walk_continues() {
        let result = extract(
            r#"import {msg} from '@lit/localize';
msg(name, 'x');
msg('ok', 'fine');
msg('tpl', `Hi ${user}`);"#,
        );
        assert_eq!(names(&result), vec!["ok"]);
        assert_eq!(result.issues.len(), 2);
        assert_eq!(
            result.issues[0].message(),
            "Expected first argument to msg() to be a static string"
        );
        let ReportLocation::Source(ctx) = result.issues[0].location() else {
            panic!("expected source location");
        };
        assert_eq!((ctx.line(), ctx.col()), (2, 5));
    }

    #[test]
    fn test_descriptions_scope_to_subtree() {
        let result = extract(
            r#"import {msg} from '@lit/localize';
// msgdesc: Home page
class Home {
  render() {
    /* msgdesc: Header */
    const a = msg('a', 'A');
    return msg('b', 'B');
  }
}
msg('c', 'C');"#,
        );
        let descs: Vec<Option<String>> = result.messages.iter().map(|m| m.desc()).collect();
        assert_eq!(
            descs,
            vec![
                Some("Home page / Header".to_string()),
                Some("Home page".to_string()),
                None,
            ]
        );
    }
}
