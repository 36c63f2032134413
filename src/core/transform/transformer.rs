//! Per-locale AST rewriting.
//!
//! Every `msg()` call is replaced by its resolved content; other API entry
//! points are replaced by their compile-time values, and API imports go away.

use std::collections::HashMap;

use swc_common::{DUMMY_SP, SourceMap, Span};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CallExpr, CatchClause, Class, Decl, Decorator, Expr,
    ForInStmt, ForOfStmt, ForStmt, Function, Ident, IdentName, KeyValueProp, Lit, Module,
    ModuleDecl, ModuleItem, ObjectLit, Prop, PropName, PropOrSpread, Stmt, Str, Tpl, VarDecl,
};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use super::flatten::{
    Fragment, build_template_expr, in_attribute_position, push_text, splice, template_fragments,
};
use crate::core::data::{Content, Message, SourceContext};
use crate::core::extract::call::is_html_tag;
use crate::core::extract::{
    ApiExport, ApiScope, LOCALE_STATUS_EVENT_NAME, classify_msg_call, is_api_module,
};
use crate::core::patches::{Patches, apply_patches};
use crate::core::template::{TemplatePiece, parse_template_source, stitch_template_source};
use crate::issues::{InvalidMsgCallIssue, Issue, RuntimeOnlyApiIssue};

/// Rewrites one module for one target locale.
pub struct LocaleTransformer<'a> {
    locale: &'a str,
    /// This locale's translations by name; the first of a repeated name wins.
    translations: HashMap<&'a str, &'a Message>,
    patches: &'a Patches,
    api_modules: &'a [String],
    scope: ApiScope,
    source_map: &'a SourceMap,
    file_path: &'a str,
    issues: Vec<Issue>,
}

impl<'a> LocaleTransformer<'a> {
    pub fn new(
        module: &Module,
        locale: &'a str,
        translations: &'a [Message],
        patches: &'a Patches,
        api_modules: &'a [String],
        source_map: &'a SourceMap,
        file_path: &'a str,
    ) -> Self {
        let mut by_name = HashMap::new();
        for message in translations {
            by_name.entry(message.name.as_str()).or_insert(message);
        }
        Self {
            locale,
            translations: by_name,
            patches,
            api_modules,
            scope: ApiScope::for_module(module, api_modules),
            source_map,
            file_path,
            issues: Vec::new(),
        }
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    fn context(&self, span: Span) -> SourceContext {
        SourceContext::from_span(self.source_map, self.file_path, span)
    }

    /// Visit `node`'s children inside the scope `enter` opened for it.
    fn in_scope<T>(&mut self, node: &mut T, enter: fn(&mut ApiScope, &T))
    where
        T: VisitMutWith<Self>,
    {
        enter(&mut self.scope, node);
        node.visit_mut_children_with(self);
        self.scope.exit_scope();
    }

    fn is_localized_decorator(&self, decorator: &Decorator) -> bool {
        let export = match &*decorator.expr {
            Expr::Call(call) => self.scope.resolve_callee(&call.callee),
            other => self.scope.resolve_expr(other),
        };
        export == Some(ApiExport::LocalizedDecorator)
    }

    /// Resolve a `msg()` call into fragments; the flag tells whether the
    /// result is `html`-tagged.
    fn translate_msg_call(&mut self, call: &mut CallExpr) -> Option<(Vec<Fragment>, bool)> {
        let parsed = match classify_msg_call(call) {
            Ok(parsed) => parsed,
            Err(err) => {
                let issue = InvalidMsgCallIssue {
                    context: self.context(err.span),
                    message: err.message,
                };
                self.issues.push(issue.into());
                call.visit_mut_children_with(self);
                return None;
            }
        };

        let contents: &[Content] = match self.translations.get(parsed.name.as_str()) {
            Some(translation) => &translation.contents,
            None => &parsed.contents,
        };
        let source = apply_patches(
            self.patches,
            self.locale,
            &parsed.name,
            &stitch_template_source(contents),
        );

        let params = parsed.params.unwrap_or_default();
        for (index, param) in params.iter().enumerate() {
            if call.args.get(index + 2).is_none() {
                let issue = InvalidMsgCallIssue {
                    context: self.context(call.span),
                    message: format!("No value provided for msg() template parameter {param}"),
                };
                self.issues.push(issue.into());
            }
        }

        let mut fragments = Vec::new();
        for piece in parse_template_source(&source) {
            match piece {
                TemplatePiece::Text(text) => push_text(&mut fragments, text),
                TemplatePiece::Ref(name) => {
                    let arg = params
                        .iter()
                        .position(|p| *p == name)
                        .and_then(|index| call.args.get(index + 2))
                        .map(|arg| arg.expr.clone());
                    match arg {
                        Some(expr) => self.subsume(&mut fragments, expr, parsed.is_template),
                        None => fragments.push(Fragment::Expr(Box::new(undefined()))),
                    }
                }
            }
        }
        Some((fragments, parsed.is_template))
    }

    fn replace_msg_call(&mut self, call: &mut CallExpr) -> Option<Expr> {
        let (fragments, is_template) = self.translate_msg_call(call)?;
        Some(build_template_expr(fragments, is_template))
    }

    /// Flatten a template's own expressions into its fragment list.
    fn flatten_template(&mut self, tpl: Tpl, is_html: bool) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        for fragment in template_fragments(tpl) {
            match fragment {
                Fragment::Text(text) => push_text(&mut fragments, text),
                Fragment::Expr(expr) => self.subsume(&mut fragments, expr, is_html),
            }
        }
        fragments
    }

    /// Absorb `expr` into `fragments` when it is static or a template of a
    /// compatible kind; otherwise keep it as a live expression.
    fn subsume(&mut self, fragments: &mut Vec<Fragment>, mut expr: Box<Expr>, is_html: bool) {
        if is_html && in_attribute_position(fragments) {
            self.visit_mut_expr(&mut expr);
            fragments.push(Fragment::Expr(expr));
            return;
        }

        if let Expr::Call(call) = &mut *expr
            && self.scope.resolve_callee(&call.callee) == Some(ApiExport::Msg)
        {
            match self.translate_msg_call(call) {
                Some((inner, inner_html)) if !inner_html || is_html => splice(fragments, inner),
                Some((inner, inner_html)) => fragments.push(Fragment::Expr(Box::new(
                    build_template_expr(inner, inner_html),
                ))),
                None => fragments.push(Fragment::Expr(expr)),
            }
            return;
        }

        match *expr {
            Expr::Lit(Lit::Str(s)) => push_text(fragments, s.value.to_string_lossy()),
            Expr::Tpl(tpl) => {
                let inner = self.flatten_template(tpl, false);
                splice(fragments, inner);
            }
            Expr::TaggedTpl(tagged) if is_html && is_html_tag(&tagged.tag) => {
                let inner = self.flatten_template(*tagged.tpl, true);
                splice(fragments, inner);
            }
            other => {
                let mut other = Box::new(other);
                self.visit_mut_expr(&mut other);
                fragments.push(Fragment::Expr(other));
            }
        }
    }

    /// Replacement for a call to a non-`msg` API entry point, if any.
    fn replace_api_call(&mut self, export: ApiExport, call: &mut CallExpr) -> Option<Expr> {
        match export {
            ApiExport::ConfigureTransformLocalization => Some(get_locale_object(self.locale)),
            ApiExport::ConfigureLocalization => {
                let issue = RuntimeOnlyApiIssue {
                    context: self.context(call.span),
                };
                self.issues.push(issue.into());
                None
            }
            ApiExport::UpdateWhenLocaleChanges => Some(undefined()),
            ApiExport::Localized if call.args.len() == 1 && call.args[0].spread.is_none() => {
                let mut arg = call.args.remove(0).expr;
                self.visit_mut_expr(&mut arg);
                Some(*arg)
            }
            _ => None,
        }
    }
}

fn undefined() -> Expr {
    Expr::Ident(Ident::from("undefined"))
}

fn string_literal(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str::from(value)))
}

/// `{getLocale: () => 'LOCALE'}`
fn get_locale_object(locale: &str) -> Expr {
    let get_locale = ArrowExpr {
        span: DUMMY_SP,
        params: vec![],
        body: Box::new(BlockStmtOrExpr::Expr(Box::new(string_literal(locale)))),
        ..Default::default()
    };
    Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props: vec![PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
            key: PropName::Ident(IdentName::from("getLocale")),
            value: Box::new(Expr::Arrow(get_locale)),
        })))],
    })
}

/// Imports of the localization API are removed entirely.
fn is_api_import(item: &ModuleItem, api_modules: &[String]) -> bool {
    matches!(
        item,
        ModuleItem::ModuleDecl(ModuleDecl::Import(import))
            if is_api_module(&import.src.value.to_string_lossy(), api_modules)
    )
}

fn is_empty_var(decl: &Decl) -> bool {
    matches!(decl, Decl::Var(var) if var.decls.is_empty())
}

impl VisitMut for LocaleTransformer<'_> {
    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        items.retain(|item| !is_api_import(item, self.api_modules));
        items.visit_mut_children_with(self);
        items.retain(|item| match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => !is_empty_var(decl),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => !is_empty_var(&export.decl),
            _ => true,
        });
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        stmts.visit_mut_children_with(self);
        stmts.retain(|stmt| !matches!(stmt, Stmt::Decl(decl) if is_empty_var(decl)));
    }

    fn visit_mut_function(&mut self, node: &mut Function) {
        self.in_scope(node, ApiScope::enter_function);
    }

    fn visit_mut_arrow_expr(&mut self, node: &mut ArrowExpr) {
        self.in_scope(node, ApiScope::enter_arrow);
    }

    fn visit_mut_block_stmt(&mut self, node: &mut BlockStmt) {
        self.in_scope(node, ApiScope::enter_block);
    }

    fn visit_mut_catch_clause(&mut self, node: &mut CatchClause) {
        self.in_scope(node, ApiScope::enter_catch);
    }

    fn visit_mut_for_stmt(&mut self, node: &mut ForStmt) {
        self.in_scope(node, ApiScope::enter_for);
    }

    fn visit_mut_for_in_stmt(&mut self, node: &mut ForInStmt) {
        self.in_scope(node, ApiScope::enter_for_in);
    }

    fn visit_mut_for_of_stmt(&mut self, node: &mut ForOfStmt) {
        self.in_scope(node, ApiScope::enter_for_of);
    }

    /// Aliases of API exports (`const m = msg`) are dropped with the import.
    fn visit_mut_var_decl(&mut self, node: &mut VarDecl) {
        node.visit_mut_children_with(self);
        self.scope.register_aliases(node);
        node.decls.retain(|decl| {
            !decl
                .init
                .as_deref()
                .is_some_and(|init| self.scope.resolve_expr(init).is_some())
        });
    }

    fn visit_mut_class(&mut self, node: &mut Class) {
        node.decorators
            .retain(|decorator| !self.is_localized_decorator(decorator));
        node.visit_mut_children_with(self);
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if self.scope.resolve_expr(expr) == Some(ApiExport::LocaleStatusEvent) {
            *expr = string_literal(LOCALE_STATUS_EVENT_NAME);
            return;
        }
        let replacement = match expr {
            Expr::Call(call) => match self.scope.resolve_callee(&call.callee) {
                Some(ApiExport::Msg) => match self.replace_msg_call(call) {
                    Some(replaced) => replaced,
                    None => return,
                },
                Some(export) => match self.replace_api_call(export, call) {
                    Some(replaced) => replaced,
                    None => {
                        call.visit_mut_children_with(self);
                        return;
                    }
                },
                None => {
                    call.visit_mut_children_with(self);
                    return;
                }
            },
            Expr::TaggedTpl(tagged) if is_html_tag(&tagged.tag) => {
                let tpl = std::mem::take(&mut *tagged.tpl);
                let fragments = self.flatten_template(tpl, true);
                build_template_expr(fragments, true)
            }
            other => {
                other.visit_mut_children_with(self);
                return;
            }
        };
        *expr = replacement;
    }
}
