//! Localization API binding resolution.
//!
//! Identifiers are resolved to the import they bind to, never matched by text.
//! A scope stack mirrors the program's function/block structure so that a local
//! declaration named `msg` shadows the imported one.
//!
//! ```ignore
//! import {msg as m} from '@lit/localize';  // scope 0: m -> Api(Msg)
//! const t = m;                              // scope 0: t -> Api(Msg)
//! function f(msg) {                         // scope 1: msg -> Local
//!     m('a', 'b');  // resolves to Msg
//!     msg('a', 'b'); // Local, not the API
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, Callee, CatchClause, Decl, Expr, ForHead, ForInStmt, ForOfStmt,
    ForStmt, Function, ImportDecl, ImportSpecifier, MemberProp, Module, ModuleDecl,
    ModuleExportName, ModuleItem, Pat, Stmt, VarDecl, VarDeclKind, VarDeclOrExpr,
};

/// Exports of the localization API the pipeline gives meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiExport {
    Msg,
    ConfigureTransformLocalization,
    ConfigureLocalization,
    UpdateWhenLocaleChanges,
    /// The `Localized` class mixin.
    Localized,
    /// The `@localized()` class decorator.
    LocalizedDecorator,
    LocaleStatusEvent,
}

impl ApiExport {
    pub fn from_export_name(name: &str) -> Option<Self> {
        match name {
            "msg" => Some(Self::Msg),
            "configureTransformLocalization" => Some(Self::ConfigureTransformLocalization),
            "configureLocalization" => Some(Self::ConfigureLocalization),
            "updateWhenLocaleChanges" => Some(Self::UpdateWhenLocaleChanges),
            "Localized" => Some(Self::Localized),
            "localized" => Some(Self::LocalizedDecorator),
            "LOCALE_STATUS_EVENT" => Some(Self::LocaleStatusEvent),
            _ => None,
        }
    }
}

/// The event name dispatched on locale status changes.
pub const LOCALE_STATUS_EVENT_NAME: &str = "lit-localize-status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Bound to an export of the localization API (possibly via an alias).
    Api(ApiExport),
    /// `import * as L from '@lit/localize'`.
    Namespace,
    /// Any other declaration; shadows outer bindings of the same name.
    Local,
}

/// Whether an import specifier refers to the localization API.
pub fn is_api_module(specifier: &str, api_modules: &[String]) -> bool {
    if api_modules.iter().any(|m| m == specifier) {
        return true;
    }
    let last = specifier.rsplit('/').next().unwrap_or(specifier);
    Path::new(last)
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem == "lit-localize")
}

/// Extract all identifier names from a pattern (handles destructuring).
pub fn extract_binding_names(pat: &Pat) -> Vec<String> {
    use swc_ecma_ast::ObjectPatProp;

    match pat {
        Pat::Ident(ident) => vec![ident.id.sym.to_string()],
        Pat::Object(obj) => obj
            .props
            .iter()
            .flat_map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => extract_binding_names(&kv.value),
                ObjectPatProp::Assign(assign) => vec![assign.key.sym.to_string()],
                ObjectPatProp::Rest(rest) => extract_binding_names(&rest.arg),
            })
            .collect(),
        Pat::Array(arr) => arr
            .elems
            .iter()
            .flatten()
            .flat_map(extract_binding_names)
            .collect(),
        Pat::Assign(assign) => extract_binding_names(&assign.left),
        Pat::Rest(rest) => extract_binding_names(&rest.arg),
        _ => vec![],
    }
}

fn decl_names(decl: &Decl) -> Vec<String> {
    match decl {
        Decl::Fn(f) => vec![f.ident.sym.to_string()],
        Decl::Class(c) => vec![c.ident.sym.to_string()],
        Decl::Var(var) => var_decl_names(var),
        _ => vec![],
    }
}

/// Names declared directly in a statement list (hoisting-wise, per block).
fn stmt_decl_names(stmts: &[Stmt]) -> Vec<String> {
    stmts
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Decl(decl) => Some(decl_names(decl)),
            _ => None,
        })
        .flatten()
        .collect()
}

fn var_decl_names(var: &VarDecl) -> Vec<String> {
    var.decls
        .iter()
        .flat_map(|d| extract_binding_names(&d.name))
        .collect()
}

/// `var` names anywhere in `stmts`, nested blocks included, nested functions
/// excluded. They belong to the enclosing function (or module) scope.
fn hoisted_var_names<'a>(stmts: impl IntoIterator<Item = &'a Stmt>) -> Vec<String> {
    let mut names = Vec::new();
    for stmt in stmts {
        collect_hoisted_vars(stmt, &mut names);
    }
    names
}

fn collect_hoisted_vars(stmt: &Stmt, names: &mut Vec<String>) {
    fn var_head(var: &VarDecl, names: &mut Vec<String>) {
        if var.kind == VarDeclKind::Var {
            names.extend(var_decl_names(var));
        }
    }
    match stmt {
        Stmt::Decl(Decl::Var(var)) => var_head(var, names),
        Stmt::Block(block) => block.stmts.iter().for_each(|s| collect_hoisted_vars(s, names)),
        Stmt::If(if_stmt) => {
            collect_hoisted_vars(&if_stmt.cons, names);
            if let Some(alt) = &if_stmt.alt {
                collect_hoisted_vars(alt, names);
            }
        }
        Stmt::For(for_stmt) => {
            if let Some(VarDeclOrExpr::VarDecl(var)) = &for_stmt.init {
                var_head(var, names);
            }
            collect_hoisted_vars(&for_stmt.body, names);
        }
        Stmt::ForIn(for_in) => {
            if let ForHead::VarDecl(var) = &for_in.left {
                var_head(var, names);
            }
            collect_hoisted_vars(&for_in.body, names);
        }
        Stmt::ForOf(for_of) => {
            if let ForHead::VarDecl(var) = &for_of.left {
                var_head(var, names);
            }
            collect_hoisted_vars(&for_of.body, names);
        }
        Stmt::While(while_stmt) => collect_hoisted_vars(&while_stmt.body, names),
        Stmt::DoWhile(do_while) => collect_hoisted_vars(&do_while.body, names),
        Stmt::Labeled(labeled) => collect_hoisted_vars(&labeled.body, names),
        Stmt::With(with) => collect_hoisted_vars(&with.body, names),
        Stmt::Switch(switch) => switch
            .cases
            .iter()
            .flat_map(|case| &case.cons)
            .for_each(|s| collect_hoisted_vars(s, names)),
        Stmt::Try(try_stmt) => {
            try_stmt.block.stmts.iter().for_each(|s| collect_hoisted_vars(s, names));
            if let Some(handler) = &try_stmt.handler {
                handler.body.stmts.iter().for_each(|s| collect_hoisted_vars(s, names));
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                finalizer.stmts.iter().for_each(|s| collect_hoisted_vars(s, names));
            }
        }
        _ => {}
    }
}

/// Scoped bindings for localization API resolution.
///
/// The visitors call `enter_*`/`exit_scope` at the same nodes, so the extractor
/// and the transformer always agree on what an identifier refers to.
pub struct ApiScope {
    /// Stack of binding scopes (innermost last).
    bindings_stack: Vec<HashMap<String, Binding>>,
}

impl ApiScope {
    /// Build the module scope: API imports plus every top-level declaration.
    pub fn for_module(module: &Module, api_modules: &[String]) -> Self {
        let mut global = HashMap::new();
        for item in &module.body {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    collect_import_bindings(import, api_modules, &mut global);
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    for name in decl_names(&export.decl) {
                        global.insert(name, Binding::Local);
                    }
                }
                ModuleItem::Stmt(Stmt::Decl(decl)) => {
                    for name in decl_names(decl) {
                        global.insert(name, Binding::Local);
                    }
                }
                _ => {}
            }
        }
        let top_level = module.body.iter().filter_map(|item| match item {
            ModuleItem::Stmt(stmt) => Some(stmt),
            ModuleItem::ModuleDecl(_) => None,
        });
        for name in hoisted_var_names(top_level) {
            global.insert(name, Binding::Local);
        }
        Self {
            bindings_stack: vec![global],
        }
    }

    pub fn enter_scope(&mut self) {
        self.bindings_stack.push(HashMap::new());
    }

    /// Keeps at least the module scope.
    pub fn exit_scope(&mut self) {
        if self.bindings_stack.len() > 1 {
            self.bindings_stack.pop();
        }
    }

    pub fn insert_binding(&mut self, name: String, binding: Binding) {
        if let Some(scope) = self.bindings_stack.last_mut() {
            scope.insert(name, binding);
        }
    }

    fn insert_locals(&mut self, names: impl IntoIterator<Item = String>) {
        for name in names {
            self.insert_binding(name, Binding::Local);
        }
    }

    /// Look up a binding by name, searching from innermost to outermost scope.
    pub fn get_binding(&self, name: &str) -> Option<&Binding> {
        self.bindings_stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    pub fn enter_function(&mut self, function: &Function) {
        self.enter_scope();
        self.insert_locals(function.params.iter().flat_map(|p| extract_binding_names(&p.pat)));
        if let Some(body) = &function.body {
            self.insert_locals(hoisted_var_names(&body.stmts));
        }
    }

    pub fn enter_arrow(&mut self, arrow: &ArrowExpr) {
        self.enter_scope();
        self.insert_locals(arrow.params.iter().flat_map(extract_binding_names));
        if let BlockStmtOrExpr::BlockStmt(body) = &*arrow.body {
            self.insert_locals(hoisted_var_names(&body.stmts));
        }
    }

    pub fn enter_block(&mut self, block: &BlockStmt) {
        self.enter_scope();
        self.insert_locals(stmt_decl_names(&block.stmts));
    }

    pub fn enter_catch(&mut self, clause: &CatchClause) {
        self.enter_scope();
        if let Some(param) = &clause.param {
            self.insert_locals(extract_binding_names(param));
        }
    }

    pub fn enter_for(&mut self, stmt: &ForStmt) {
        self.enter_scope();
        if let Some(VarDeclOrExpr::VarDecl(var)) = &stmt.init {
            self.insert_locals(var.decls.iter().flat_map(|d| extract_binding_names(&d.name)));
        }
    }

    pub fn enter_for_in(&mut self, stmt: &ForInStmt) {
        self.enter_scope();
        self.insert_locals(for_head_names(&stmt.left));
    }

    pub fn enter_for_of(&mut self, stmt: &ForOfStmt) {
        self.enter_scope();
        self.insert_locals(for_head_names(&stmt.left));
    }

    /// Record `const m = msg` style aliases of API exports.
    pub fn register_aliases(&mut self, var: &VarDecl) {
        for decl in &var.decls {
            if let Pat::Ident(binding) = &decl.name
                && let Some(init) = &decl.init
                && let Some(export) = self.resolve_expr(init)
            {
                self.insert_binding(binding.id.sym.to_string(), Binding::Api(export));
            }
        }
    }

    /// Resolve an expression (identifier or namespace member) to an API export.
    pub fn resolve_expr(&self, expr: &Expr) -> Option<ApiExport> {
        match expr {
            Expr::Ident(ident) => match self.get_binding(ident.sym.as_str())? {
                Binding::Api(export) => Some(*export),
                Binding::Namespace | Binding::Local => None,
            },
            Expr::Member(member) => {
                let Expr::Ident(obj) = &*member.obj else {
                    return None;
                };
                let MemberProp::Ident(prop) = &member.prop else {
                    return None;
                };
                match self.get_binding(obj.sym.as_str())? {
                    Binding::Namespace => ApiExport::from_export_name(prop.sym.as_str()),
                    _ => None,
                }
            }
            Expr::Paren(paren) => self.resolve_expr(&paren.expr),
            _ => None,
        }
    }

    pub fn resolve_callee(&self, callee: &Callee) -> Option<ApiExport> {
        match callee {
            Callee::Expr(expr) => self.resolve_expr(expr),
            _ => None,
        }
    }
}

fn for_head_names(head: &ForHead) -> Vec<String> {
    match head {
        ForHead::VarDecl(var) => var_decl_names(var),
        _ => vec![],
    }
}

fn collect_import_bindings(
    import: &ImportDecl,
    api_modules: &[String],
    scope: &mut HashMap<String, Binding>,
) {
    let is_api = !import.type_only && is_api_module(&import.src.value.to_string_lossy(), api_modules);
    for specifier in &import.specifiers {
        let (local, binding) = match specifier {
            ImportSpecifier::Named(named) => {
                let imported = match &named.imported {
                    Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                    Some(ModuleExportName::Str(s)) => s.value.to_string_lossy().into_owned(),
                    None => named.local.sym.to_string(),
                };
                let binding = if is_api && !named.is_type_only {
                    ApiExport::from_export_name(&imported).map_or(Binding::Local, Binding::Api)
                } else {
                    Binding::Local
                };
                (named.local.sym.to_string(), binding)
            }
            ImportSpecifier::Namespace(ns) => {
                let binding = if is_api {
                    Binding::Namespace
                } else {
                    Binding::Local
                };
                (ns.local.sym.to_string(), binding)
            }
            ImportSpecifier::Default(default) => (default.local.sym.to_string(), Binding::Local),
        };
        scope.insert(local, binding);
    }
}
