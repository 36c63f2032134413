//! Transform-mode output: every input module re-emitted once per target locale.

use std::collections::BTreeMap;

use rayon::prelude::*;
use swc_ecma_codegen::to_code_default;
use swc_ecma_visit::VisitMutWith;

use super::transformer::LocaleTransformer;
use crate::core::data::{Message, ProgramMessage, TranslationMap};
use crate::core::parsers::source::ParsedSource;
use crate::core::patches::Patches;
use crate::core::validate::coverage_issues;
use crate::issues::Issue;

/// One re-emitted module, keyed by its path relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedFile {
    pub path: String,
    pub code: String,
}

/// All modules of one locale plus the diagnostics raised while rewriting them.
#[derive(Debug)]
pub struct LocaleOutput {
    pub locale: String,
    pub files: Vec<TransformedFile>,
    pub issues: Vec<Issue>,
}

/// Shared inputs of a transform run.
pub struct TransformInput<'a> {
    pub files: &'a BTreeMap<String, ParsedSource>,
    pub canonical: &'a [ProgramMessage],
    pub translations: &'a TranslationMap,
    pub patches: &'a Patches,
    pub api_modules: &'a [String],
}

/// Rewrite one module for one locale and print it back to source.
pub fn transform_file(
    parsed: &ParsedSource,
    file_path: &str,
    locale: &str,
    translations: &[Message],
    patches: &Patches,
    api_modules: &[String],
) -> (String, Vec<Issue>) {
    let mut module = parsed.module.clone();
    let mut transformer = LocaleTransformer::new(
        &module,
        locale,
        translations,
        patches,
        api_modules,
        &parsed.source_map,
        file_path,
    );
    module.visit_mut_with(&mut transformer);
    let issues = transformer.into_issues();

    let comments = parsed.comments.to_swc();
    let code = to_code_default(parsed.source_map.clone(), Some(&comments), &module);
    (code, issues)
}

/// Transform every file for every target locale, one locale per task.
pub fn transform_project(input: &TransformInput<'_>, target_locales: &[String]) -> Vec<LocaleOutput> {
    target_locales
        .par_iter()
        .map(|locale| {
            let translations = input
                .translations
                .get(locale)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let mut issues = coverage_issues(locale, translations, input.canonical);
            let files = input
                .files
                .iter()
                .map(|(path, parsed)| {
                    let (code, file_issues) = transform_file(
                        parsed,
                        path,
                        locale,
                        translations,
                        input.patches,
                        input.api_modules,
                    );
                    issues.extend(file_issues);
                    TransformedFile {
                        path: path.clone(),
                        code,
                    }
                })
                .collect();
            LocaleOutput {
                locale: locale.clone(),
                files,
                issues,
            }
        })
        .collect()
}
