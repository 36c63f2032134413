//! RuntimeModuleGenerator: one lookup-table module per target locale.
//!
//! The generated module maps message names to template expressions; the
//! runtime picks the table for the active locale.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::core::data::{Content, Message, ProgramMessage, make_message_map};
use crate::core::patches::{Patches, apply_patches};
use crate::core::template::{quote_js_string, stitch_template_source};
use crate::core::validate::coverage_issues;
use crate::issues::Issue;

const GENERATED_HEADER: &str =
    "// Do not modify this file by hand!\n// Re-generate this file by running litloc\n";

/// Generated source for one locale plus the warnings raised while building it.
#[derive(Debug)]
pub struct LocaleModule {
    pub locale: String,
    pub source: String,
    pub issues: Vec<Issue>,
}

/// Build the `<locale>.ts` table module.
///
/// Translations come first, sorted by name; canonical messages without a
/// translation follow in canonical order, using the source text.
pub fn generate_locale_module(
    locale: &str,
    translations: &[Message],
    canonical: &[ProgramMessage],
    patches: &Patches,
) -> LocaleModule {
    let canonical_by_name = make_message_map(canonical, |m| m.name());
    let issues = coverage_issues(locale, translations, canonical);

    let mut sorted: Vec<&Message> = translations.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut entries = Vec::new();
    let mut translated: HashSet<&str> = HashSet::new();

    for translation in sorted {
        let Some(canon) = canonical_by_name.get(translation.name.as_str()) else {
            continue;
        };
        // First translation of a repeated name wins.
        if !translated.insert(translation.name.as_str()) {
            continue;
        }
        let expr = message_expression(&translation.contents, canon, locale, patches);
        entries.push((translation.name.as_str(), expr));
    }

    for canon in canonical {
        if translated.contains(canon.name()) {
            continue;
        }
        let expr = message_expression(canon.contents(), canon, locale, patches);
        entries.push((canon.name(), expr));
    }

    let import_html = canonical.iter().any(|m| m.is_template);

    let mut source = String::from(GENERATED_HEADER);
    source.push('\n');
    if import_html {
        source.push_str("import {html} from 'lit';\n\n");
    }
    source.push_str("/* eslint-disable no-irregular-whitespace */\n");
    source.push_str("/* eslint-disable @typescript-eslint/no-explicit-any */\n\n");
    source.push_str("export const templates = {\n");
    for (name, expr) in entries {
        let _ = writeln!(source, "  {}: {},", quote_js_string(name), expr);
    }
    source.push_str("};\n");

    LocaleModule {
        locale: locale.to_string(),
        source,
        issues,
    }
}

/// Stitch, patch and wrap one message as a template expression.
pub fn message_expression(
    contents: &[Content],
    canon: &ProgramMessage,
    locale: &str,
    patches: &Patches,
) -> String {
    let stitched = stitch_template_source(contents);
    let patched = apply_patches(patches, locale, canon.name(), &stitched);
    let tag = if canon.is_template { "html" } else { "" };
    let template = format!("{tag}`{patched}`");
    match &canon.params {
        Some(params) => format!("({}) => {}", params.join(", "), template),
        None => template,
    }
}

/// Module exporting the project's locale codes as `as const` tuples.
pub fn generate_locale_codes_module(source_locale: &str, target_locales: &[String]) -> String {
    let mut targets: Vec<&str> = target_locales.iter().map(String::as_str).collect();
    targets.sort_unstable();
    targets.dedup();
    let mut all: Vec<&str> = targets.clone();
    all.push(source_locale);
    all.sort_unstable();
    all.dedup();

    let list = |codes: &[&str]| -> String {
        codes
            .iter()
            .map(|code| format!("  {},\n", quote_js_string(code)))
            .collect()
    };

    let mut out = String::from(GENERATED_HEADER);
    out.push_str("\n/**\n * The locale code that templates in this source code are written in.\n */\n");
    let _ = writeln!(out, "export const sourceLocale = {};", quote_js_string(source_locale));
    out.push_str(
        "\n/**\n * The other locale codes that this application is localized into. Sorted\n * lexicographically.\n */\n",
    );
    let _ = writeln!(out, "export const targetLocales = [\n{}] as const;", list(&targets));
    out.push_str("\n/**\n * All valid project locale codes. Sorted lexicographically.\n */\n");
    let _ = writeln!(out, "export const allLocales = [\n{}] as const;", list(&all));
    out
}
