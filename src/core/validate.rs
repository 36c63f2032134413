//! Placeholder validation of translations against canonical messages.

use std::collections::{HashMap, HashSet};

use crate::core::data::{Message, ProgramMessage, TranslationMap, make_message_map};
use crate::issues::{
    Issue, MissingTranslationIssue, OrphanTranslationIssue, PlaceholderMismatchIssue,
    PlaceholderMismatchKind,
};

/// Warnings for one locale: orphan translations (sorted by name), then
/// canonical messages with no translation (in canonical order).
pub fn coverage_issues(
    locale: &str,
    translations: &[Message],
    canonical: &[ProgramMessage],
) -> Vec<Issue> {
    let canonical_names: HashSet<&str> = canonical.iter().map(|m| m.name()).collect();
    let translated: HashSet<&str> = translations.iter().map(|m| m.name.as_str()).collect();

    let mut orphans: Vec<&str> = translated
        .iter()
        .copied()
        .filter(|name| !canonical_names.contains(name))
        .collect();
    orphans.sort_unstable();

    let mut issues: Vec<Issue> = orphans
        .into_iter()
        .map(|name| {
            OrphanTranslationIssue {
                locale: locale.to_string(),
                name: name.to_string(),
            }
            .into()
        })
        .collect();
    issues.extend(
        canonical
            .iter()
            .filter(|m| !translated.contains(m.name()))
            .map(|m| {
                MissingTranslationIssue {
                    context: m.context.clone(),
                    locale: locale.to_string(),
                    name: m.name().to_string(),
                }
                .into()
            }),
    );
    issues
}

/// Check that every translation carries exactly the canonical placeholders.
///
/// Placeholders may be reordered; each one must appear as many times as in the
/// source text. Translations with no canonical message are left to the
/// generators, which report them as orphans.
pub fn validate_placeholders(canonical: &[ProgramMessage], translations: &TranslationMap) -> Vec<Issue> {
    let by_name = make_message_map(canonical, |m| m.name());
    let mut locales: Vec<&String> = translations.keys().collect();
    locales.sort();

    let mut issues = Vec::new();
    for locale in locales {
        for translation in &translations[locale] {
            let Some(source) = by_name.get(translation.name.as_str()) else {
                continue;
            };
            issues.extend(compare_placeholders(locale, source, translation));
        }
    }
    issues
}

fn compare_placeholders(locale: &str, source: &ProgramMessage, translation: &Message) -> Vec<Issue> {
    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for ph in source.message.placeholders() {
        *remaining.entry(ph.untranslatable.as_str()).or_default() += 1;
    }

    let mut issues = Vec::new();
    let mut report = |placeholder: &str, kind| {
        issues.push(
            PlaceholderMismatchIssue {
                context: source.context.clone(),
                locale: locale.to_string(),
                name: source.name().to_string(),
                placeholder: placeholder.to_string(),
                kind,
            }
            .into(),
        );
    };

    for ph in translation.placeholders() {
        match remaining.get_mut(ph.untranslatable.as_str()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => report(&ph.untranslatable, PlaceholderMismatchKind::Unexpected),
        }
    }
    // Report missing placeholders in source order.
    for ph in source.message.placeholders() {
        if let Some(count) = remaining.get_mut(ph.untranslatable.as_str())
            && *count > 0
        {
            *count -= 1;
            report(&ph.untranslatable, PlaceholderMismatchKind::Missing);
        }
    }
    issues
}
