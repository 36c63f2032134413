use anyhow::Result;
use colored::Colorize;

use super::super::args::CommonArgs;
use super::{
    BuildMode, BuildSummary, CommandKind, CommandResult, CommandSummary,
    helper::{finish, write_generated},
};
use crate::{
    config::OutputConfig,
    core::{
        ProjectContext,
        data::TranslationMap,
        runtime::{generate_locale_codes_module, generate_locale_module},
        transform::{TransformInput, transform_project},
        validate::validate_placeholders,
    },
    formatters::{make_formatter, translation_map},
    issues::has_errors,
};

pub fn build(args: &CommonArgs) -> Result<CommandResult> {
    let ctx = ProjectContext::from_args(args)?;
    run_build(&ctx)
}

/// Combine canonical messages with translations and write localized output.
///
/// Nothing is written while any fatal issue exists.
pub fn run_build(ctx: &ProjectContext) -> Result<CommandResult> {
    let extraction = ctx.extraction();
    let mut issues = extraction.issues.clone();
    let mut summary = BuildSummary {
        mode: match ctx.config.output {
            OutputConfig::Runtime { .. } => BuildMode::Runtime,
            OutputConfig::Transform { .. } => BuildMode::Transform,
        },
        message_count: extraction.messages.len(),
        locale_count: ctx.config.target_locales.len(),
        written: Vec::new(),
    };

    if has_errors(&issues) {
        return Ok(finish(CommandKind::Build, CommandSummary::Build(summary), issues));
    }

    let formatter = make_formatter(&ctx.config, &ctx.root_dir);
    let translations = translation_map(formatter.read_translations()?);
    if ctx.verbose {
        eprintln!(
            "{} read translations for {} locale(s)",
            "info:".bold().cyan(),
            translations.len()
        );
    }

    issues.extend(validate_placeholders(&extraction.messages, &translations));
    if has_errors(&issues) {
        return Ok(finish(CommandKind::Build, CommandSummary::Build(summary), issues));
    }

    let outputs = match &ctx.config.output {
        OutputConfig::Runtime {
            output_dir,
            locale_codes_module,
        } => {
            let mut outputs = Vec::new();
            for locale in &ctx.config.target_locales {
                let module = generate_locale_module(
                    locale,
                    locale_translations(&translations, locale),
                    &extraction.messages,
                    &ctx.config.patches,
                );
                issues.extend(module.issues);
                outputs.push((
                    ctx.resolve(output_dir).join(format!("{locale}.ts")),
                    module.source,
                ));
            }
            if let Some(path) = locale_codes_module {
                outputs.push((
                    ctx.resolve(path),
                    generate_locale_codes_module(
                        &ctx.config.source_locale,
                        &ctx.config.target_locales,
                    ),
                ));
            }
            outputs
        }
        OutputConfig::Transform { output_dir } => {
            let input = TransformInput {
                files: ctx.parsed_files(),
                canonical: &extraction.messages,
                translations: &translations,
                patches: &ctx.config.patches,
                api_modules: &ctx.config.api_modules,
            };
            let mut outputs = Vec::new();
            for locale_output in transform_project(&input, &ctx.config.target_locales) {
                issues.extend(locale_output.issues);
                let locale_dir = ctx.resolve(output_dir).join(&locale_output.locale);
                for file in locale_output.files {
                    outputs.push((locale_dir.join(&file.path), file.code));
                }
            }
            outputs
        }
    };

    if has_errors(&issues) {
        return Ok(finish(CommandKind::Build, CommandSummary::Build(summary), issues));
    }

    for (path, content) in outputs {
        write_generated(&path, &content)?;
        if ctx.verbose {
            eprintln!("{} wrote {}", "info:".bold().cyan(), path.display());
        }
        summary.written.push(path);
    }

    Ok(finish(CommandKind::Build, CommandSummary::Build(summary), issues))
}

fn locale_translations<'a>(
    translations: &'a TranslationMap,
    locale: &str,
) -> &'a [crate::core::data::Message] {
    translations.get(locale).map(Vec::as_slice).unwrap_or_default()
}
