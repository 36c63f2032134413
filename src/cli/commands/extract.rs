use std::path::PathBuf;

use anyhow::Result;

use super::super::args::CommonArgs;
use super::{CommandKind, CommandResult, CommandSummary, ExtractSummary, helper::finish};
use crate::{
    config::InterchangeConfig,
    core::{ProjectContext, data::sort_program_messages},
    formatters::{make_formatter, translation_map},
    issues::has_errors,
};

pub fn extract(args: &CommonArgs) -> Result<CommandResult> {
    let ctx = ProjectContext::from_args(args)?;
    run_extract(&ctx)
}

/// Extract canonical messages and write them out for translators.
///
/// Existing translations are read back first so formats that keep targets
/// next to sources (XLIFF) do not lose them.
pub fn run_extract(ctx: &ProjectContext) -> Result<CommandResult> {
    let extraction = ctx.extraction();
    let issues = extraction.issues.clone();
    let mut summary = ExtractSummary {
        message_count: extraction.messages.len(),
        source_files: ctx.files.len(),
        written: Vec::new(),
    };

    if !has_errors(&issues) {
        let formatter = make_formatter(&ctx.config, &ctx.root_dir);
        let translations = translation_map(formatter.read_translations()?);
        let mut messages = extraction.messages.clone();
        sort_program_messages(&mut messages);
        formatter.write_output(&messages, &translations)?;
        summary.written = interchange_outputs(ctx);
    }

    Ok(finish(
        CommandKind::Extract,
        CommandSummary::Extract(summary),
        issues,
    ))
}

fn interchange_outputs(ctx: &ProjectContext) -> Vec<PathBuf> {
    match &ctx.config.interchange {
        InterchangeConfig::Xlb { output_file, .. } => vec![ctx.resolve(output_file)],
        InterchangeConfig::Xliff { xliff_dir, .. } => ctx
            .config
            .target_locales
            .iter()
            .map(|locale| ctx.resolve(xliff_dir).join(format!("{locale}.xlf")))
            .collect(),
    }
}
