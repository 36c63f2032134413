//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format. Separate from the pipeline so
//! litloc can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{BuildMode, BuildSummary, CommandResult, CommandSummary, ExtractSummary};
use crate::core::data::SourceContext;
use crate::issues::{Issue, Report, ReportLocation, Severity};

pub const SUCCESS_MARK: &str = "\u{2713}";
pub const FAILURE_MARK: &str = "\u{2718}";

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort_by(compare_issues);

    let gutter = gutter_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, gutter);
    }

    print_summary(&sorted, writer);
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

pub fn print(result: &CommandResult, verbose: bool) {
    report(&result.issues);
    print_outcome_to(result, &mut io::stdout().lock());
    print_parse_warning_to(result.parse_error_count, verbose, &mut io::stderr().lock());
}

/// One line saying what was written, or that nothing was.
pub fn print_outcome_to<W: Write>(result: &CommandResult, writer: &mut W) {
    if result.error_count > 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            "Aborted, no files were written".red()
        );
        return;
    }

    let line = match &result.summary {
        CommandSummary::Extract(summary) => extract_outcome(summary),
        CommandSummary::Build(summary) => build_outcome(summary),
    };
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), line.green());
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

fn extract_outcome(summary: &ExtractSummary) -> String {
    format!(
        "Extracted {} from {}, wrote {}",
        plural(summary.message_count, "message", "messages"),
        plural(summary.source_files, "source file", "source files"),
        plural(summary.written.len(), "interchange file", "interchange files"),
    )
}

fn build_outcome(summary: &BuildSummary) -> String {
    let mode = match summary.mode {
        BuildMode::Runtime => "runtime",
        BuildMode::Transform => "transform",
    };
    format!(
        "Built {} for {} ({} mode), wrote {}",
        plural(summary.message_count, "message", "messages"),
        plural(summary.locale_count, "locale", "locales"),
        mode,
        plural(summary.written.len(), "file", "files"),
    )
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    }
}

/// Gutter-aligned line: `{pad} {sep} {body}`.
fn gutter_line<W: Write>(writer: &mut W, width: usize, sep: &str, body: impl std::fmt::Display) {
    let _ = writeln!(writer, "{:>width$} {} {}", "", sep.blue(), body);
}

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, gutter: usize) {
    let severity = issue.report_severity();
    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_label(severity),
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::Source(ctx) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                ctx.file_path(),
                ctx.line(),
                ctx.col()
            );
            if !ctx.source_line.is_empty() {
                print_snippet(writer, gutter, severity, ctx);
            }
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
        ReportLocation::Locale { locale } => {
            let _ = writeln!(writer, "  {} locale {}", "-->".blue(), locale);
        }
    }

    if let Some(note) = issue.details() {
        gutter_line(writer, gutter, "=", format!("{} {}", "note:".bold(), note));
    }
    if let Some(hint) = issue.hint() {
        gutter_line(writer, gutter, "=", format!("{} {}", "hint:".bold().cyan(), hint));
    }
    let _ = writeln!(writer);
}

/// Numbered source line with a caret under the 1-based column.
fn print_snippet<W: Write>(
    writer: &mut W,
    gutter: usize,
    severity: Severity,
    ctx: &SourceContext,
) {
    let caret = match severity {
        Severity::Error => "^".red(),
        Severity::Warning => "^".yellow(),
    };
    let before_col: String = ctx
        .source_line
        .chars()
        .take(ctx.col().saturating_sub(1))
        .collect();
    let caret_offset = before_col.as_str().width();

    let _ = writeln!(writer, "{:>gutter$} {}", "", "|".blue());
    let _ = writeln!(
        writer,
        "{:>gutter$} {} {}",
        ctx.line().to_string().blue(),
        "|".blue(),
        ctx.source_line
    );
    gutter_line(writer, gutter, "|", format!("{:caret_offset$}{}", "", caret));
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let errors = issues.iter().filter(|i| i.is_error()).count();
    let warnings = issues.len() - errors;
    let _ = writeln!(
        writer,
        "{} {} problems ({}, {})",
        FAILURE_MARK.red(),
        issues.len(),
        plural(errors, "error", "errors").red(),
        plural(warnings, "warning", "warnings").yellow()
    );
}

/// Sort key: source and file issues by position, then locale-level issues.
fn sort_key<'a>(loc: &ReportLocation<'a>) -> (u8, &'a str, usize, usize) {
    match loc {
        ReportLocation::Source(ctx) => (0, ctx.file_path(), ctx.line(), ctx.col()),
        ReportLocation::File { path } => (0, *path, 0, 0),
        ReportLocation::Locale { locale } => (1, *locale, 0, 0),
    }
}

/// Width of the widest line number among source issues.
fn gutter_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|issue| match issue.location() {
            ReportLocation::Source(ctx) => Some(ctx.line().to_string().len()),
            _ => None,
        })
        .max()
        .unwrap_or(1)
}

fn compare_issues(a: &Issue, b: &Issue) -> std::cmp::Ordering {
    sort_key(&a.location())
        .cmp(&sort_key(&b.location()))
        .then_with(|| a.report_rule().cmp(&b.report_rule()))
}
