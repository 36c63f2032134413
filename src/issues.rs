//! Issue types for extraction and build results.
//!
//! Each issue is self-contained with everything the reporter needs to display
//! it. Errors are fatal: no output file is written while any exist.

use enum_dispatch::enum_dispatch;

use crate::core::data::SourceContext;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ParseError,
    InvalidMsgCall,
    DuplicateMessage,
    MissingTranslation,
    OrphanTranslation,
    PlaceholderMismatch,
    RuntimeOnlyApi,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::ParseError => write!(f, "parse-error"),
            Rule::InvalidMsgCall => write!(f, "invalid-msg-call"),
            Rule::DuplicateMessage => write!(f, "duplicate-message"),
            Rule::MissingTranslation => write!(f, "missing-translation"),
            Rule::OrphanTranslation => write!(f, "orphan-translation"),
            Rule::PlaceholderMismatch => write!(f, "placeholder-mismatch"),
            Rule::RuntimeOnlyApi => write!(f, "runtime-only-api"),
        }
    }
}

// ============================================================
// Issue Types - Source Code (SourceContext)
// ============================================================

/// A `msg()` call with an unsupported shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMsgCallIssue {
    pub context: SourceContext,
    pub message: String,
}

impl InvalidMsgCallIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::InvalidMsgCall
    }
}

/// The same message name used with different contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateMessageIssue {
    /// The conflicting occurrence.
    pub context: SourceContext,
    pub name: String,
    /// Where the name was first seen.
    pub first: SourceContext,
}

impl DuplicateMessageIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::DuplicateMessage
    }
}

/// No translation for a canonical message; the source text is used instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslationIssue {
    /// Where the canonical message is defined.
    pub context: SourceContext,
    pub locale: String,
    pub name: String,
}

impl MissingTranslationIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MissingTranslation
    }
}

/// Whether a placeholder appeared in the translation without being in the
/// source, or the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderMismatchKind {
    Unexpected,
    Missing,
}

impl std::fmt::Display for PlaceholderMismatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceholderMismatchKind::Unexpected => write!(f, "unexpected"),
            PlaceholderMismatchKind::Missing => write!(f, "missing"),
        }
    }
}

/// A translation whose placeholders differ from the canonical message's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMismatchIssue {
    /// Where the canonical message is defined.
    pub context: SourceContext,
    pub locale: String,
    pub name: String,
    pub placeholder: String,
    pub kind: PlaceholderMismatchKind,
}

impl PlaceholderMismatchIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::PlaceholderMismatch
    }
}

/// `configureLocalization` used while building in transform mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOnlyApiIssue {
    pub context: SourceContext,
}

impl RuntimeOnlyApiIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::RuntimeOnlyApi
    }
}

// ============================================================
// Issue Types - Interchange Files
// ============================================================

/// A translated message with no canonical counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanTranslationIssue {
    pub locale: String,
    pub name: String,
}

impl OrphanTranslationIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::OrphanTranslation
    }
}

// ============================================================
// Special Issue Types
// ============================================================

/// File could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A problem found while extracting or building.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    ParseError(ParseErrorIssue),
    InvalidMsgCall(InvalidMsgCallIssue),
    DuplicateMessage(DuplicateMessageIssue),
    MissingTranslation(MissingTranslationIssue),
    OrphanTranslation(OrphanTranslationIssue),
    PlaceholderMismatch(PlaceholderMismatchIssue),
    RuntimeOnlyApi(RuntimeOnlyApiIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

/// Whether any issue is fatal.
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(Issue::is_error)
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only (for ParseError - no line context).
    File { path: &'a str },
    /// Not tied to a file, only to a target locale.
    Locale { locale: &'a str },
}

/// Trait for types that can be reported to CLI.
///
/// Uses `enum_dispatch` for zero-cost dispatch on the `Issue` enum.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    /// Severity level.
    fn report_severity(&self) -> Severity;

    /// Rule identifier.
    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for InvalidMsgCallIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for DuplicateMessageIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!(
            "Message {} was already defined with different text",
            self.name
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("use identical text wherever the name is used, or pick a different name")
    }

    fn details(&self) -> Option<String> {
        Some(format!("first defined at {}", self.first.location))
    }
}

impl Report for MissingTranslationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!(
            "{} message {} is missing, using canonical text as fallback",
            self.locale, self.name
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for OrphanTranslationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Locale {
            locale: &self.locale,
        }
    }

    fn message(&self) -> String {
        format!(
            "{} message {} does not exist in canonical messages, skipping",
            self.locale, self.name
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for PlaceholderMismatchIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!(
            "Placeholder error in {} localization of {}: {} \"{}\"",
            self.locale, self.name, self.kind, self.placeholder
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("placeholders may be moved but must be kept exactly as in the source text")
    }
}

impl Report for RuntimeOnlyApiIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        "Cannot use configureLocalization in transform mode. Use configureTransformLocalization instead."
            .to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Tests
// ============================================================
