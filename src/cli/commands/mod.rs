pub mod build;
pub mod extract;
mod helper;
pub mod init;

use std::path::PathBuf;

use crate::issues::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Extract,
    Build,
}

#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub message_count: usize,
    pub source_files: usize,
    /// Interchange files written; empty when fatal issues stopped the run.
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Runtime,
    Transform,
}

#[derive(Debug)]
pub struct BuildSummary {
    pub mode: BuildMode,
    pub message_count: usize,
    pub locale_count: usize,
    /// Output files written; empty when fatal issues stopped the run.
    pub written: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Build(BuildSummary),
}

/// Result of running `extract` or `build`.
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// All diagnostics, fatal or not.
    pub issues: Vec<Issue>,
    /// Number of files that failed to parse.
    pub parse_error_count: usize,
}
