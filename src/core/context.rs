use std::{
    cell::OnceCell,
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use colored::Colorize;
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{
        data::ProgramMessage,
        dedupe::dedupe_messages,
        extract::extract_messages,
        parsers::source::{ParsedSource, parse_source},
        scan::scan_files,
    },
    issues::{Issue, ParseErrorIssue},
};

/// Canonical messages of the whole program plus everything that went wrong
/// while finding them.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Unique by name, in first-seen order (files in path order).
    pub messages: Vec<ProgramMessage>,
    /// Parse errors, malformed calls and duplicate conflicts.
    pub issues: Vec<Issue>,
}

/// Project-wide pipeline state shared by `extract` and `build`.
///
/// Parsing and extraction run lazily, on first access, so commands only pay
/// for what they use.
pub struct ProjectContext {
    pub config: Config,

    /// Directory the config's relative paths are resolved against.
    pub root_dir: PathBuf,

    /// Program modules, relative to `root_dir`.
    pub files: BTreeSet<String>,

    pub verbose: bool,

    parsed_files: OnceCell<BTreeMap<String, ParsedSource>>,
    parse_errors: OnceCell<Vec<ParseErrorIssue>>,
    extraction: OnceCell<Extraction>,
}

impl ProjectContext {
    /// Load the configuration the command line points at, then scan inputs.
    pub fn from_args(common_args: &CommonArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let loaded = load_config(&start_dir, common_args.config.as_deref())?;

        if common_args.verbose {
            match &loaded.path {
                Some(path) => eprintln!("{} using {}", "info:".bold().cyan(), path.display()),
                None => eprintln!(
                    "{} No lit-localize.json found, using default configuration",
                    "info:".bold().cyan()
                ),
            }
        }

        Ok(Self::new(loaded.config, loaded.root_dir, common_args.verbose))
    }

    pub fn new(config: Config, root_dir: PathBuf, verbose: bool) -> Self {
        let scan = scan_files(&root_dir, &config.input_files, &config.ignores, verbose);

        if scan.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }
        if verbose {
            eprintln!(
                "{} scanned {} input file(s)",
                "info:".bold().cyan(),
                scan.files.len()
            );
        }

        Self {
            config,
            root_dir,
            files: scan.files,
            verbose,
            parsed_files: OnceCell::new(),
            parse_errors: OnceCell::new(),
            extraction: OnceCell::new(),
        }
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    /// Parsed AST for each input file (lazy initialization).
    ///
    /// Reading and parsing run in parallel, each file with its own SourceMap.
    pub fn parsed_files(&self) -> &BTreeMap<String, ParsedSource> {
        self.parsed_files.get_or_init(|| {
            let root_dir = &self.root_dir;
            let parse_results: Vec<_> = self
                .files
                .par_iter()
                .map(|file_path| {
                    let result = std::fs::read_to_string(root_dir.join(file_path))
                        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_path, e))
                        .and_then(|code| {
                            parse_source(code, file_path, Arc::new(swc_common::SourceMap::default()))
                        });
                    (file_path.clone(), result)
                })
                .collect();

            let mut parsed = BTreeMap::new();
            let mut errors = Vec::new();
            for (file_path, result) in parse_results {
                match result {
                    Ok(p) => {
                        parsed.insert(file_path, p);
                    }
                    Err(e) => {
                        if self.verbose {
                            eprintln!("{} {} - {}", "warning:".bold().yellow(), file_path, e);
                        }
                        errors.push(ParseErrorIssue {
                            file_path,
                            error: e.to_string(),
                        });
                    }
                }
            }

            let _ = self.parse_errors.set(errors);
            parsed
        })
    }

    /// Files that could not be read or parsed.
    pub fn parse_errors(&self) -> &[ParseErrorIssue] {
        self.parsed_files();
        self.parse_errors.get_or_init(Vec::new)
    }

    /// Extract and dedupe messages across all files (lazy initialization).
    pub fn extraction(&self) -> &Extraction {
        self.extraction.get_or_init(|| {
            let api_modules = &self.config.api_modules;
            let per_file: Vec<_> = self
                .parsed_files()
                .par_iter()
                .map(|(path, parsed)| extract_messages(parsed, path, api_modules))
                .collect();

            let mut issues: Vec<Issue> = self
                .parse_errors()
                .iter()
                .cloned()
                .map(Issue::from)
                .collect();
            let mut messages = Vec::new();
            for file in per_file {
                messages.extend(file.messages);
                issues.extend(file.issues);
            }

            let deduped = dedupe_messages(messages);
            issues.extend(deduped.issues);

            if self.verbose {
                eprintln!(
                    "{} extracted {} message(s)",
                    "info:".bold().cyan(),
                    deduped.messages.len()
                );
            }

            Extraction {
                messages: deduped.messages,
                issues,
            }
        })
    }
}
