//! Input module discovery.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

const PROGRAM_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mts", "mjs"];

/// `*` or `?` makes a pattern a glob; anything else is a literal path.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

pub struct ScanResult {
    /// Root-relative, `/`-separated, sorted.
    pub files: BTreeSet<String>,
    /// Walk entries that could not be read.
    pub skipped_count: usize,
}

fn warn(verbose: bool, message: std::fmt::Arguments) {
    if verbose {
        eprintln!("{} {}", "warning:".bold().yellow(), message);
    }
}

/// Compiled `ignores`: globs match the root-relative path, literals match by
/// path prefix.
struct Ignores {
    prefixes: Vec<PathBuf>,
    globs: Vec<Pattern>,
}

impl Ignores {
    fn compile(base_dir: &Path, patterns: &[String], verbose: bool) -> Self {
        let mut ignores = Ignores {
            prefixes: Vec::new(),
            globs: Vec::new(),
        };
        for raw in patterns {
            if !is_glob_pattern(raw) {
                ignores.prefixes.push(base_dir.join(raw));
                continue;
            }
            match Pattern::new(raw) {
                Ok(pattern) => ignores.globs.push(pattern),
                Err(e) => warn(verbose, format_args!("Invalid ignore pattern '{raw}': {e}")),
            }
        }
        ignores
    }

    fn excludes(&self, path: &Path, relative: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
            || self.globs.iter().any(|pattern| pattern.matches(relative))
    }
}

/// Walk roots for `includes`; the base directory itself when there are none.
fn include_roots(base_dir: &Path, includes: &[String], verbose: bool) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }
    let mut roots = Vec::new();
    for include in includes {
        let joined = base_dir.join(include);
        if is_glob_pattern(include) {
            match glob(&joined.to_string_lossy()) {
                Ok(matches) => roots.extend(matches.flatten()),
                Err(e) => warn(verbose, format_args!("Invalid glob pattern '{include}': {e}")),
            }
        } else if joined.exists() {
            roots.push(joined);
        } else {
            warn(
                verbose,
                format_args!("Include path does not exist: {}", joined.display()),
            );
        }
    }
    roots
}

/// Collect program modules under `base_dir`.
///
/// Includes may name files, directories or globs matching either. Declaration
/// files (`.d.ts`) are never inputs.
pub fn scan_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    verbose: bool,
) -> ScanResult {
    let ignores = Ignores::compile(base_dir, ignore_patterns, verbose);
    let mut result = ScanResult {
        files: BTreeSet::new(),
        skipped_count: 0,
    };

    for root in include_roots(base_dir, includes, verbose) {
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    result.skipped_count += 1;
                    warn(verbose, format_args!("Cannot access path: {e}"));
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() || !is_program_file(path) {
                continue;
            }
            let relative = relative_path(base_dir, path);
            if !ignores.excludes(path, &relative) {
                result.files.insert(relative);
            }
        }
    }
    result
}

fn relative_path(base_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_program_file(path: &Path) -> bool {
    let is_declaration = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".d.ts"));
    !is_declaration
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| PROGRAM_EXTENSIONS.contains(&ext))
}
