//! The localization pipeline.
//!
//! Sources are scanned and parsed, `msg()` calls are extracted into canonical
//! messages, deduplicated, then either written out for translators or combined
//! with translations into per-locale output.
//!
//! - `scan` / `parsers`: input discovery and AST construction
//! - `encode` / `template`: template text to Message contents and back
//! - `extract` / `dedupe`: canonical message collection
//! - `patches` / `validate`: translation adjustments and coverage checks
//! - `runtime` / `transform`: the two output strategies
//! - `context`: lazily computed project state shared by commands

pub mod context;
pub mod data;
pub mod dedupe;
pub mod encode;
pub mod extract;
pub mod parsers;
pub mod patches;
pub mod runtime;
pub mod scan;
pub mod template;
pub mod transform;
pub mod validate;

pub use context::{Extraction, ProjectContext};
