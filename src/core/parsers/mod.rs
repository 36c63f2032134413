//! Parsers for program sources and template markup.
//!
//! - `source`: JS/TS module parser (uses swc for AST generation)
//! - `html`: best-effort HTML fragment parser for template text

pub mod html;
pub mod source;
