//! litloc - build-time localization for Lit templates
//!
//! litloc finds `msg()` calls in a JavaScript/TypeScript program, writes them
//! out for translators (XLB or XLIFF), and turns translations back into either
//! per-locale lookup modules (runtime mode) or one rewritten copy of the
//! program per locale (transform mode).
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (`extract`, `build`, `init`)
//! - `config`: Configuration file loading and parsing
//! - `core`: The pipeline (scan, parse, extract, dedupe, generate, transform)
//! - `formatters`: Interchange file formats
//! - `issues`: Issue type definitions and reporting

pub mod cli;
pub mod config;
pub mod core;
pub mod formatters;
pub mod issues;
