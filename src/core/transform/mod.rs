//! AstTransformer: per-locale source rewriting for transform-mode output.
//!
//! - `flatten`: fragment lists and minimal template rebuilding
//! - `transformer`: the `VisitMut` pass replacing API usage
//! - `emit`: per-locale code generation

pub mod emit;
pub mod flatten;
pub mod transformer;

pub use emit::{LocaleOutput, TransformInput, TransformedFile, transform_file, transform_project};
pub use flatten::{Fragment, build_template_expr};
pub use transformer::LocaleTransformer;
