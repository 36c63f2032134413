//! Interchange formats exchanged with translators.
//!
//! - `xlb`: a single source-locale bundle out, one bundle per matched file in
//! - `xliff`: one XLIFF 1.2 document per target locale, both directions
//! - `xml`: reader and writer helpers shared by both

pub mod xlb;
pub mod xliff;
mod xml;

use std::path::Path;

use anyhow::Result;

use crate::config::{Config, InterchangeConfig};
use crate::core::data::{Bundle, ProgramMessage, TranslationMap};

pub use xlb::XlbFormatter;
pub use xliff::XliffFormatter;

/// Reads translated bundles and writes the files translators work on.
pub trait Formatter {
    /// Every bundle currently available on disk. A format may legitimately
    /// find nothing, for example before the first translation round.
    fn read_translations(&self) -> Result<Vec<Bundle>>;

    /// Write the canonical messages, plus any existing translations the format
    /// carries alongside them.
    fn write_output(&self, source: &[ProgramMessage], translations: &TranslationMap) -> Result<()>;
}

/// Build the formatter selected by `interchange.format`.
pub fn make_formatter(config: &Config, root_dir: &Path) -> Box<dyn Formatter> {
    match &config.interchange {
        InterchangeConfig::Xlb {
            output_file,
            translations_glob,
        } => Box::new(XlbFormatter::new(
            &config.source_locale,
            root_dir,
            output_file,
            translations_glob,
        )),
        InterchangeConfig::Xliff {
            xliff_dir,
            placeholder_style,
        } => Box::new(XliffFormatter::new(
            &config.source_locale,
            &config.target_locales,
            &root_dir.join(xliff_dir),
            *placeholder_style,
        )),
    }
}

/// Group bundles by locale. Bundles of the same locale are concatenated in
/// the order they were read.
pub fn translation_map(bundles: Vec<Bundle>) -> TranslationMap {
    let mut map = TranslationMap::new();
    for bundle in bundles {
        map.entry(bundle.locale).or_default().extend(bundle.messages);
    }
    map
}
