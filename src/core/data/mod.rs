//! Core data types used across the pipeline.
//!
//! - `message`: the Message model (Placeholder, Content, Message, ProgramMessage, Bundle)
//! - `source`: source code location types (SourceContext, SourceLocation)

pub mod message;
pub mod source;

pub use message::{
    Bundle, Content, Message, Placeholder, ProgramMessage, TranslationMap, make_message_map,
    sort_program_messages,
};
pub use source::{SourceContext, SourceLocation};
