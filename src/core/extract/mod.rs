//! MessageExtractor: discovers `msg()` calls and turns them into canonical
//! [`ProgramMessage`](crate::core::data::ProgramMessage)s.
//!
//! - `api`: resolves identifiers to localization API exports (scoped, alias-aware)
//! - `call`: validates the shape of a `msg()` call, shared with the transformer
//! - `descriptions`: `msgdesc:` comment annotations
//! - `extractor`: the AST walk

pub mod api;
pub mod call;
pub mod descriptions;
pub mod extractor;

pub use api::{ApiExport, ApiScope, Binding, LOCALE_STATUS_EVENT_NAME, is_api_module};
pub use call::{CallError, MsgCall, classify_msg_call};
pub use extractor::{FileExtraction, extract_messages};
