//! Deduplicator: collapses same-named messages, flags conflicting ones.

use std::collections::HashMap;

use crate::core::data::ProgramMessage;
use crate::issues::{DuplicateMessageIssue, Issue};

/// Unique-by-name messages plus one issue per conflicting occurrence.
#[derive(Debug, Default)]
pub struct Deduplicated {
    pub messages: Vec<ProgramMessage>,
    pub issues: Vec<Issue>,
}

/// Keep the first message of each name, in first-seen order.
///
/// A repeat with element-wise equal contents is dropped silently. A repeat
/// with different contents yields an issue pointing at both occurrences; every
/// conflict in the input is reported.
pub fn dedupe_messages(messages: Vec<ProgramMessage>) -> Deduplicated {
    let mut first_index: HashMap<String, usize> = HashMap::new();
    let mut result = Deduplicated::default();

    for message in messages {
        match first_index.get(message.name()) {
            None => {
                first_index.insert(message.name().to_string(), result.messages.len());
                result.messages.push(message);
            }
            Some(&index) => {
                let first = &result.messages[index];
                if first.contents() != message.contents() {
                    result.issues.push(
                        DuplicateMessageIssue {
                            context: message.context.clone(),
                            name: message.name().to_string(),
                            first: first.context.clone(),
                        }
                        .into(),
                    );
                }
            }
        }
    }
    result
}
