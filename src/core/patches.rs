//! PatchApplier: locale-scoped literal substitutions on stitched message text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One literal substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub before: String,
    pub after: String,
}

/// Patches keyed by locale, then message name; lists apply in order.
pub type Patches = HashMap<String, HashMap<String, Vec<Patch>>>;

/// Apply the patches registered for `(locale, name)` to `text`.
///
/// Each patch replaces the first remaining occurrence of `before`, repeatedly,
/// until none is left, before the next patch runs.
pub fn apply_patches(patches: &Patches, locale: &str, name: &str, text: &str) -> String {
    let Some(list) = patches.get(locale).and_then(|by_name| by_name.get(name)) else {
        return text.to_string();
    };
    let mut text = text.to_string();
    for patch in list {
        if patch.before.is_empty() {
            continue;
        }
        while let Some(pos) = text.find(&patch.before) {
            text.replace_range(pos..pos + patch.before.len(), &patch.after);
            // `after` reintroducing `before` would never terminate.
            if patch.after.contains(&patch.before) {
                text = replace_rest(text, pos + patch.after.len(), patch);
                break;
            }
        }
    }
    text
}

/// Replace the remaining occurrences after `from` in a single left-to-right pass.
fn replace_rest(text: String, from: usize, patch: &Patch) -> String {
    let (head, tail) = text.split_at(from);
    format!("{head}{}", tail.replace(&patch.before, &patch.after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn patches(locale: &str, name: &str, list: &[(&str, &str)]) -> Patches {
        let list = list
            .iter()
            .map(|(before, after)| Patch {
                before: before.to_string(),
                after: after.to_string(),
            })
            .collect();
        HashMap::from([(
            locale.to_string(),
            HashMap::from([(name.to_string(), list)]),
        )])
    }

    #[test]
    fn test_no_patches_is_identity() {
        let text = "Hola <b>Mundo</b>";
        assert_eq!(apply_patches(&Patches::new(), "es", "greeting", text), text);
        let p = patches("es", "greeting", &[("missing", "x")]);
        assert_eq!(apply_patches(&p, "es", "greeting", text), text);
    }

    #[test]
    fn test_scoped_by_locale_and_name() {
        let p = patches("es", "greeting", &[("Hola", "Buenas")]);
        assert_eq!(apply_patches(&p, "es", "greeting", "Hola"), "Buenas");
        assert_eq!(apply_patches(&p, "fr", "greeting", "Hola"), "Hola");
        assert_eq!(apply_patches(&p, "es", "farewell", "Hola"), "Hola");
    }

    #[test]
    fn test_removes_all_occurrences() {
        let p = patches("es", "m", &[("a", "")]);
        assert_eq!(apply_patches(&p, "es", "m", "banana"), "bnn");
    }

    #[test]
    fn test_patches_apply_in_order() {
        let p = patches("es", "m", &[("a", "b"), ("b", "c")]);
        assert_eq!(apply_patches(&p, "es", "m", "ab"), "cc");
    }

    #[test]
    fn test_self_containing_replacement_terminates() {
        let p = patches("es", "m", &[("a", "aa")]);
        assert_eq!(apply_patches(&p, "es", "m", "a-a"), "aa-aa");
    }
}
