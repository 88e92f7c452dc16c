//! Payload inference over SIS response envelopes.
//!
//! SIS endpoints wrap their records differently: `{"student": {...}}`,
//! `{"students": {"@expansions": "...", "student": [...]}}`,
//! `{"record": [...], "name": "..."}` and so on. [`infer`] peels those
//! envelopes off given the entity name the caller asked for.
//!
//! Each pass either returns a terminal value or recurses into a strict
//! sub-value of the current document, so inference always terminates.

use serde_json::{Map, Value};

/// Sideband key listing the optional expansions an endpoint supports.
pub const EXPANSIONS_KEY: &str = "@expansions";

/// Sideband key listing the optional extensions an endpoint supports.
pub const EXTENSIONS_KEY: &str = "@extensions";

/// Result of [`infer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Inferred {
    /// The payload found inside the envelope.
    pub data: Value,
    /// Parsed `@expansions`, if any level carried it.
    pub expansions: Option<Vec<String>>,
    /// Parsed `@extensions`, if any level carried it.
    pub extensions: Option<Vec<String>>,
    /// Number of inference passes run, including the terminal one.
    pub passes: usize,
}

/// Infer the payload of `doc` for the entity `key`.
///
/// `key` is compared exactly against document keys; callers lower-case it.
///
/// 1. Sideband keys are stripped and parsed (the innermost occurrence wins).
/// 2. An empty object yields an empty list.
/// 3. `doc[key]` is returned as-is.
/// 4. A non-empty `doc[key + "s"]` is inferred again with `key`.
/// 5. A single-key object is inferred again on its only value with `""`.
/// 6. Anything else is returned unchanged.
///
/// Lists and scalars are never unwrapped.
pub fn infer(doc: Value, key: &str) -> Inferred {
    pass(
        doc,
        key,
        Inferred {
            data: Value::Null,
            expansions: None,
            extensions: None,
            passes: 0,
        },
    )
}

fn pass(doc: Value, key: &str, mut acc: Inferred) -> Inferred {
    acc.passes += 1;

    let mut map = match doc {
        Value::Object(map) => map,
        other => return acc.terminal(other),
    };

    take_sideband(&mut map, EXPANSIONS_KEY, &mut acc.expansions);
    take_sideband(&mut map, EXTENSIONS_KEY, &mut acc.extensions);

    if map.is_empty() {
        return acc.terminal(Value::Array(Vec::new()));
    }

    if let Some(value) = map.remove(key) {
        return acc.terminal(value);
    }

    let plural = format!("{key}s");
    if map.get(&plural).is_some_and(is_present) {
        if let Some(nested) = map.remove(&plural) {
            return pass(nested, key, acc);
        }
    }

    if map.len() != 1 {
        return acc.terminal(Value::Object(map));
    }

    let Some((only_key, only)) = map.into_iter().next() else {
        return acc.terminal(Value::Array(Vec::new()));
    };

    match only {
        Value::Object(_) | Value::Array(_) => pass(only, "", acc),
        Value::Null => acc.terminal(Value::Array(Vec::new())),
        Value::String(ref s) if s.is_empty() => acc.terminal(Value::Array(Vec::new())),
        scalar => {
            let mut single = Map::new();
            single.insert(only_key, scalar);
            acc.terminal(Value::Object(single))
        }
    }
}

impl Inferred {
    fn terminal(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

fn take_sideband(map: &mut Map<String, Value>, name: &str, slot: &mut Option<Vec<String>>) {
    if let Some(raw) = map.shift_remove(name) {
        *slot = Some(split_comma_list(&raw));
    }
}

/// Split a comma-separated sideband value into trimmed names.
///
/// A JSON array of strings is accepted as already split.
pub fn split_comma_list(raw: &Value) -> Vec<String> {
    match raw {
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::String(s) => s.split(',').map(|part| part.trim().to_string()).collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// Loose "has content" test used for the plural-key branch.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
