use serde_json::Value;

use crate::record::Fields;

/// Collapses nested groups into a single-level mapping.
///
/// Nested keys are joined to their parent as `parent` + capitalized `child`, so
/// `{"camera": {"make": "Canon"}}` becomes `{"cameraMake": "Canon"}`.
///
/// Traversal stops for good at the first key equal to `stop_key`: neither that
/// key nor any key after it is visited. This is a truncation, not a filter.
/// The same stop key applies at every nesting level.
pub fn flatten(fields: &Fields, stop_key: &str) -> Fields {
    let mut result = Fields::new();
    for (key, value) in fields {
        if key == stop_key {
            break;
        }
        match value {
            Value::Object(group) => {
                for (nested_key, nested_value) in flatten(group, stop_key) {
                    result.insert(format!("{key}{}", capitalize(&nested_key)), nested_value);
                }
            }
            other => {
                result.insert(key.clone(), other.clone());
            }
        }
    }
    result
}

/// Upper-cases the first character and leaves the rest untouched.
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
