use serde_json::Value;
use serde_yaml::value::TaggedValue;
use serde_yaml::Value as YamlValue;
use tracing::{debug, warn};

use crate::flatten::capitalize;
use crate::record::{Fields, Frame, Roll};

/// Frame annotation keys folded into the description instead of stored.
pub const SUBJECT_KEY: &str = "Subject";
pub const NOTES_KEY: &str = "Notes";
pub const DESCRIPTION_KEY: &str = "description";

/// A decoded annotation field.
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    /// A `key: value` block.
    Block(Fields),
    /// Free prose that decoded to a single scalar.
    Prose(String),
    Empty,
}

/// Decodes an annotation written in YAML-style indented `key: value` syntax.
pub fn parse_annotation(text: &str) -> Result<Annotation, serde_yaml::Error> {
    let parsed: YamlValue = serde_yaml::from_str(text)?;
    Ok(match yaml_to_json(parsed) {
        Value::Object(block) => Annotation::Block(block),
        Value::Null | Value::Array(_) => Annotation::Empty,
        Value::String(prose) => Annotation::Prose(prose),
        scalar => Annotation::Prose(scalar.to_string()),
    })
}

/// Merges a roll-level annotation into `roll`.
///
/// Nested blocks are flattened with the same `parent` + capitalized `child`
/// naming as the record itself, top-level keys included, and every resulting
/// key overwrites the roll's own. An undecodable block is logged and ignored.
pub fn merge_roll_annotation(mut roll: Roll, text: &str) -> Roll {
    match parse_annotation(text) {
        Ok(Annotation::Block(block)) => merge_block("", block, &mut roll),
        Ok(_) => debug!("roll note is not a key/value block, nothing to merge"),
        Err(err) => warn!(error = %err, "failed to parse roll note, ignoring it"),
    }
    roll
}

fn merge_block(prefix: &str, block: Fields, roll: &mut Roll) {
    for (key, value) in block {
        let name = format!("{prefix}{}", capitalize(&key));
        match value {
            Value::Object(nested) => merge_block(&name, nested, roll),
            other => roll.insert(name, other),
        }
    }
}

/// Merges a frame-level annotation into `frame`.
///
/// Only the top level of the block is read. `Subject` and `Notes` are appended
/// to the frame description as `"<Label>: <text> "` in block order; any other
/// key is stored lower-cased, replacing the frame's value. Prose without any
/// keys becomes the description. An undecodable block is logged and ignored.
pub fn merge_frame_annotation(mut frame: Frame, text: &str) -> Frame {
    match parse_annotation(text) {
        Ok(Annotation::Block(block)) => {
            for (key, value) in block {
                if key == SUBJECT_KEY || key == NOTES_KEY {
                    append_description(&mut frame, &key, &value);
                } else {
                    frame.insert(key.to_lowercase(), value);
                }
            }
        }
        Ok(Annotation::Prose(prose)) => {
            frame.insert(DESCRIPTION_KEY, Value::String(fold_lines(&prose)));
        }
        Ok(Annotation::Empty) => {}
        Err(err) => warn!(
            error = %err,
            count = ?frame.count(),
            "failed to parse frame note, ignoring it"
        ),
    }
    frame
}

fn append_description(frame: &mut Frame, label: &str, value: &Value) {
    let text = match value {
        Value::Null => return,
        Value::String(text) => fold_lines(text),
        other => other.to_string(),
    };
    let mut description = frame.text(DESCRIPTION_KEY).unwrap_or_default().to_owned();
    description.push_str(&format!("{label}: {text} "));
    frame.insert(DESCRIPTION_KEY, Value::String(description));
}

/// Drops trailing line breaks and replaces the rest with single spaces.
pub(crate) fn fold_lines(text: &str) -> String {
    text.trim_end_matches(['\r', '\n'])
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}

fn yaml_to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(flag) => Value::Bool(flag),
        YamlValue::Number(number) => {
            if let Some(int) = number.as_i64() {
                Value::from(int)
            } else if let Some(uint) = number.as_u64() {
                Value::from(uint)
            } else {
                number.as_f64().map(Value::from).unwrap_or(Value::Null)
            }
        }
        YamlValue::String(text) => Value::String(text),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key_to_string(key), yaml_to_json(value)))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => {
            let TaggedValue { value, .. } = *tagged;
            yaml_to_json(value)
        }
    }
}

fn key_to_string(key: YamlValue) -> String {
    match yaml_to_json(key) {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
