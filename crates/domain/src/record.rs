use serde_json::{Map, Value};

use crate::error::ConvertError;
use crate::flatten::flatten;

/// Ordered key/value mapping; iteration follows input key order.
pub type Fields = Map<String, Value>;

pub const FRAMES_KEY: &str = "frames";
pub const NOTE_KEY: &str = "note";
pub const COUNT_KEY: &str = "count";

/// Per-roll metadata shared by every frame of one film roll.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roll {
    pub(crate) fields: Fields,
}

impl Roll {
    pub fn new(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String value of `key`, if present and textual.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }
}

/// Metadata of a single exposure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub(crate) fields: Fields,
}

impl Frame {
    pub fn new(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Free-text annotation attached to the frame.
    pub fn note(&self) -> Option<&str> {
        self.text(NOTE_KEY)
    }

    /// Ordinal of the frame on the roll.
    pub fn count(&self) -> Option<u64> {
        self.fields.get(COUNT_KEY).and_then(Value::as_u64)
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.fields.remove(key);
    }
}

/// A decoded roll export: the top-level fields and the frame list.
#[derive(Clone, Debug, PartialEq)]
pub struct RollRecord {
    pub fields: Fields,
    pub frames: Vec<Frame>,
}

impl RollRecord {
    pub fn from_value(value: Value) -> Result<Self, ConvertError> {
        let Value::Object(mut fields) = value else {
            return Err(ConvertError::MissingFrames);
        };
        let frames = match fields.get_mut(FRAMES_KEY).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Err(ConvertError::MissingFrames),
        };
        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(Frame::new(map)),
                _ => Err(ConvertError::InvalidFrame { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fields, frames })
    }

    /// The roll-level annotation block, if any.
    pub fn note(&self) -> Option<&str> {
        self.fields.get(NOTE_KEY).and_then(Value::as_str)
    }

    /// Flattens every top-level group up to the frame list into a [`Roll`].
    pub fn flattened_roll(&self) -> Roll {
        Roll::new(flatten(&self.fields, FRAMES_KEY))
    }
}
