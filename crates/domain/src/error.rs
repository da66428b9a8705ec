use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input record has no `frames` list")]
    MissingFrames,
    #[error("frame #{index} is not a key/value record")]
    InvalidFrame { index: usize },
    #[error("frame #{index} has no `count` ordinal")]
    MissingCount { index: usize },
    #[error("field `{field}` is not a `YYYY-MM-DDTHH:MM` timestamp: {value:?}")]
    InvalidTimestamp { field: String, value: String },
    #[error("unsupported file extension `{0}` (expected jpg, jpeg, tif or tiff)")]
    UnsupportedExtension(String),
}

impl ConvertError {
    pub fn timestamp<F: Into<String>, V: Into<String>>(field: F, value: V) -> Self {
        Self::InvalidTimestamp {
            field: field.into(),
            value: value.into(),
        }
    }
}
