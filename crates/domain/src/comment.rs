use serde_json::Value;

use crate::annotation::fold_lines;
use crate::datetime::to_exif_date;
use crate::error::ConvertError;
use crate::record::{Frame, Roll};

/// Roll key holding the synthesized summary comment.
pub const AGGREGATE_COMMENT_KEY: &str = "userComment";
/// Frame key holding the comment emitted as `UserComment`.
pub const FRAME_COMMENT_KEY: &str = "comment";
pub const SEPARATOR: &str = " | ";

const DEVELOPED_KEY: &str = "developed";

/// Roll fields without an EXIF tag of their own, as `(label, roll key)`.
pub const ROLL_COMMENT_FIELDS: &[(&str, &str)] = &[
    ("FilmStockMake", "filmStockMake"),
    ("FilmStockModel", "filmStockModel"),
    ("FilmStockIso", "filmStockIso"),
    ("DevelopedDate", DEVELOPED_KEY),
    ("DevelopedLab", "DevelopedLab"),
    ("DevelopedOrderNo", "DevelopedOrderNo"),
    ("DevelopedRollNo", "DevelopedRollNo"),
];

/// Frame annotation keys without an EXIF tag, as `(label, frame key)`.
pub const FRAME_COMMENT_FIELDS: &[(&str, &str)] = &[
    ("Filter", "filter"),
    ("Flash", "flash"),
    ("Tripod", "tripod"),
    ("Place", "place"),
];

/// Joins every populated [`ROLL_COMMENT_FIELDS`] entry as `Label: value`.
///
/// The development date is reduced to `YYYY-MM-DD`. Returns an empty string
/// when no entry is populated.
pub fn summary_comment(roll: &Roll) -> Result<String, ConvertError> {
    let mut entries = Vec::new();
    for &(label, key) in ROLL_COMMENT_FIELDS {
        let Some(text) = comment_text(roll.get(key)) else {
            continue;
        };
        let text = if key == DEVELOPED_KEY {
            to_exif_date(key, &text)?
        } else {
            text
        };
        entries.push(format!("{label}: {text}"));
    }
    Ok(entries.join(SEPARATOR))
}

/// Stores [`summary_comment`] into the roll. Called once per roll.
pub fn with_summary_comment(mut roll: Roll) -> Result<Roll, ConvertError> {
    let comment = summary_comment(&roll)?;
    roll.insert(AGGREGATE_COMMENT_KEY, Value::String(comment));
    Ok(roll)
}

/// Seeds the frame comment with the roll summary and appends the frame's own
/// [`FRAME_COMMENT_FIELDS`]. An empty result clears the comment.
pub fn with_frame_comment(mut frame: Frame, roll: &Roll) -> Frame {
    let mut comment = roll.text(AGGREGATE_COMMENT_KEY).unwrap_or_default().to_owned();
    for &(label, key) in FRAME_COMMENT_FIELDS {
        if let Some(text) = comment_text(frame.get(key)) {
            if !comment.is_empty() {
                comment.push_str(SEPARATOR);
            }
            comment.push_str(&format!("{label}: {text}"));
        }
    }
    if comment.is_empty() {
        frame.remove(FRAME_COMMENT_KEY);
    } else {
        frame.insert(FRAME_COMMENT_KEY, Value::String(comment));
    }
    frame
}

fn comment_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(fold_lines(text)),
        other => Some(other.to_string()),
    }
}
