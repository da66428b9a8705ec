use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::annotation::fold_lines;
use crate::comment::with_frame_comment;
use crate::datetime::to_exif_datetime;
use crate::error::ConvertError;
use crate::geo::Coordinate;
use crate::record::{Frame, Roll};

/// How a source value is turned into tag values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    Plain,
    /// `YYYY-MM-DDTHH:MM` to EXIF `YYYY:MM:DD HH:MM`.
    Timestamp,
    /// Drops embedded `"` from quoted fractions such as `"1/125"`.
    StripQuotes,
    /// Expands to the four GPS position tags.
    Location,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagMapping {
    pub tag: &'static str,
    pub key: &'static str,
    pub transform: Transform,
}

impl TagMapping {
    pub const fn new(tag: &'static str, key: &'static str, transform: Transform) -> Self {
        Self {
            tag,
            key,
            transform,
        }
    }
}

pub const GPS_LONGITUDE: &str = "GPSLongitude";
pub const GPS_LONGITUDE_REF: &str = "GPSLongitudeRef";
pub const GPS_LATITUDE: &str = "GPSLatitude";
pub const GPS_LATITUDE_REF: &str = "GPSLatitudeRef";

/// Frame tags in emission order.
pub const FRAME_TAGS: &[TagMapping] = &[
    TagMapping::new("DateTimeOriginal", "date", Transform::Timestamp),
    TagMapping::new("ShutterSpeedValue", "shutter", Transform::StripQuotes),
    TagMapping::new("ExposureTime", "shutter", Transform::StripQuotes),
    TagMapping::new("ApertureValue", "aperture", Transform::Plain),
    TagMapping::new("FNumber", "aperture", Transform::Plain),
    TagMapping::new("GPS", "location", Transform::Location),
    TagMapping::new("FocalLength", "focalLength", Transform::Plain),
    TagMapping::new("LightSource", "lightSource", Transform::Plain),
    TagMapping::new("ImageDescription", "description", Transform::Plain),
    TagMapping::new("UserComment", "comment", Transform::Plain),
];

/// Roll tags in emission order, after all frame tags.
pub const ROLL_TAGS: &[TagMapping] = &[
    TagMapping::new("Make", "cameraMake", Transform::Plain),
    TagMapping::new("Model", "cameraModel", Transform::Plain),
    TagMapping::new("Artist", "artist", Transform::Plain),
    TagMapping::new("Copyright", "copyright", Transform::Plain),
];

/// A resolved `tag=value` pair. `value` is rendered for the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub tag: &'static str,
    pub value: String,
}

impl Assignment {
    /// A string value, wrapped in double quotes.
    pub fn text(tag: &'static str, value: &str) -> Self {
        Self {
            tag,
            value: quote(value),
        }
    }

    /// Strings are quoted, numbers and booleans are written bare.
    pub fn from_value(tag: &'static str, value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::text(tag, text)),
            Value::Number(number) => Some(Self {
                tag,
                value: number.to_string(),
            }),
            Value::Bool(flag) => Some(Self {
                tag,
                value: flag.to_string(),
            }),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{}={}", self.tag, self.value)
    }
}

/// Wraps `value` in double quotes, escaping what a POSIX shell would expand.
///
/// Line breaks become single spaces so a command never spans several lines.
pub fn quote(value: &str) -> String {
    let folded = fold_lines(value);
    let mut quoted = String::with_capacity(folded.len() + 2);
    quoted.push('"');
    for ch in folded.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Resolves every tag for one frame: frame tags first, then roll tags.
///
/// Absent and null fields are skipped. A malformed timestamp fails the frame.
pub fn assignments(frame: &Frame, roll: &Roll) -> Result<Vec<Assignment>, ConvertError> {
    let frame = with_frame_comment(frame.clone(), roll);
    let mut out = Vec::new();
    for mapping in FRAME_TAGS {
        resolve(mapping, frame.get(mapping.key), &mut out)?;
    }
    for mapping in ROLL_TAGS {
        resolve(mapping, roll.get(mapping.key), &mut out)?;
    }
    Ok(out)
}

fn resolve(
    mapping: &TagMapping,
    value: Option<&Value>,
    out: &mut Vec<Assignment>,
) -> Result<(), ConvertError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(()),
        Some(value) => value,
    };
    match mapping.transform {
        Transform::Timestamp => {
            let text = value
                .as_str()
                .ok_or_else(|| ConvertError::timestamp(mapping.key, value.to_string()))?;
            out.push(Assignment::text(mapping.tag, &to_exif_datetime(mapping.key, text)?));
        }
        Transform::StripQuotes => {
            let assignment = match value {
                Value::String(text) => Some(Assignment::text(mapping.tag, &text.replace('"', ""))),
                other => Assignment::from_value(mapping.tag, other),
            };
            out.extend(assignment);
        }
        Transform::Location => {
            let Some(position) = Coordinate::from_value(value).and_then(|c| c.position()) else {
                debug!(key = mapping.key, "incomplete location, skipping GPS tags");
                return Ok(());
            };
            out.push(Assignment::text(GPS_LONGITUDE, &position.longitude.dms.to_string()));
            out.push(Assignment::text(GPS_LONGITUDE_REF, position.longitude.hemisphere.letter()));
            out.push(Assignment::text(GPS_LATITUDE, &position.latitude.dms.to_string()));
            out.push(Assignment::text(GPS_LATITUDE_REF, position.latitude.hemisphere.letter()));
        }
        Transform::Plain => match Assignment::from_value(mapping.tag, value) {
            Some(assignment) => out.push(assignment),
            None => debug!(key = mapping.key, "value is not a scalar, skipping tag"),
        },
    }
    Ok(())
}
