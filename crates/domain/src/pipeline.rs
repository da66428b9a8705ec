use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::annotation::{merge_frame_annotation, merge_roll_annotation};
use crate::command::{command_line, render_script, CommandOptions};
use crate::comment::with_summary_comment;
use crate::error::ConvertError;
use crate::mapping::assignments;
use crate::record::{Frame, Roll, RollRecord};

pub const ARTIST_KEY: &str = "artist";
pub const COPYRIGHT_KEY: &str = "copyright";

/// Photographer details written to every frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersonalData {
    pub artist: Option<String>,
    pub copyright: Option<String>,
}

pub struct ExiftoolPipeline {
    options: CommandOptions,
    personal: PersonalData,
}

impl ExiftoolPipeline {
    pub fn new(options: CommandOptions, personal: PersonalData) -> Self {
        Self { options, personal }
    }

    /// Flattens the record, merges the roll note, adds personal data and the
    /// summary comment. The result is read-only for frame processing.
    pub fn build_roll(&self, record: &RollRecord) -> Result<Roll, ConvertError> {
        let mut roll = record.flattened_roll();
        if let Some(note) = record.note() {
            roll = merge_roll_annotation(roll, note);
        }
        if let Some(artist) = &self.personal.artist {
            roll.insert(ARTIST_KEY, Value::String(artist.clone()));
        }
        if let Some(copyright) = &self.personal.copyright {
            roll.insert(COPYRIGHT_KEY, Value::String(copyright.clone()));
        }
        with_summary_comment(roll)
    }

    /// Renders the command for the frame at `index`.
    pub fn frame_command(
        &self,
        index: usize,
        frame: &Frame,
        roll: &Roll,
    ) -> Result<String, ConvertError> {
        let count = frame.count().ok_or(ConvertError::MissingCount { index })?;
        let frame = match frame.note() {
            Some(note) => merge_frame_annotation(frame.clone(), note),
            None => frame.clone(),
        };
        let assignments = assignments(&frame, roll)?;
        debug!(count, tags = assignments.len(), "frame resolved");
        Ok(command_line(&assignments, count, &self.options))
    }

    /// One command line per frame, in input order.
    #[instrument(skip_all, fields(frames = record.frames.len()))]
    pub fn commands(&self, record: &RollRecord) -> Result<Vec<String>, ConvertError> {
        let roll = self.build_roll(record)?;
        let lines = record
            .frames
            .iter()
            .enumerate()
            .map(|(index, frame)| self.frame_command(index, frame, &roll))
            .collect::<Result<Vec<_>, _>>()?;
        info!(commands = lines.len(), "rendered exiftool commands");
        Ok(lines)
    }

    /// The complete script; nothing is returned if any frame fails.
    pub fn render(&self, record: &RollRecord) -> Result<String, ConvertError> {
        Ok(render_script(&self.commands(record)?))
    }
}

impl Default for ExiftoolPipeline {
    fn default() -> Self {
        Self::new(CommandOptions::default(), PersonalData::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FileExtension;
    use serde_json::json;

    fn record(value: Value) -> RollRecord {
        RollRecord::from_value(value).unwrap()
    }

    fn helsinki_roll() -> Value {
        json!({
            "name": "Helsinki",
            "date": "2021-05-01T09:00",
            "developed": "2021-05-20T12:00",
            "note": "Developed:\n  Lab: Kamerastore\n  OrderNo: 4411\n",
            "camera": { "make": "Canon", "model": "A-1" },
            "filmStock": { "make": "ILFORD", "model": "HP5+", "iso": 400 },
            "frames": [
                {
                    "count": 1,
                    "date": "2021-05-03T14:30",
                    "shutter": "\"1/125\"",
                    "aperture": "5.6",
                    "location": { "latitude": 60.1699, "longitude": 24.9414 },
                    "focalLength": 28,
                    "note": "Subject: Cathedral\nFilter: Yellow\n"
                },
                {
                    "count": 2,
                    "date": "2021-05-03T14:35",
                    "aperture": "8"
                }
            ]
        })
    }

    #[test]
    fn renders_one_line_per_frame() {
        let pipeline = ExiftoolPipeline::new(
            CommandOptions::default(),
            PersonalData {
                artist: Some("Tommi".to_string()),
                copyright: None,
            },
        );
        let script = pipeline.render(&record(helsinki_roll())).unwrap();
        let comment = "FilmStockMake: ILFORD | FilmStockModel: HP5+ | FilmStockIso: 400 | \
                       DevelopedDate: 2021-05-20 | DevelopedLab: Kamerastore | DevelopedOrderNo: 4411";
        let expected = format!(
            "exiftool -DateTimeOriginal=\"2021:05:03 14:30\" -ShutterSpeedValue=\"1/125\" \
             -ExposureTime=\"1/125\" -ApertureValue=\"5.6\" -FNumber=\"5.6\" \
             -GPSLongitude=\"24 56 29.04000\" -GPSLongitudeRef=\"E\" \
             -GPSLatitude=\"60 10 11.64000\" -GPSLatitudeRef=\"N\" -FocalLength=28 \
             -ImageDescription=\"Subject: Cathedral \" -UserComment=\"{comment} | Filter: Yellow\" \
             -Make=\"Canon\" -Model=\"A-1\" -Artist=\"Tommi\" *001.tif\n\n\
             exiftool -DateTimeOriginal=\"2021:05:03 14:35\" -ApertureValue=\"8\" -FNumber=\"8\" \
             -UserComment=\"{comment}\" -Make=\"Canon\" -Model=\"A-1\" -Artist=\"Tommi\" *002.tif\n\n"
        );
        assert_eq!(script, expected);
    }

    #[test]
    fn frame_annotations_do_not_leak() {
        let pipeline = ExiftoolPipeline::default();
        let record = record(helsinki_roll());
        let roll = pipeline.build_roll(&record).unwrap();
        let before = roll.clone();
        let lines = pipeline.commands(&record).unwrap();
        assert_eq!(pipeline.build_roll(&record).unwrap(), before);
        assert!(lines[0].contains("Filter: Yellow"));
        assert!(!lines[1].contains("Filter"));
        assert!(!lines[1].contains("ImageDescription"));
    }

    #[test]
    fn two_frames_differ_only_by_pattern() {
        let pipeline = ExiftoolPipeline::new(
            CommandOptions {
                verbose: true,
                extension: FileExtension::Jpg,
            },
            PersonalData::default(),
        );
        let record = record(json!({
            "camera": { "make": "Nikon" },
            "frames": [{ "count": 7 }, { "count": 8 }]
        }));
        let script = pipeline.render(&record).unwrap();
        assert_eq!(
            script,
            "exiftool -v -Make=\"Nikon\" *007.jpg\n\nexiftool -v -Make=\"Nikon\" *008.jpg\n\n"
        );
    }

    #[test]
    fn frame_without_location_has_no_gps_tags() {
        let record = record(json!({ "frames": [{ "count": 1, "aperture": "2" }] }));
        let lines = ExiftoolPipeline::default().commands(&record).unwrap();
        assert_eq!(lines, vec!["exiftool -ApertureValue=\"2\" -FNumber=\"2\" *001.tif"]);
    }

    #[test]
    fn frame_note_wins_over_frame_field() {
        let record = record(json!({
            "frames": [{ "count": 1, "aperture": "2.8", "note": "aperture: 11" }]
        }));
        let lines = ExiftoolPipeline::default().commands(&record).unwrap();
        assert_eq!(lines[0], "exiftool -ApertureValue=11 -FNumber=11 *001.tif");
    }

    #[test]
    fn malformed_note_does_not_abort() {
        let record = record(json!({
            "note": "Developed: [oops",
            "frames": [{ "count": 1, "note": "Subject: \"open", "focalLength": 50 }]
        }));
        let lines = ExiftoolPipeline::default().commands(&record).unwrap();
        assert_eq!(lines, vec!["exiftool -FocalLength=50 *001.tif"]);
    }

    #[test]
    fn round_coordinates_carry_seconds() {
        let record = record(json!({
            "frames": [{ "count": 1, "location": { "longitude": 1.2, "latitude": 60.2 } }]
        }));
        let lines = ExiftoolPipeline::default().commands(&record).unwrap();
        assert_eq!(
            lines[0],
            "exiftool -GPSLongitude=\"1 12 0.00000\" -GPSLongitudeRef=\"E\" \
             -GPSLatitude=\"60 12 0.00000\" -GPSLatitudeRef=\"N\" *001.tif"
        );
    }

    #[test]
    fn multi_line_values_stay_on_one_line() {
        let record = record(json!({
            "note": "Developed:\n  Lab: |\n    Foto\n    Lab\n",
            "camera": { "model": "A-1\nProgram" },
            "frames": [
                { "count": 1, "note": "Place: |\n  Old\n  Town\n" },
                { "count": 2 }
            ]
        }));
        let script = ExiftoolPipeline::default().render(&record).unwrap();
        let lines: Vec<_> = script.lines().filter(|line| !line.is_empty()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "exiftool -UserComment=\"DevelopedLab: Foto Lab | Place: Old Town\" \
             -Model=\"A-1 Program\" *001.tif"
        );
        assert_eq!(
            lines[1],
            "exiftool -UserComment=\"DevelopedLab: Foto Lab\" -Model=\"A-1 Program\" *002.tif"
        );
    }

    #[test]
    fn malformed_timestamp_fails_the_whole_render() {
        let record = record(json!({
            "frames": [
                { "count": 1, "date": "2021-05-03T14:30" },
                { "count": 2, "date": "03/05/2021" }
            ]
        }));
        let err = ExiftoolPipeline::default().render(&record).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidTimestamp { ref value, .. } if value == "03/05/2021"));
    }

    #[test]
    fn frame_without_count_is_an_error() {
        let record = record(json!({ "frames": [{ "count": 1 }, { "aperture": "2" }] }));
        let err = ExiftoolPipeline::default().commands(&record).unwrap_err();
        assert!(matches!(err, ConvertError::MissingCount { index: 1 }));
    }
}
