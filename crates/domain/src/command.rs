use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::mapping::Assignment;

pub const PROGRAM: &str = "exiftool";
pub const VERBOSE_FLAG: &str = "-v";
/// Width the frame ordinal is zero-padded to in the file pattern.
pub const ORDINAL_WIDTH: usize = 2;

/// Image file types the emitted commands may target.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileExtension {
    Jpg,
    Jpeg,
    #[default]
    Tif,
    Tiff,
}

impl FileExtension {
    pub fn as_str(self) -> &'static str {
        match self {
            FileExtension::Jpg => "jpg",
            FileExtension::Jpeg => "jpeg",
            FileExtension::Tif => "tif",
            FileExtension::Tiff => "tiff",
        }
    }
}

impl FromStr for FileExtension {
    type Err = ConvertError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "jpg" => Ok(FileExtension::Jpg),
            "jpeg" => Ok(FileExtension::Jpeg),
            "tif" => Ok(FileExtension::Tif),
            "tiff" => Ok(FileExtension::Tiff),
            _ => Err(ConvertError::UnsupportedExtension(value.to_string())),
        }
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Adds exiftool's verbose flag to every command.
    pub verbose: bool,
    pub extension: FileExtension,
}

/// Shell glob matching the scan of frame `count`, e.g. `*005.tif`.
pub fn file_pattern(count: u64, extension: FileExtension) -> String {
    format!("*0{count:0width$}.{extension}", width = ORDINAL_WIDTH)
}

/// Renders one exiftool invocation.
pub fn command_line(assignments: &[Assignment], count: u64, options: &CommandOptions) -> String {
    let mut tokens = vec![PROGRAM.to_string()];
    if options.verbose {
        tokens.push(VERBOSE_FLAG.to_string());
    }
    tokens.extend(assignments.iter().map(ToString::to_string));
    tokens.push(file_pattern(count, options.extension));
    tokens.join(" ")
}

/// Joins command lines, each followed by one blank line.
pub fn render_script(lines: &[String]) -> String {
    let mut script = String::new();
    for line in lines {
        script.push_str(line);
        script.push_str("\n\n");
    }
    script
}
