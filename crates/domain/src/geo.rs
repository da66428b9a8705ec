use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decimal-degree position as stored in a frame's `location`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude: Some(longitude),
            latitude: Some(latitude),
        }
    }

    /// Reads a coordinate from a `{longitude, latitude}` object.
    pub fn from_value(value: &Value) -> Option<Self> {
        Coordinate::deserialize(value).ok()
    }

    /// Both axes in degrees/minutes/seconds, or nothing if either is missing.
    pub fn position(&self) -> Option<GpsPosition> {
        Some(GpsPosition {
            longitude: GpsAxis::longitude(self.longitude?),
            latitude: GpsAxis::latitude(self.latitude?),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn letter(self) -> &'static str {
        match self {
            Hemisphere::North => "N",
            Hemisphere::South => "S",
            Hemisphere::East => "E",
            Hemisphere::West => "W",
        }
    }
}

/// Unsigned degrees, minutes and seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl Dms {
    /// Truncates whole degrees and minutes; the remainder becomes seconds.
    /// `degrees` must be non-negative.
    ///
    /// Seconds are rounded to the displayed precision, and a result of 60
    /// carries into the minutes (and 60 minutes into the degrees).
    pub fn from_decimal(degrees: f64) -> Self {
        let whole = degrees.trunc();
        let fraction_minutes = (degrees - whole) * 60.0;
        let minutes = fraction_minutes.trunc();
        let mut dms = Self {
            degrees: whole as u32,
            minutes: minutes as u32,
            seconds: round_seconds((fraction_minutes - minutes) * 60.0),
        };
        if dms.seconds >= 60.0 {
            dms.seconds -= 60.0;
            dms.minutes += 1;
        }
        if dms.minutes >= 60 {
            dms.minutes -= 60;
            dms.degrees += 1;
        }
        dms
    }

    pub fn to_decimal(&self) -> f64 {
        self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0
    }
}

const SECONDS_SCALE: f64 = 100_000.0;

fn round_seconds(seconds: f64) -> f64 {
    (seconds * SECONDS_SCALE).round() / SECONDS_SCALE
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.5}", self.degrees, self.minutes, self.seconds)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpsAxis {
    pub dms: Dms,
    pub hemisphere: Hemisphere,
}

impl GpsAxis {
    /// Zero counts as east.
    pub fn longitude(value: f64) -> Self {
        let hemisphere = if value < 0.0 {
            Hemisphere::West
        } else {
            Hemisphere::East
        };
        Self {
            dms: Dms::from_decimal(value.abs()),
            hemisphere,
        }
    }

    /// Zero counts as north.
    pub fn latitude(value: f64) -> Self {
        let hemisphere = if value < 0.0 {
            Hemisphere::South
        } else {
            Hemisphere::North
        };
        Self {
            dms: Dms::from_decimal(value.abs()),
            hemisphere,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpsPosition {
    pub longitude: GpsAxis,
    pub latitude: GpsAxis,
}
