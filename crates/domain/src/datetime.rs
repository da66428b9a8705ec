use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::error::ConvertError;

/// Parses an export timestamp (`YYYY-MM-DDTHH:MM`, seconds tolerated).
pub fn parse_timestamp(field: &str, value: &str) -> Result<PrimitiveDateTime, ConvertError> {
    PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        .or_else(|_| {
            PrimitiveDateTime::parse(
                value,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            )
        })
        .map_err(|_| ConvertError::timestamp(field, value))
}

/// `2021-05-03T14:30` -> `2021:05:03 14:30`
pub fn to_exif_datetime(field: &str, value: &str) -> Result<String, ConvertError> {
    parse_timestamp(field, value)?
        .format(format_description!("[year]:[month]:[day] [hour]:[minute]"))
        .map_err(|_| ConvertError::timestamp(field, value))
}

/// `2021-05-03T14:30` -> `2021-05-03`
pub fn to_exif_date(field: &str, value: &str) -> Result<String, ConvertError> {
    parse_timestamp(field, value)?
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|_| ConvertError::timestamp(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reformats_timestamp() {
        assert_eq!(to_exif_datetime("date", "2021-05-03T14:30").unwrap(), "2021:05:03 14:30");
        assert_eq!(to_exif_date("developed", "2021-05-03T14:30").unwrap(), "2021-05-03");
    }

    #[test]
    fn seconds_are_dropped() {
        assert_eq!(to_exif_datetime("date", "2021-05-03T14:30:59").unwrap(), "2021:05:03 14:30");
    }

    #[test]
    fn malformed_timestamps_are_errors() {
        for value in ["2021-05-03", "03.05.2021 14:30", "2021-13-03T14:30", "2021-5-3T14:30", ""] {
            let err = to_exif_datetime("date", value).unwrap_err();
            assert!(
                matches!(err, ConvertError::InvalidTimestamp { ref field, .. } if field == "date"),
                "{value:?} should be rejected"
            );
        }
    }
}
