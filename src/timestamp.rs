use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

// Offset free forms the platform has been seen to send, read as UTC
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Error, PartialEq)]
pub(crate) enum TimestampError {
    #[error("timestamp is empty")]
    Empty,
    #[error("could not parse {0:?} as an ISO 8601 timestamp")]
    Invalid(String),
}

/// Parses an ISO 8601 timestamp into UTC.
///
/// A trailing `Z` or a numeric offset is honoured, a value without either is
/// taken to already be UTC, and a bare date means midnight UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(TimestampError::Empty);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let naive = value.strip_suffix('Z').unwrap_or(value);
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|parsed| Utc.from_utc_datetime(&parsed))
        .ok_or_else(|| TimestampError::Invalid(raw.to_string()))
}

/// Renders a duration as `<days> days, H:MM:SS`.
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().unsigned_abs();
    let days = total / 86_400;
    let hours = total % 86_400 / 3_600;
    let minutes = total % 3_600 / 60;
    let seconds = total % 60;
    let unit = if days == 1 { "day" } else { "days" };
    format!("{days} {unit}, {hours}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {

    use super::*;
    use pretty_assertions::assert_eq;

    fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
            .unwrap()
    }

    #[test]
    fn test_parse_timestamp() {
        let tests = vec![
            ("2024-01-10T00:00:00Z", Ok(utc(2024, 1, 10, 0, 0, 0))),
            ("2024-01-10T00:00:00", Ok(utc(2024, 1, 10, 0, 0, 0))),
            ("2024-01-10T12:30:15.123456Z", Ok(utc(2024, 1, 10, 12, 30, 15)
                + Duration::microseconds(123_456))),
            ("2024-01-10T12:30:15.5", Ok(utc(2024, 1, 10, 12, 30, 15)
                + Duration::milliseconds(500))),
            ("2024-01-10T02:00:00+02:00", Ok(utc(2024, 1, 10, 0, 0, 0))),
            ("2024-01-10 08:15:00", Ok(utc(2024, 1, 10, 8, 15, 0))),
            ("2024-01-10T08:15", Ok(utc(2024, 1, 10, 8, 15, 0))),
            ("2024-01-10", Ok(utc(2024, 1, 10, 0, 0, 0))),
            (" 2024-01-10T00:00:00Z ", Ok(utc(2024, 1, 10, 0, 0, 0))),
            ("", Err(TimestampError::Empty)),
            ("   ", Err(TimestampError::Empty)),
            (
                "yesterday",
                Err(TimestampError::Invalid("yesterday".to_string())),
            ),
            (
                "2024-13-01T00:00:00Z",
                Err(TimestampError::Invalid("2024-13-01T00:00:00Z".to_string())),
            ),
        ];
        for (test, expected) in tests {
            let result = parse_timestamp(test);
            assert_eq!(
                result, expected,
                "Result {result:?} didn't match Expected {expected:?}",
            );
        }
    }

    #[test]
    fn test_format_elapsed() {
        let tests = vec![
            (Duration::days(22), "22 days, 0:00:00"),
            (Duration::days(1) + Duration::seconds(3_725), "1 day, 1:02:05"),
            (Duration::seconds(59), "0 days, 0:00:59"),
        ];
        for (test, expected) in tests {
            assert_eq!(format_elapsed(test), expected);
        }
    }
}
