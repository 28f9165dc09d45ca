//! Canonical text forms of GPX values
//!
//! Every leaf value that appears as an attribute or as element text
//! implements [`TextValue`]. The XML layer hands raw character data to
//! [`TextValue::from_text`]: strings keep it verbatim, every other value
//! trims it and reads blank text as absent.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::{GpxError, GpxResult};

/// Number rendering options used when values are written as text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NumberFormat {
    /// Upper bound of fraction digits. `None` writes the shortest
    /// representation that reads back to the same `f64`.
    pub maximum_fraction_digits: Option<usize>,
}

impl NumberFormat {
    pub const SHORTEST: NumberFormat = NumberFormat {
        maximum_fraction_digits: None,
    };

    pub fn with_fraction_digits(digits: usize) -> Self {
        NumberFormat {
            maximum_fraction_digits: Some(digits),
        }
    }

    pub fn format_f64(&self, value: f64) -> String {
        match self.maximum_fraction_digits {
            None => format!("{}", value),
            Some(digits) => {
                let fixed = format!("{:.*}", digits, value);
                let trimmed = if fixed.contains('.') {
                    fixed.trim_end_matches('0').trim_end_matches('.')
                } else {
                    fixed.as_str()
                };
                if trimmed == "-0" {
                    "0".to_string()
                } else {
                    trimmed.to_string()
                }
            }
        }
    }
}

/// A value with a canonical text form
pub trait TextValue: Sized {
    /// Parse from trimmed, non-empty text
    fn parse_text(text: &str) -> GpxResult<Self>;

    /// Read from raw character data, `None` when the value is absent
    fn from_text(raw: &str) -> GpxResult<Option<Self>> {
        let text = raw.trim();
        if text.is_empty() {
            Ok(None)
        } else {
            Self::parse_text(text).map(Some)
        }
    }

    /// Canonical text form
    fn to_text(&self, format: &NumberFormat) -> String;
}

impl TextValue for String {
    fn parse_text(text: &str) -> GpxResult<Self> {
        Ok(text.to_string())
    }

    fn from_text(raw: &str) -> GpxResult<Option<Self>> {
        Ok(Some(raw.to_string()))
    }

    fn to_text(&self, _format: &NumberFormat) -> String {
        self.clone()
    }
}

impl TextValue for f64 {
    fn parse_text(text: &str) -> GpxResult<Self> {
        parse_f64("double", text)
    }

    fn to_text(&self, format: &NumberFormat) -> String {
        format.format_f64(*self)
    }
}

/// Calendar year, as used by `copyright/year`
impl TextValue for i32 {
    fn parse_text(text: &str) -> GpxResult<Self> {
        text.parse().map_err(|_| GpxError::parse("year", text))
    }

    fn to_text(&self, _format: &NumberFormat) -> String {
        self.to_string()
    }
}

impl TextValue for DateTime<Utc> {
    fn parse_text(text: &str) -> GpxResult<Self> {
        parse_time(text)
    }

    fn to_text(&self, _format: &NumberFormat) -> String {
        format_time(self)
    }
}

/// Durations are written as seconds with up to nine fraction digits
impl TextValue for Duration {
    fn parse_text(text: &str) -> GpxResult<Self> {
        parse_duration(text)
    }

    fn to_text(&self, _format: &NumberFormat) -> String {
        let nanos = self.subsec_nanos();
        if nanos == 0 {
            self.as_secs().to_string()
        } else {
            let fraction = format!("{:09}", nanos);
            format!("{}.{}", self.as_secs(), fraction.trim_end_matches('0'))
        }
    }
}

/// Parse seconds into a duration
///
/// Plain decimals with at most nine fraction digits are read exactly;
/// anything else goes through `f64`.
fn parse_duration(text: &str) -> GpxResult<Duration> {
    let text = text.trim();
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !whole.is_empty() && digits(whole) && fraction.len() <= 9 && digits(fraction) {
        if let (Ok(secs), Ok(nanos)) = (whole.parse::<u64>(), format!("{:0<9}", fraction).parse::<u32>()) {
            return Ok(Duration::new(secs, nanos));
        }
    }
    let secs = parse_f64("duration", text)?;
    Duration::try_from_secs_f64(secs).map_err(|_| GpxError::OutOfRange {
        kind: "duration",
        value: text.to_string(),
        range: "[0, max)",
    })
}

/// Parse a finite `f64`
pub fn parse_f64(kind: &'static str, text: &str) -> GpxResult<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(GpxError::parse(kind, text)),
    }
}

/// Parse an ISO 8601 date-time
///
/// Accepts `Z`, a numeric offset or no zone at all; zone-less values are
/// taken as UTC.
pub fn parse_time(text: &str) -> GpxResult<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|time| time.and_utc())
        .map_err(|_| GpxError::parse("time", text))
}

/// Format a date-time in UTC with a trailing `Z`
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_shortest_number_format() {
        let format = NumberFormat::SHORTEST;
        assert_eq!(format.format_f64(0.1), "0.1");
        assert_eq!(format.format_f64(12.0), "12");
        assert_eq!(format.format_f64(-45.123456789), "-45.123456789");
    }

    #[test]
    fn test_limited_fraction_digits() {
        let format = NumberFormat::with_fraction_digits(3);
        assert_eq!(format.format_f64(1.234567), "1.235");
        assert_eq!(format.format_f64(1.5), "1.5");
        assert_eq!(format.format_f64(2.0), "2");
        assert_eq!(format.format_f64(-0.0001), "0");
    }

    #[test]
    fn test_parse_time_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_time("2024-05-01T12:30:00Z").unwrap(), expected);
        assert_eq!(parse_time("2024-05-01T14:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_time("2024-05-01T12:30:00").unwrap(), expected);
        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn test_format_time() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(format_time(&time), "2024-05-01T12:30:00Z");
        let millis = time + chrono::Duration::milliseconds(250);
        assert_eq!(format_time(&millis), "2024-05-01T12:30:00.250Z");
        assert_eq!(parse_time(&format_time(&millis)).unwrap(), millis);
    }

    #[test]
    fn test_duration_text() {
        let format = NumberFormat::SHORTEST;
        let duration = Duration::parse_text("12").unwrap();
        assert_eq!(duration, Duration::from_secs(12));
        assert_eq!(duration.to_text(&format), "12");
        assert_eq!(
            Duration::parse_text("1.5").unwrap(),
            Duration::from_millis(1500)
        );
        assert!(Duration::parse_text("-3").is_err());
        assert!(Duration::parse_text("NaN").is_err());
        assert_eq!(Duration::parse_text("2e1").unwrap(), Duration::from_secs(20));
    }

    #[test]
    fn test_duration_text_keeps_nanos() {
        let format = NumberFormat::SHORTEST;
        let duration = Duration::new(1, 123_456_789);
        assert_eq!(duration.to_text(&format), "1.123456789");
        assert_eq!(Duration::parse_text(&duration.to_text(&format)).unwrap(), duration);

        let duration = Duration::new(86_400 * 365, 1);
        assert_eq!(duration.to_text(&format), "31536000.000000001");
        assert_eq!(Duration::parse_text(&duration.to_text(&format)).unwrap(), duration);
        assert_eq!(Duration::new(3, 500_000_000).to_text(&format), "3.5");
    }

    #[test]
    fn test_from_text_absence() {
        assert_eq!(f64::from_text("  ").unwrap(), None);
        assert_eq!(f64::from_text(" 2.5\n").unwrap(), Some(2.5));
        assert_eq!(String::from_text("").unwrap(), Some(String::new()));
        assert_eq!(String::from_text("  Vienna ").unwrap().as_deref(), Some("  Vienna "));
    }

    #[test]
    fn test_rejects_non_finite_numbers() {
        assert!(f64::parse_text("inf").is_err());
        assert!(f64::parse_text("abc").is_err());
        assert_eq!(f64::parse_text("1.25").unwrap(), 1.25);
    }
}
