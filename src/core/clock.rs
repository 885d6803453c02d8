//! Fixed-zone clock and date normalization.
//!
//! Every date the server reasons about lives in Korea Standard Time (UTC+9).
//! This module owns that zone, produces "now" snapshots in it, and turns the
//! loose date strings agents send into zone-qualified instants.

use chrono::format::{Parsed, StrftimeItems, parse};
use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc,
};
use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

/// Offset of the server's fixed zone, in seconds east of UTC.
pub const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Human-readable label for the fixed zone.
pub const TIMEZONE_LABEL: &str = "Asia/Seoul (KST, UTC+9)";

/// Offset-bearing layouts, tried after a trailing `Z` is rewritten to `+00:00`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Offset-free layouts; the wall-clock time is taken as KST.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

/// Offset-free layouts that stop at the hour; minutes default to zero.
const HOUR_FORMATS: &[&str] = &["%Y-%m-%dT%H", "%Y-%m-%d %H", "%Y%m%dT%H"];

const DATE_FORMAT: &str = "%Y-%m-%d";

const BASIC_DATE_FORMAT: &str = "%Y%m%d";

/// Errors produced while normalizing date strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    /// The input matched none of the accepted layouts.
    #[error("Invalid datetime format: {0}. Use 'YYYY-MM-DD' or ISO-like strings.")]
    InvalidFormat(String),
}

/// The fixed UTC+9 offset.
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// Current instant in KST.
pub fn now_kst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}

/// Format an instant as ISO-8601 with its offset.
///
/// Fractions are written as microseconds and dropped entirely when zero.
pub fn to_iso(dt: &DateTime<FixedOffset>) -> String {
    let format = if dt.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    dt.to_rfc3339_opts(format, false)
}

/// Parse a free-form date/time string into a KST instant.
///
/// Accepted inputs:
/// - ISO-8601 with an offset (`2025-10-21T13:30:00+00:00`, `+0000`, `+00`, `...Z`),
///   converted to KST
/// - ISO-8601 without an offset (`2025-10-21T13:30`, `2025-10-21T13`), taken as KST
///   wall-clock time
/// - `YYYY-MM-DD HH:MM`
/// - `YYYY-MM-DD` or `YYYYMMDD`, at midnight
pub fn coerce_to_kst(input: &str) -> Result<DateTime<FixedOffset>, ClockError> {
    let s = input.trim();
    let tz = kst();

    let with_offset = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(rest) => format!("{rest}+00:00"),
        None => s.to_string(),
    };

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
            return Ok(dt.with_timezone(&tz));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, input);
        }
    }

    for fmt in HOUR_FORMATS {
        if let Some(naive) = parse_hour_only(s, fmt) {
            return localize(naive, input);
        }
    }

    for fmt in [DATE_FORMAT, BASIC_DATE_FORMAT] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return localize(date.and_time(NaiveTime::MIN), input);
        }
    }

    Err(ClockError::InvalidFormat(input.to_string()))
}

fn parse_hour_only(s: &str, fmt: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, s, StrftimeItems::new(fmt)).ok()?;
    parsed.set_minute(0).ok()?;
    parsed.to_naive_datetime_with_offset(0).ok()
}

fn localize(naive: NaiveDateTime, input: &str) -> Result<DateTime<FixedOffset>, ClockError> {
    naive
        .and_local_timezone(kst())
        .single()
        .ok_or_else(|| ClockError::InvalidFormat(input.to_string()))
}

/// Snapshot of the current moment, shaped for agents.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ClockSnapshot {
    /// Full ISO-8601 timestamp with offset.
    pub iso: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM:SS`.
    pub time: String,
    /// English weekday name, e.g. `Tuesday`.
    pub weekday: String,
    /// Zone label.
    pub tz: String,
}

impl ClockSnapshot {
    /// Build a snapshot for the given instant.
    pub fn at(now: &DateTime<FixedOffset>) -> Self {
        Self {
            iso: to_iso(now),
            date: now.format(DATE_FORMAT).to_string(),
            time: now.format("%H:%M:%S").to_string(),
            weekday: now.format("%A").to_string(),
            tz: TIMEZONE_LABEL.to_string(),
        }
    }

    /// Snapshot of the current moment.
    pub fn now() -> Self {
        Self::at(&now_kst())
    }
}

/// Calendar date `days` away from `now`, formatted `YYYY-MM-DD`.
pub fn shifted_date(now: &DateTime<FixedOffset>, days: i64) -> String {
    (*now + Duration::days(days)).format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        kst().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_date_only_is_midnight() {
        let dt = coerce_to_kst("2025-10-21").unwrap();
        assert_eq!(dt, at(2025, 10, 21, 0, 0));
        assert_eq!(to_iso(&dt), "2025-10-21T00:00:00+09:00");
    }

    #[test]
    fn test_equivalent_formats_agree() {
        let expected = at(2025, 10, 21, 13, 30);
        for input in [
            "2025-10-21 13:30",
            "2025-10-21T13:30",
            "2025-10-21T13:30:00",
            "2025-10-21T13:30:00+09:00",
            "2025-10-21T04:30:00Z",
            "2025-10-21T04:30:00+00:00",
            "2025-10-21T13:30:00+09",
            "2025-10-21T13:30:00+0900",
            "20251021T133000",
            "  2025-10-21 13:30  ",
        ] {
            assert_eq!(coerce_to_kst(input).unwrap(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_hour_only_and_basic_date() {
        assert_eq!(coerce_to_kst("2025-10-21T13").unwrap(), at(2025, 10, 21, 13, 0));
        assert_eq!(coerce_to_kst("2025-10-21 13").unwrap(), at(2025, 10, 21, 13, 0));
        assert_eq!(coerce_to_kst("20251021").unwrap(), at(2025, 10, 21, 0, 0));
        assert!(coerce_to_kst("2025-10-21T25").is_err());
    }

    #[test]
    fn test_iso_uses_microseconds() {
        let dt = coerce_to_kst("2025-10-21T13:30:15.123456789").unwrap();
        assert_eq!(to_iso(&dt), "2025-10-21T13:30:15.123456+09:00");
        let dt = coerce_to_kst("2025-10-21T13:30:15.250").unwrap();
        assert_eq!(to_iso(&dt), "2025-10-21T13:30:15.250000+09:00");
    }

    #[test]
    fn test_offset_input_is_converted() {
        let dt = coerce_to_kst("2025-10-20T20:00:00-05:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), KST_OFFSET_SECS);
        assert_eq!(dt.day(), 21);
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_fractional_seconds() {
        let dt = coerce_to_kst("2025-10-21T13:30:15.250").unwrap();
        assert_eq!(dt.second(), 15);
        assert_eq!(dt.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        for input in ["", "tomorrow", "2025/10/21", "21-10-2025", "2025-13-01", "10월 21일"] {
            let err = coerce_to_kst(input).unwrap_err();
            assert_eq!(err, ClockError::InvalidFormat(input.to_string()));
        }
    }

    #[test]
    fn test_error_message_names_input() {
        let err = coerce_to_kst("next friday").unwrap_err();
        assert!(err.to_string().contains("next friday"));
    }

    #[test]
    fn test_snapshot_fields() {
        let snap = ClockSnapshot::at(&at(2025, 8, 27, 9, 5));
        assert_eq!(snap.date, "2025-08-27");
        assert_eq!(snap.time, "09:05:00");
        assert_eq!(snap.weekday, "Wednesday");
        assert_eq!(snap.iso, "2025-08-27T09:05:00+09:00");
        assert_eq!(snap.tz, TIMEZONE_LABEL);
    }

    #[test]
    fn test_shifted_date_crosses_month() {
        let now = at(2025, 3, 1, 0, 30);
        assert_eq!(shifted_date(&now, -1), "2025-02-28");
        assert_eq!(shifted_date(&now, 1), "2025-03-02");
    }
}
