//! Replay window check for timestamp-bound signatures.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::AuthRejection;

/// Upper bound accepted for a deviation window (one year).
pub const MAX_DEVIATION_SECS: i64 = 365 * 24 * 60 * 60;

/// Date-time layouts, extended and basic, with seconds or minute precision.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Splits a trailing UTC offset (`Z`, `+hh`, `+hhmm` or `+hh:mm`) off a
/// date-time that has a time part.
static OFFSET_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<local>\d.*[T ]\d.*?)(?:(?P<zulu>[Zz])|(?P<sign>[+-])(?P<hours>\d{2})(?::?(?P<minutes>\d{2}))?)$")
        .expect("offset suffix pattern is valid")
});

/// Symmetric acceptance window around the current time.
///
/// A timestamp `ts` is accepted iff `now - deviation < ts < now + deviation`.
/// Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampWindow {
    deviation: Duration,
}

impl TimestampWindow {
    /// Creates a window from a deviation in seconds; the sign is ignored.
    pub fn from_secs(deviation_secs: i64) -> Self {
        let secs = deviation_secs.saturating_abs().min(MAX_DEVIATION_SECS);
        Self {
            deviation: Duration::seconds(secs),
        }
    }

    /// Returns the deviation magnitude.
    pub fn deviation(&self) -> Duration {
        self.deviation
    }

    /// Parses `timestamp_text` and checks it against `now`.
    pub fn validate(
        &self,
        timestamp_text: &str,
        now: DateTime<Utc>,
    ) -> Result<DateTime<FixedOffset>, AuthRejection> {
        let timestamp = parse_timestamp(timestamp_text)?;
        let instant = timestamp.with_timezone(&Utc);

        let after_lower = now
            .checked_sub_signed(self.deviation)
            .map_or(true, |lower| lower < instant);
        let before_upper = now
            .checked_add_signed(self.deviation)
            .map_or(true, |upper| instant < upper);

        if after_lower && before_upper {
            Ok(timestamp)
        } else {
            Err(AuthRejection::TimestampOutOfWindow)
        }
    }
}

/// Parses an ISO-8601 date-time that must carry an explicit UTC offset.
///
/// Accepts the extended (`2024-01-01T00:00:00+00:00`) and basic
/// (`20240101T000000Z`) forms, minute precision, and hour-only offsets.
pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, AuthRejection> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed);
    }

    if let Some(captures) = OFFSET_SUFFIX.captures(text) {
        let offset = if captures.name("zulu").is_some() {
            FixedOffset::east_opt(0)
        } else {
            parse_offset(
                &captures["sign"],
                &captures["hours"],
                captures.name("minutes").map_or("00", |m| m.as_str()),
            )
        };
        let local = parse_local(&captures["local"]);
        if let (Some(offset), Some(local)) = (offset, local) {
            if let Some(parsed) = offset.from_local_datetime(&local).single() {
                return Ok(parsed);
            }
        }
        return Err(AuthRejection::InvalidTimestampFormat);
    }

    let is_naive = parse_local(text).is_some()
        || DATE_FORMATS
            .iter()
            .any(|format| NaiveDate::parse_from_str(text, format).is_ok());

    if is_naive {
        Err(AuthRejection::MissingTimezone)
    } else {
        Err(AuthRejection::InvalidTimestampFormat)
    }
}

fn parse_local(text: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn parse_offset(sign: &str, hours: &str, minutes: &str) -> Option<FixedOffset> {
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    if sign == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}
