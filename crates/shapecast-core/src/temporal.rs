//! # Temporal Types — Offset-Preserving Timestamps
//!
//! Defines `Timestamp`, the structured value a temporal descriptor decodes
//! to. A timestamp remembers the UTC offset it was written with, so
//! `2006-03-25T10:30:00+12:00` encodes back as `2006-03-25T10:30:00.000+12:00`
//! rather than being silently shifted to UTC.
//!
//! ## Accepted Input
//!
//! - RFC 3339 with `Z` or an explicit offset, optional fractional seconds.
//! - Offset-less date-times (`T` or space separated), interpreted as UTC.
//! - Bare calendar dates, interpreted as UTC midnight.
//! - Reduced precision dates `YYYY-MM` and `YYYY`, at the first day of the
//!   month or year.
//!
//! Anything else is rejected. In particular a bare number is never a date,
//! and neither is a string of digits other than a four-digit year.
//!
//! ## Wire Form
//!
//! `to_wire_string()` emits RFC 3339 with millisecond precision, using `Z`
//! for a zero offset: `YYYY-MM-DDTHH:MM:SS.sssZ`.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Offset-less date-time layouts, tried in order after RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A point in time together with the UTC offset it was expressed in.
///
/// Equality, ordering and hashing follow the instant, not the offset:
/// `2006-03-24T22:30:00Z` equals `2006-03-25T10:30:00+12:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    /// Parse a timestamp from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTimestamp`] if the trimmed input matches
    /// none of the accepted layouts.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid(s, "empty input"));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self::from_utc(naive.and_utc()));
            }
        }

        let date = match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => reduced_precision_date(trimmed).ok_or_else(|| invalid(s, &e.to_string()))?,
        };
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| invalid(s, "date has no midnight"))?;
        Ok(Self::from_utc(midnight.and_utc()))
    }

    /// Create a timestamp from a UTC instant.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.fixed_offset())
    }

    /// Access the inner offset-aware date-time.
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// The same instant expressed in UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// The UTC offset this timestamp was written with, in seconds.
    pub fn offset_seconds(&self) -> i32 {
        self.0.offset().local_minus_utc()
    }

    /// Milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Render as RFC 3339 with millisecond precision, keeping the offset.
    pub fn to_wire_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// `YYYY-MM` or `YYYY`, at the first day of the month or year.
fn reduced_precision_date(s: &str) -> Option<NaiveDate> {
    let (year, month) = match s.split_once('-') {
        Some((year, month)) if month.len() == 2 => (year, month.parse().ok()?),
        Some(_) => return None,
        None => (s, 1),
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !s.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

fn invalid(input: &str, reason: &str) -> CoreError {
    CoreError::InvalidTimestamp {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

impl FromStr for Timestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
