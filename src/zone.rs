//! The time zone in which dates are shown to the user, and typed by them
//!
//! The offset is looked up for each date, so that dates on both sides of a daylight saving time change are converted correctly.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, Local, LocalResult, NaiveDateTime, TimeZone, Utc};

/// Where "local time" is
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DisplayZone {
    /// The time zone of this machine
    Local,
    /// A zone without daylight saving time, e.g. to pin the zone in tests
    Fixed(FixedOffset),
}

impl Default for DisplayZone {
    fn default() -> Self {
        DisplayZone::Local
    }
}

impl From<FixedOffset> for DisplayZone {
    fn from(offset: FixedOffset) -> Self {
        DisplayZone::Fixed(offset)
    }
}

impl DisplayZone {
    /// Format `timestamp` as a local time (see `chrono::format::strftime` for `format`)
    pub fn format(&self, timestamp: &DateTime<Utc>, format: &str) -> String {
        match self {
            DisplayZone::Local => format_in(&Local, timestamp, format),
            DisplayZone::Fixed(offset) => format_in(offset, timestamp, format),
        }
    }

    /// The instant a local time refers to. See [`local_to_utc`]
    pub fn to_utc(&self, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            DisplayZone::Local => local_to_utc(&Local, local),
            DisplayZone::Fixed(offset) => local_to_utc(offset, local),
        }
    }
}


/// Format `timestamp` as a local time of `zone`
pub fn format_in<Tz>(zone: &Tz, timestamp: &DateTime<Utc>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.with_timezone(zone).format(format).to_string()
}

/// The instant a local time of `zone` refers to.
///
/// Local times that are repeated when clocks go back resolve to their first occurrence.
/// Local times skipped when clocks go forward do not exist, and return `None`.
pub fn local_to_utc<Tz: TimeZone>(zone: &Tz, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(local) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _latest) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}
