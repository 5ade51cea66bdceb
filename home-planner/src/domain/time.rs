//! Timetable time handling.
//!
//! Upstream feeds encode times in two ways: the markup timetable feeds use
//! compact digit strings (`YYMMDDHHmm` or `YYYYMMDDHHmm`) holding local wall
//! clock digits, while the JSON stop-event feeds use ISO 8601 date-times.
//! Both are resolved to absolute instants here so that planned and realtime
//! data can be compared and subtracted directly.
//!
//! Everything the user sees is rendered in the feeds' home timezone
//! (Europe/Berlin), regardless of where the engine runs.

use std::fmt;

use chrono::{
    DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

/// Timezone used for compact feed digits and for all display rendering.
pub const REFERENCE_TZ: Tz = chrono_tz::Europe::Berlin;

/// Placeholder shown when no departure time can be determined.
pub const MISSING_TIME: &str = "—";

/// Naive ISO layouts accepted when the string carries no offset.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Error returned when parsing an invalid feed time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// An absolute departure instant parsed from an upstream feed.
///
/// # Examples
///
/// ```
/// use home_planner::domain::FeedTime;
///
/// let t = FeedTime::parse("2403151430").unwrap();
/// assert_eq!(t.to_string(), "14:30");
///
/// let t = FeedTime::parse("2024-03-15T13:30:00Z").unwrap();
/// assert_eq!(t.to_string(), "14:30");
///
/// assert!(FeedTime::parse("14:30").is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedTime(DateTime<Utc>);

impl FeedTime {
    /// Wrap an instant that is already known.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Parse any supported encoding, returning `None` for unparsable input.
    ///
    /// Digit-only strings must be compact times; anything else is tried as
    /// an ISO 8601 date-time.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            Self::parse_compact(s).ok()
        } else {
            Self::parse_iso(s).ok()
        }
    }

    /// Parse a compact `YYMMDDHHmm` or `YYYYMMDDHHmm` string.
    ///
    /// The digits are local wall clock time in [`REFERENCE_TZ`]. Two-digit
    /// years are taken as 2000 + YY. Ambiguous autumn times resolve to the
    /// earlier instant; times skipped by the spring change are moved one
    /// hour forward.
    pub fn parse_compact(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();
        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(TimeError::new("expected digits only"));
        }

        let (year, rest) = match bytes.len() {
            10 => (2000 + parse_digits(&bytes[0..2]) as i32, &bytes[2..]),
            12 => (parse_digits(&bytes[0..4]) as i32, &bytes[4..]),
            _ => return Err(TimeError::new("expected 10 or 12 digits")),
        };

        let month = parse_digits(&rest[0..2]);
        let day = parse_digits(&rest[2..4]);
        let hour = parse_digits(&rest[4..6]);
        let minute = parse_digits(&rest[6..8]);

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| TimeError::new("invalid calendar date"))?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new("invalid time of day"))?;

        let naive = date.and_time(time);
        let local = REFERENCE_TZ
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                REFERENCE_TZ
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
            .ok_or_else(|| TimeError::new("local time does not exist"))?;

        Ok(Self(local.with_timezone(&Utc)))
    }

    /// Parse an ISO 8601 date-time.
    ///
    /// Strings with an offset are converted to UTC; naive strings are taken
    /// as UTC.
    pub fn parse_iso(s: &str) -> Result<Self, TimeError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }

        NAIVE_LAYOUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
            .map(|naive| Self(naive.and_utc()))
            .ok_or_else(|| TimeError::new("not an ISO 8601 date-time"))
    }

    /// Returns the instant in UTC.
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the instant in the reference timezone.
    pub fn local(&self) -> DateTime<Tz> {
        self.0.with_timezone(&REFERENCE_TZ)
    }

    /// Whole minutes from `now` until this time, rounded down.
    ///
    /// Negative once the time has passed, even by a few seconds.
    pub fn minutes_until(&self, now: DateTime<Utc>) -> i64 {
        self.0.signed_duration_since(now).num_seconds().div_euclid(60)
    }
}

impl fmt::Debug for FeedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedTime({})", self.0.to_rfc3339())
    }
}

impl fmt::Display for FeedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = self.local();
        write!(f, "{:02}:{:02}", local.hour(), local.minute())
    }
}

/// Render a departure time for display, or the placeholder if unknown.
pub fn display_time(time: Option<FeedTime>) -> String {
    time.map_or_else(|| MISSING_TIME.to_string(), |t| t.to_string())
}

/// Current date and time in the reference timezone.
pub fn local_now(now: DateTime<Utc>) -> NaiveDateTime {
    now.with_timezone(&REFERENCE_TZ).naive_local()
}

/// One clock hour of a station's planned timetable.
///
/// Planned feeds are published per hour, so departures shortly after a
/// boundary need both the current and the following window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HourWindow {
    date: NaiveDate,
    hour: u32,
}

impl HourWindow {
    /// Build a window from a local date and hour, if the hour is valid.
    pub fn new(date: NaiveDate, hour: u32) -> Option<Self> {
        (hour < 24).then_some(Self { date, hour })
    }

    /// The window containing `now`, in local time.
    pub fn current(now: DateTime<Utc>) -> Self {
        let local = local_now(now);
        Self {
            date: local.date(),
            hour: local.hour(),
        }
    }

    /// The window one hour ahead.
    pub fn next(&self) -> Self {
        let start = self.date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.hour) + 1);
        Self {
            date: start.date(),
            hour: start.hour(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Date as the feed expects it in request paths (`YYMMDD`).
    pub fn date_param(&self) -> String {
        self.date.format("%y%m%d").to_string()
    }

    /// Hour as the feed expects it in request paths (`HH`).
    pub fn hour_param(&self) -> String {
        format!("{:02}", self.hour)
    }
}

impl fmt::Display for HourWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.date_param(), self.hour_param())
    }
}

/// Parse a run of ASCII digits already checked by the caller.
fn parse_digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        // Hour 2 is skipped: it may fall in the spring DST gap.
        fn valid_compact()(
            year in 0u32..100,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in prop_oneof![0u32..2, 3u32..24],
            minute in 0u32..60,
            long in any::<bool>(),
        ) -> (String, u32, u32) {
            let s = if long {
                format!("20{year:02}{month:02}{day:02}{hour:02}{minute:02}")
            } else {
                format!("{year:02}{month:02}{day:02}{hour:02}{minute:02}")
            };
            (s, hour, minute)
        }
    }

    proptest! {
        /// Compact digits always display as their own hour and minute
        #[test]
        fn compact_display_roundtrip((s, hour, minute) in valid_compact()) {
            let parsed = FeedTime::parse(&s).unwrap();
            prop_assert_eq!(parsed.to_string(), format!("{hour:02}:{minute:02}"));
        }

        /// Parsing arbitrary input never panics
        #[test]
        fn parse_never_panics(s in ".{0,40}") {
            let _ = FeedTime::parse(&s);
        }

        /// Digit strings of any other length are rejected
        #[test]
        fn wrong_digit_count_rejected(s in "[0-9]{1,20}") {
            prop_assume!(s.len() != 10 && s.len() != 12);
            prop_assert!(FeedTime::parse(&s).is_none());
        }

        /// Next window is always exactly one hour after the current one
        #[test]
        fn next_window_one_hour_later(secs in 0i64..4_000_000_000) {
            let now = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
            let current = HourWindow::current(now);
            let next = current.next();
            let a = current.date().and_hms_opt(current.hour(), 0, 0).unwrap();
            let b = next.date().and_hms_opt(next.hour(), 0, 0).unwrap();
            prop_assert_eq!(b - a, Duration::hours(1));
        }
    }
}
