//! Calendar-day normalization.
//!
//! Every day-granularity comparison in the service goes through a single
//! [`DayCalendar`], which pins the day boundary to one fixed UTC offset.
//! Mixing conventions (server-local labels in one place, UTC slices in
//! another) makes the same instant land on different days near midnight,
//! so nothing outside this module derives a day from a timestamp by hand.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc, Weekday,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("invalid UTC offset: {0:?} (expected e.g. \"+02:00\" or \"UTC\")")]
    InvalidOffset(String),
}

/// One calendar day, rendered `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// The previous calendar day.
    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The next calendar day.
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    pub fn days_before(self, n: u32) -> Option<Self> {
        self.0.checked_sub_days(Days::new(u64::from(n))).map(Self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Maps instants and day markers onto [`DayKey`]s under a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCalendar {
    offset: FixedOffset,
}

impl Default for DayCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayCalendar {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Parse `"+HH:MM"`, `"-HH:MM"`, `"+HHMM"`, `"Z"` or `"UTC"`.
    pub fn from_offset_str(raw: &str) -> Result<Self, DateError> {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(Self::utc());
        }

        let invalid = || DateError::InvalidOffset(raw.to_string());
        let (sign, rest) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => return Err(invalid()),
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
        let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
        if hours > 14 || minutes > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::with_offset)
            .ok_or_else(invalid)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The calendar day an instant falls on. Time of day is ignored.
    pub fn day_key<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> DayKey {
        DayKey(instant.with_timezone(&self.offset).date_naive())
    }

    pub fn today(&self, now: DateTime<Utc>) -> DayKey {
        self.day_key(&now)
    }

    /// Midnight of `day` under this calendar, as a UTC instant.
    pub fn start_of_day(&self, day: DayKey) -> DateTime<Utc> {
        let local_midnight = day.0.and_time(NaiveTime::default());
        let utc_naive =
            local_midnight - chrono::Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc_naive)
    }

    /// Normalize a stored day marker.
    ///
    /// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, naive
    /// `YYYY-MM-DDTHH:MM:SS` wall-clock times, and the legacy
    /// `"Mon Oct 19 2026"` label. Plain dates and labels are already
    /// calendar days and are taken as-is; instants are shifted into the
    /// calendar offset first.
    pub fn parse_day_key(&self, marker: &str) -> Result<DayKey, DateError> {
        let s = marker.trim();
        if s.is_empty() {
            return Err(DateError::InvalidDate(marker.to_string()));
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(DayKey(date));
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
            return Ok(self.day_key(&instant));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(wall) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(DayKey(wall.date()));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%a %b %d %Y") {
            return Ok(DayKey(date));
        }

        Err(DateError::InvalidDate(marker.to_string()))
    }

    /// Normalize a list of markers, dropping (and logging) the ones that
    /// cannot be parsed. Duplicates collapse.
    pub fn collect_day_keys<S: AsRef<str>>(&self, markers: &[S]) -> BTreeSet<DayKey> {
        markers
            .iter()
            .filter_map(|m| match self.parse_day_key(m.as_ref()) {
                Ok(day) => Some(day),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unparseable day marker");
                    None
                }
            })
            .collect()
    }
}
