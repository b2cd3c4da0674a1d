//! Day-granularity calendar helpers.
//!
//! Everything that compares completions or schedules goes through [`Day`],
//! never through raw timestamps, so two check-ins on the same date are the
//! same fact no matter what time they were logged.

use crate::error::AppError;
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Day of the week in ISO order (Monday first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// ISO number, 1=Monday .. 7=Sunday.
    pub fn iso_number(self) -> u32 {
        match self {
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
            Self::Sunday => 7,
        }
    }

    pub fn from_iso_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            7 => Some(Self::Sunday),
            _ => None,
        }
    }

    /// Convert from Sunday-first numbering (1=Sunday, 2=Monday .. 7=Saturday).
    pub fn from_source_number(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::Sunday),
            2..=7 => Self::from_iso_number(raw - 1),
            _ => None,
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

/// A canonical calendar day (midnight-normalized, no time component).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn weekday(self) -> Weekday {
        weekday_of(self)
    }

    pub fn next(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    pub fn previous(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Shift by a signed number of calendar days.
    pub fn add_days(self, days: i64) -> Option<Self> {
        let delta = Days::new(days.unsigned_abs());
        if days >= 0 {
            self.0.checked_add_days(delta).map(Self)
        } else {
            self.0.checked_sub_days(delta).map(Self)
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for Day {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_FORMAT)
            .map(Self)
            .map_err(|e| AppError::InvalidInput {
                field: "day",
                reason: format!("'{s}' is not a YYYY-MM-DD date: {e}"),
            })
    }
}

/// Normalize a timestamp to the calendar day it falls on in its own zone.
pub fn start_of_day<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Day {
    Day::new(timestamp.date_naive())
}

pub fn weekday_of(day: Day) -> Weekday {
    Weekday::from(day.0.weekday())
}

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: Day, to: Day) -> i64 {
    to.0.signed_duration_since(from.0).num_days()
}

/// The current local calendar day.
pub fn today() -> Day {
    start_of_day(&Local::now())
}

/// Source of "today" for components whose results depend on it.
pub trait Clock {
    fn today(&self) -> Day;
}

/// Reads the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Day {
        today()
    }
}

/// Always answers the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Day);

impl Clock for FixedClock {
    fn today(&self) -> Day {
        self.0
    }
}

/// Encode a schedule as comma-separated ISO day numbers, e.g. "1,3,5".
pub fn format_schedule(schedule: &BTreeSet<Weekday>) -> String {
    schedule
        .iter()
        .map(|d| d.iso_number().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-separated ISO day-number list. An empty string is an empty schedule.
pub fn parse_schedule(days: &str) -> Result<BTreeSet<Weekday>, AppError> {
    if days.trim().is_empty() {
        return Ok(BTreeSet::new());
    }

    days.split(',')
        .map(|part| {
            let n: u32 = part.trim().parse().map_err(|_| AppError::InvalidInput {
                field: "schedule",
                reason: format!("invalid day: '{}'", part.trim()),
            })?;
            Weekday::from_iso_number(n).ok_or_else(|| AppError::InvalidInput {
                field: "schedule",
                reason: format!("day must be 1-7, got {n}"),
            })
        })
        .collect()
}
