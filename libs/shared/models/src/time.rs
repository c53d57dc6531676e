//! Date and time value types shared by the scheduling rules, the store and the HTTP layer.
//!
//! Every wall-clock value in the system goes through this module. There is no timezone
//! handling: a timestamp is a calendar date plus a time of day, compared exactly as written.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const BIRTH_DATE_FORMAT: &str = "%d-%m-%Y";
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const TIMESTAMP_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("invalid timestamp '{0}', expected YYYY-MM-DDTHH:MM:SS")]
    InvalidTimestamp(String),

    #[error("invalid time of day '{0}', expected HH:MM:SS")]
    InvalidTimeOfDay(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid date '{0}', expected DD-MM-YYYY")]
    InvalidBirthDate(String),

    #[error("day of week must be between 1 (Monday) and 7 (Sunday), got {0}")]
    DayOfWeekOutOfRange(i64),
}

// ==============================================================================
// TIMESTAMP
// ==============================================================================

/// A single appointment instant: calendar date plus time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self(NaiveDateTime::new(date, time))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from_date(self.0.date())
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay(self.0.time())
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl FromStr for Timestamp {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();

        for format in TIMESTAMP_INPUT_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self(parsed));
            }
        }

        // An explicit offset is tolerated but not interpreted.
        DateTime::parse_from_rfc3339(raw)
            .map(|parsed| Self(parsed.naive_local()))
            .map_err(|_| TimeFormatError::InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// ==============================================================================
// TIME OF DAY
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(value: NaiveTime) -> Self {
        Self(value)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), TIME_OF_DAY_FORMAT)
            .map(Self)
            .map_err(|_| TimeFormatError::InvalidTimeOfDay(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_OF_DAY_FORMAT))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// ==============================================================================
// DAY OF WEEK
// ==============================================================================

/// ISO weekday number: Monday = 1 ... Sunday = 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub const MONDAY: DayOfWeek = DayOfWeek(1);
    pub const SUNDAY: DayOfWeek = DayOfWeek(7);

    pub fn new(value: i64) -> Result<Self, TimeFormatError> {
        if (1..=7).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TimeFormatError::DayOfWeekOutOfRange(value))
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.weekday().number_from_monday() as u8)
    }

    pub fn number(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        DayOfWeek::new(raw).map_err(de::Error::custom)
    }
}

// ==============================================================================
// CALENDAR DATES
// ==============================================================================

pub fn parse_date(s: &str) -> Result<NaiveDate, TimeFormatError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| TimeFormatError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_birth_date(s: &str) -> Result<NaiveDate, TimeFormatError> {
    NaiveDate::parse_from_str(s.trim(), BIRTH_DATE_FORMAT)
        .map_err(|_| TimeFormatError::InvalidBirthDate(s.to_string()))
}

/// Serde adapter for dates of birth.
///
/// Serializes as `DD-MM-YYYY`. Deserializes either `DD-MM-YYYY` or the ISO form the
/// store returns.
pub mod birth_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(BIRTH_DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_birth_date(&raw)
            .or_else(|_| parse_date(&raw))
            .map_err(de::Error::custom)
    }
}
