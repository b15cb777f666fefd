/// Core types used throughout the domain layer
///
/// This module defines the identifier, frequency and clock types that the
/// Habit record and the streak/heatmap calculations are built on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// Ids are opaque strings. New habits get a random UUID, but records written
/// elsewhere (an imported backup, say) may carry any non-empty string. It
/// serializes as the bare string so stored records keep a plain `id` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a habit ID from user input; blank ids are rejected
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitId("habit id cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How often a habit is meant to be performed
///
/// The declared frequency is informational. Streaks always assume a daily
/// cadence; the frequency only decides whether a day counts as scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every single day
    #[default]
    Daily,
    /// Monday through Friday only
    Weekdays,
    /// Saturday and Sunday only
    Weekends,
    /// Some days of the week, at the user's discretion
    Weekly,
}

impl Frequency {
    /// Lowercase name, as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekdays => "weekdays",
            Frequency::Weekends => "weekends",
            Frequency::Weekly => "weekly",
        }
    }

    /// Check if this frequency expects the habit to be done on a given date
    pub fn is_scheduled_for_date(&self, date: NaiveDate) -> bool {
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        match self {
            Frequency::Daily | Frequency::Weekly => true,
            Frequency::Weekdays => !weekend,
            Frequency::Weekends => weekend,
        }
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekdays" => Ok(Frequency::Weekdays),
            "weekends" => Ok(Frequency::Weekends),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(DomainError::InvalidFrequency(format!(
                "'{}'. Valid options: daily, weekdays, weekends, weekly",
                other
            ))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of "today" for completion and streak calculations
///
/// Every calendar-day decision goes through a clock so tests can pin the date.
pub trait Clock: Send + Sync {
    /// The current calendar day
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock that always reports the same day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parse a `YYYY-MM-DD` calendar day
pub fn parse_day(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s)))
}
