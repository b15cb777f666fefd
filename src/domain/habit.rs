/// Habit entity and related functionality
///
/// This module defines the Habit record exactly as it is stored in the
/// `habits` collection, the creation request that builds one, and the
/// completion toggle that drives its streak fields.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, Utc};

use crate::domain::{current_streak, DomainError, Frequency, HabitId};

/// Icon used when the creation request does not name one
pub const DEFAULT_ICON: &str = "✓";

/// Color used when the creation request does not name one
pub const DEFAULT_COLOR: &str = "#6366f1";

const MAX_NAME_LEN: usize = 100;

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// A habit the user wants to do regularly
///
/// `completions` is a set of calendar days, so a day can only be recorded
/// once. `streak` and `best_streak` are derived from it on every toggle and
/// `streak <= best_streak` holds after any mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub frequency: Frequency,
    /// Creation time in epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
    /// Consecutive completed days ending today or yesterday
    #[serde(default)]
    pub streak: u32,
    /// Highest streak ever observed
    #[serde(default)]
    pub best_streak: u32,
    /// Days on which the habit was completed
    #[serde(default)]
    pub completions: BTreeSet<NaiveDate>,
}

/// Request to create a habit
///
/// Only the name is required; everything else falls back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub frequency: Option<Frequency>,
}

impl NewHabit {
    /// Creation request with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// Assigns a fresh id and creation timestamp, zero streaks and an empty
    /// completion set.
    pub fn new(request: NewHabit) -> Result<Self, DomainError> {
        Self::validate_name(&request.name)?;

        let color = match request.color {
            Some(color) => {
                Self::validate_color(&color)?;
                color
            }
            None => default_color(),
        };

        let icon = request
            .icon
            .filter(|icon| !icon.trim().is_empty())
            .unwrap_or_else(default_icon);

        Ok(Self {
            id: HabitId::new(),
            name: request.name.trim().to_string(),
            icon,
            color,
            frequency: request.frequency.unwrap_or_default(),
            created_at: Utc::now().timestamp_millis(),
            streak: 0,
            best_streak: 0,
            completions: BTreeSet::new(),
        })
    }

    /// Whether the habit was completed on `day`
    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completions.contains(&day)
    }

    /// Flip the completion state of `day` and recompute streaks
    ///
    /// Returns `true` if the day is completed after the call.
    pub fn toggle_day(&mut self, day: NaiveDate, today: NaiveDate) -> bool {
        let completed = if self.completions.remove(&day) {
            false
        } else {
            self.completions.insert(day);
            true
        };

        self.refresh_streak(today);
        completed
    }

    /// Recompute `streak` from the completion set and raise `best_streak`
    /// if it was exceeded
    pub fn refresh_streak(&mut self, today: NaiveDate) {
        self.streak = current_streak(&self.completions, today);
        self.best_streak = self.best_streak.max(self.streak);
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidHabitName(format!(
                "Habit name cannot be longer than {} characters",
                MAX_NAME_LEN
            )));
        }

        Ok(())
    }

    /// Colors are `#rrggbb`
    fn validate_color(color: &str) -> Result<(), DomainError> {
        let valid = color
            .strip_prefix('#')
            .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .unwrap_or(false);

        if !valid {
            return Err(DomainError::InvalidColor(format!(
                "'{}' is not a #rrggbb hex color",
                color
            )));
        }

        Ok(())
    }
}
