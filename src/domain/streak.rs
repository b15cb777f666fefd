/// Streak calculation and tracking functionality
///
/// Streaks are counted in calendar days over a habit's completion set. The
/// current streak scans backward from today and treats today as a grace day:
/// an unfinished today never breaks the chain, any earlier gap does.

use std::collections::BTreeSet;

use serde::Serialize;
use chrono::{Days, NaiveDate};

use crate::domain::Habit;

/// How far back the current-streak scan looks
pub const STREAK_WINDOW_DAYS: u64 = 365;

/// Count consecutive completed days ending today or yesterday
///
/// Offset 0 (today) is skipped when missing; the first missing day after it
/// stops the scan. The scan never looks further back than
/// [`STREAK_WINDOW_DAYS`].
pub fn current_streak(completions: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;

    for offset in 0..STREAK_WINDOW_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };

        if completions.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}

/// Longest run of consecutive completed days anywhere in the history
pub fn longest_run(completions: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    // BTreeSet iterates oldest first
    for day in completions {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(*day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    longest
}

/// Read-only streak report for a habit
///
/// Built on demand for status output. The stored `streak` is as of the last
/// toggle, so the current streak is recomputed for `today` here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakSummary {
    /// Streak as of today
    pub current_streak: u32,
    /// Highest streak ever observed
    pub best_streak: u32,
    /// Longest consecutive run found in the full completion history
    pub longest_run: u32,
    /// Most recent completed day
    pub last_completed: Option<NaiveDate>,
    /// Number of completed days
    pub total_completions: u32,
    /// Whether today is already completed
    pub completed_today: bool,
}

impl StreakSummary {
    /// Summarise a habit as of `today`
    pub fn for_habit(habit: &Habit, today: NaiveDate) -> Self {
        let current = current_streak(&habit.completions, today);
        Self {
            current_streak: current,
            best_streak: habit.best_streak.max(current),
            longest_run: longest_run(&habit.completions),
            last_completed: habit.completions.iter().next_back().copied(),
            total_completions: habit.completions.len() as u32,
            completed_today: habit.is_completed_on(today),
        }
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.current_streak {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} days in a row. You're building a strong habit.", self.current_streak),
            7..=29 => format!("Excellent! {} days strong. You're in the groove now!", self.current_streak),
            _ => format!("Incredible! {} days of consistency. You're a habit master!", self.current_streak),
        }
    }
}
