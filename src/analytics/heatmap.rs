/// Cross-habit completion heatmap
///
/// Each cell counts how many habits were completed on one calendar day and
/// maps the count onto a 0.0..=1.0 intensity that saturates at
/// [`SATURATION_COUNT`] habits.

use serde::Serialize;
use chrono::{Days, NaiveDate};

use crate::domain::Habit;

/// Trailing window shown by default
pub const HEATMAP_DAYS: u32 = 365;

/// Completions on one day at which intensity reaches 1.0
pub const SATURATION_COUNT: u32 = 5;

/// One day of the heatmap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    /// Habits completed on `date`
    pub count: u32,
    pub intensity: f64,
}

/// Intensity for a number of completed habits
pub fn intensity(count: u32) -> f64 {
    (count as f64 / SATURATION_COUNT as f64).min(1.0)
}

/// Build the heatmap for the `days` days ending at `today`, oldest first
pub fn build_heatmap(habits: &[Habit], today: NaiveDate, days: u32) -> Vec<HeatmapCell> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset as u64)))
        .map(|date| {
            let count = habits.iter().filter(|h| h.is_completed_on(date)).count() as u32;
            HeatmapCell {
                date,
                count,
                intensity: intensity(count),
            }
        })
        .collect()
}
