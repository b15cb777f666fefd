/// Analytics over the in-memory habit set
///
/// This module turns the current habits into derived views: the
/// completion heatmap and a short overview with insight messages.

pub mod heatmap;

pub use heatmap::{build_heatmap, intensity, HeatmapCell, HEATMAP_DAYS, SATURATION_COUNT};

use serde::Serialize;
use chrono::NaiveDate;

use crate::domain::Habit;

/// Aggregate figures for a set of habits
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overview {
    pub habit_count: usize,
    pub completed_today: usize,
    pub total_completions: usize,
    /// Highest `best_streak` among the habits
    pub best_streak: u32,
}

/// Analytics engine for processing habit data
pub struct AnalyticsEngine {
    heatmap_days: u32,
}

impl AnalyticsEngine {
    /// Create an engine with the default 365-day heatmap window
    pub fn new() -> Self {
        Self::with_heatmap_days(HEATMAP_DAYS)
    }

    /// Create an engine with a custom heatmap window
    pub fn with_heatmap_days(heatmap_days: u32) -> Self {
        Self { heatmap_days }
    }

    pub fn heatmap_days(&self) -> u32 {
        self.heatmap_days
    }

    /// Heatmap of the configured window ending at `today`
    pub fn heatmap(&self, habits: &[Habit], today: NaiveDate) -> Vec<HeatmapCell> {
        build_heatmap(habits, today, self.heatmap_days)
    }

    /// Summarise the habit set as of `today`
    pub fn overview(&self, habits: &[Habit], today: NaiveDate) -> Overview {
        Overview {
            habit_count: habits.len(),
            completed_today: habits.iter().filter(|h| h.is_completed_on(today)).count(),
            total_completions: habits.iter().map(|h| h.completions.len()).sum(),
            best_streak: habits.iter().map(|h| h.best_streak).max().unwrap_or(0),
        }
    }

    /// Short insight messages for an overview
    pub fn insights(&self, overview: &Overview) -> Vec<String> {
        let mut insights = Vec::new();

        if overview.habit_count == 0 {
            insights.push("Start by creating your first habit to track!".to_string());
            return insights;
        }

        if overview.total_completions == 0 {
            insights.push("Great job creating habits! Now start marking them complete.".to_string());
        } else {
            insights.push(format!(
                "{} of {} habits done today, {} completions in total.",
                overview.completed_today, overview.habit_count, overview.total_completions
            ));
        }

        if overview.completed_today == overview.habit_count {
            insights.push("Every habit is done for today. Perfect day!".to_string());
        }

        if overview.best_streak >= 7 {
            insights.push(format!("Your best streak so far is {} days.", overview.best_streak));
        }

        insights
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
