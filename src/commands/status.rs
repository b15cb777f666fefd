/// Command for checking habit status and streaks

use serde::{Deserialize, Serialize};

use crate::commands::parse_habit_id;
use crate::{AppError, EngineError, FocusFlow, Habit, Store, StreakSummary};
use chrono::NaiveDate;

/// Parameters for checking habit status
#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    pub habit_id: Option<String>, // If omitted, returns all habits
}

/// Status of a single habit
#[derive(Debug, Serialize)]
pub struct HabitStatus {
    pub habit_id: String,
    pub name: String,
    pub streak: StreakSummary,
    pub scheduled_today: bool,
    pub status: String, // "done", "on_track", "rest_day", "missed", "new"
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habits: Vec<HabitStatus>,
    pub insights: Vec<String>,
    pub message: String,
}

fn status_label(summary: &StreakSummary, scheduled_today: bool) -> &'static str {
    if summary.completed_today {
        "done"
    } else if summary.total_completions == 0 {
        "new"
    } else if summary.current_streak > 0 {
        "on_track"
    } else if !scheduled_today {
        "rest_day"
    } else {
        "missed"
    }
}

fn habit_status(habit: &Habit, today: NaiveDate) -> HabitStatus {
    let streak = StreakSummary::for_habit(habit, today);
    let scheduled_today = habit.frequency.is_scheduled_for_date(today);
    HabitStatus {
        habit_id: habit.id.to_string(),
        name: habit.name.clone(),
        status: status_label(&streak, scheduled_today).to_string(),
        scheduled_today,
        streak,
    }
}

/// Get status for one habit or all of them
pub fn get_habit_status<S: Store>(
    app: &FocusFlow<S>,
    params: StatusParams,
) -> Result<StatusResponse, AppError> {
    let engine = app.habits();
    let today = engine.today();

    let habits = match params.habit_id {
        Some(raw) => {
            let habit_id = parse_habit_id(&raw)?;
            let habit = engine
                .habit(&habit_id)
                .ok_or(EngineError::HabitNotFound { habit_id: raw })?;
            vec![habit_status(habit, today)]
        }
        None => engine.habits().iter().map(|h| habit_status(h, today)).collect(),
    };

    let insights = engine.analytics().insights(&engine.overview());

    let details = habits
        .iter()
        .map(|h| {
            format!(
                "🎯 {} [{}]\n   Current streak: {} | Best: {} | Longest run: {} | Total: {}{}",
                h.name,
                h.status,
                h.streak.current_streak,
                h.streak.best_streak,
                h.streak.longest_run,
                h.streak.total_completions,
                h.streak
                    .last_completed
                    .map(|d| format!("\n   Last completed: {}", d))
                    .unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let message = if details.is_empty() {
        insights.join("\n")
    } else {
        format!("{}\n\n{}", insights.join("\n"), details)
    };

    Ok(StatusResponse {
        habits,
        insights,
        message,
    })
}
