/// Command for listing all habits

use serde::{Deserialize, Serialize};

use crate::{AppError, FocusFlow, Overview, Store, StreakSummary};

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize)]
pub struct ListHabitsParams {
    pub sort_by: Option<String>, // "name", "streak", "created" (default)
}

/// One row of the habit list
#[derive(Debug, Serialize)]
pub struct HabitListItem {
    pub habit_id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub frequency: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_completions: u32,
    pub completed_today: bool,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitListItem>,
    pub summary: Overview,
    pub message: String,
}

/// List the current habits
pub fn list_habits<S: Store>(
    app: &FocusFlow<S>,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, AppError> {
    let engine = app.habits();
    let today = engine.today();

    let mut habits: Vec<HabitListItem> = engine
        .habits()
        .iter()
        .map(|habit| {
            let streak = StreakSummary::for_habit(habit, today);
            HabitListItem {
                habit_id: habit.id.to_string(),
                name: habit.name.clone(),
                icon: habit.icon.clone(),
                color: habit.color.clone(),
                frequency: habit.frequency.to_string(),
                current_streak: streak.current_streak,
                best_streak: streak.best_streak,
                total_completions: streak.total_completions,
                completed_today: streak.completed_today,
            }
        })
        .collect();

    match params.sort_by.as_deref().map(str::trim) {
        None | Some("created") => {}
        Some("name") => habits.sort_by_key(|h| h.name.to_lowercase()),
        Some("streak") => habits.sort_by(|a, b| b.current_streak.cmp(&a.current_streak)),
        Some(other) => {
            return Err(AppError::Usage(format!(
                "Invalid sort '{}'. Valid options: name, streak, created",
                other
            )));
        }
    }

    let summary = engine.overview();
    let message = if habits.is_empty() {
        "No habits yet. Create your first habit to get started!".to_string()
    } else {
        habits
            .iter()
            .map(|h| {
                format!(
                    "{} {} [{}] {}  🔥 {} | 🏆 {}  ({})",
                    if h.completed_today { "☑" } else { "☐" },
                    h.icon,
                    h.frequency,
                    h.name,
                    h.current_streak,
                    h.best_streak,
                    h.habit_id
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    Ok(ListHabitsResponse {
        habits,
        summary,
        message,
    })
}
