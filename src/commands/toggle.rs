/// Command for marking and unmarking habit completions

use serde::{Deserialize, Serialize};

use crate::commands::parse_habit_id;
use crate::{parse_day, AppError, FocusFlow, Store};

/// Parameters for toggling a habit completion
#[derive(Debug, Deserialize)]
pub struct ToggleHabitParams {
    pub habit_id: String,
    pub date: Option<String>, // YYYY-MM-DD, defaults to today
}

/// Response from toggling a habit
#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub success: bool,
    pub completed: bool,
    pub current_streak: u32,
    pub best_streak: u32,
    pub message: String,
}

/// Toggle a habit's completion for a day
pub async fn toggle_habit<S: Store>(
    app: &mut FocusFlow<S>,
    params: ToggleHabitParams,
) -> Result<ToggleHabitResponse, AppError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let day = params.date.as_deref().map(parse_day).transpose()?;

    let outcome = app.habits_mut().toggle_completion(&habit_id, day).await?;

    let message = if outcome.completed {
        let encouragement = app
            .habits()
            .streak_summary(&habit_id)
            .map(|s| s.motivational_message())
            .unwrap_or_default();
        format!(
            "🔥 Marked complete for {}. Current streak: {} day{}. {}",
            outcome.day,
            outcome.streak,
            if outcome.streak == 1 { "" } else { "s" },
            encouragement
        )
    } else {
        format!(
            "Unmarked {}. Current streak: {} (best {}).",
            outcome.day, outcome.streak, outcome.best_streak
        )
    };

    Ok(ToggleHabitResponse {
        success: true,
        completed: outcome.completed,
        current_streak: outcome.streak,
        best_streak: outcome.best_streak,
        message: message.trim_end().to_string(),
    })
}

