/// Command for creating new habits

use serde::{Deserialize, Serialize};

use crate::{AppError, FocusFlow, Frequency, NewHabit, Store};

/// Parameters for creating a new habit
#[derive(Debug, Default, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub frequency: Option<String>, // Parsed to Frequency
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

/// Create a new habit
pub async fn create_habit<S: Store>(
    app: &mut FocusFlow<S>,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, AppError> {
    let frequency = params
        .frequency
        .as_deref()
        .map(str::parse::<Frequency>)
        .transpose()?;

    let habit = app
        .habits_mut()
        .create_habit(NewHabit {
            name: params.name,
            icon: params.icon,
            color: params.color,
            frequency,
        })
        .await?;

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("{} Created habit '{}'! Ready to start your streak!", habit.icon, habit.name),
    })
}
