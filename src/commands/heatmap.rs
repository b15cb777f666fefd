/// Command for the completion heatmap

use serde::{Deserialize, Serialize};

use crate::{AnalyticsEngine, AppError, FocusFlow, HeatmapCell, Store, HEATMAP_DAYS};

/// Parameters for the heatmap
#[derive(Debug, Default, Deserialize)]
pub struct HeatmapParams {
    pub days: Option<u32>, // Defaults to 365
}

/// Response with one cell per day, oldest first
#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    pub cells: Vec<HeatmapCell>,
    pub active_days: usize,
    pub message: String,
}

/// Shade for an intensity, from empty to saturated
fn shade(intensity: f64) -> char {
    match intensity {
        i if i <= 0.0 => '·',
        i if i < 0.4 => '░',
        i if i < 0.8 => '▒',
        i if i < 1.0 => '▓',
        _ => '█',
    }
}

/// Build the heatmap for the requested window
pub fn habit_heatmap<S: Store>(
    app: &FocusFlow<S>,
    params: HeatmapParams,
) -> Result<HeatmapResponse, AppError> {
    let engine = app.habits();

    let cells = match params.days {
        None => engine.heatmap(),
        Some(days) if (1..=HEATMAP_DAYS).contains(&days) => {
            AnalyticsEngine::with_heatmap_days(days).heatmap(engine.habits(), engine.today())
        }
        Some(days) => {
            return Err(AppError::Usage(format!(
                "Heatmap window must be between 1 and {} days, got {}",
                HEATMAP_DAYS, days
            )));
        }
    };

    let active_days = cells.iter().filter(|c| c.count > 0).count();

    // One row per week
    let grid = cells
        .chunks(7)
        .map(|week| week.iter().map(|c| shade(c.intensity)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    let message = format!(
        "{}\n\n{} of {} days with at least one habit completed",
        grid,
        active_days,
        cells.len()
    );

    Ok(HeatmapResponse {
        cells,
        active_days,
        message,
    })
}
