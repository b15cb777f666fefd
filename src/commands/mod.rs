/// Commands exposed to front ends
///
/// Each command takes a parameter struct, runs against the application root
/// and returns a serializable response with a human-readable message.

pub mod create;
pub mod toggle;
pub mod list;
pub mod status;
pub mod heatmap;
pub mod data;
pub mod settings;

// Re-export command functions for easy access
pub use create::*;
pub use toggle::*;
pub use list::*;
pub use status::*;
pub use heatmap::*;
pub use data::*;
pub use settings::*;

use crate::{EngineError, HabitId};

/// Parse a habit id argument; a blank id is reported as not found
fn parse_habit_id(raw: &str) -> Result<HabitId, EngineError> {
    HabitId::parse(raw).map_err(|_| EngineError::HabitNotFound {
        habit_id: raw.to_string(),
    })
}
