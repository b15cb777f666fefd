/// Habit engine: the stateful layer between callers and the store
///
/// The engine owns the in-memory habit list, applies mutations through the
/// domain types, writes them through a [`Store`](crate::storage::Store) and
/// announces every change on a broadcast channel.

pub mod habits;

pub use habits::*;

use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Errors returned by engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },
}
