/// Domain module containing core business logic and data types
///
/// This module defines the habit record, its streak arithmetic and the
/// calendar primitives (ids, frequencies, clocks) they are built on.
/// Nothing in here touches storage.

pub mod habit;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid habit id: {0}")]
    InvalidHabitId(String),

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
