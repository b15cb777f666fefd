/// Public library interface for FocusFlow
///
/// This module exports the application root together with the storage,
/// domain, engine and analytics types it is assembled from.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod analytics;
mod engine;
pub mod commands;
pub mod config;

// Re-export public modules and types
pub use domain::*;
pub use storage::{Collection, ImportReport, SqliteStore, Snapshot, StorageError, Store, SETTINGS_KEYS};
pub use analytics::{intensity, AnalyticsEngine, HeatmapCell, Overview, HEATMAP_DAYS, SATURATION_COUNT};
pub use engine::{EngineError, HabitEngine, HabitEvent, ToggleOutcome};

/// Errors that can occur while running the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Habit error: {0}")]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

/// Application root
///
/// Owns the store and the habit engine built on it. Consumers receive this
/// value (or references into it) instead of reaching for globals.
pub struct FocusFlow<S: Store = SqliteStore> {
    store: Arc<S>,
    habits: HabitEngine<S>,
}

impl FocusFlow<SqliteStore> {
    /// Open the database at `db_path` and load existing habits
    ///
    /// Fails if the database cannot be opened or migrated; nothing else
    /// runs until that succeeds.
    pub async fn new(db_path: PathBuf) -> Result<Self, AppError> {
        tracing::info!("Initializing FocusFlow with database: {:?}", db_path);

        let store = SqliteStore::open(db_path)?;
        Self::with_store(Arc::new(store), Arc::new(SystemClock)).await
    }
}

impl<S: Store> FocusFlow<S> {
    /// Assemble the application from an existing store and clock
    pub async fn with_store(store: Arc<S>, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let mut habits = HabitEngine::new(Arc::clone(&store), clock);
        habits.load().await?;

        Ok(Self { store, habits })
    }

    /// Get a reference to the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the habit engine
    pub fn habits(&self) -> &HabitEngine<S> {
        &self.habits
    }

    /// Get a mutable reference to the habit engine
    pub fn habits_mut(&mut self) -> &mut HabitEngine<S> {
        &mut self.habits
    }

    /// Restore a snapshot and reload habits from storage
    ///
    /// Habit records that would not load are rejected before anything is
    /// written. Habits are reloaded whether or not the import succeeds.
    pub async fn import(&mut self, snapshot: Snapshot) -> Result<ImportReport, AppError> {
        for record in &snapshot.habits {
            if let Err(e) = Habit::deserialize(record) {
                return Err(StorageError::InvalidRecord {
                    collection: Collection::Habits,
                    reason: e.to_string(),
                }
                .into());
            }
        }

        let result = self.store.import_all(snapshot).await;
        // Earlier records may be written even when the import fails
        self.habits.load().await?;
        Ok(result?)
    }

    /// Wipe all data and empty the in-memory habit list
    pub async fn clear(&mut self) -> Result<(), AppError> {
        self.store.clear_all().await?;
        self.habits.load().await?;
        Ok(())
    }
}
