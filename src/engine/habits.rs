/// Habit creation, completion toggling and derived views
///
/// Every mutation follows the same order: change a copy of the habit,
/// persist it, then replace the in-memory record and notify subscribers.
/// A failed write leaves the in-memory list untouched.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::analytics::{AnalyticsEngine, HeatmapCell, Overview};
use crate::domain::{Clock, DomainError, Habit, HabitId, NewHabit, StreakSummary};
use crate::engine::EngineError;
use crate::storage::{Collection, StorageError, Store};

const EVENT_CAPACITY: usize = 64;

/// Change notification published after each mutation
#[derive(Debug, Clone, PartialEq)]
pub enum HabitEvent {
    /// The habit list was (re)loaded from storage
    Loaded { count: usize },
    /// A habit was created
    Created { habit_id: HabitId },
    /// A day was marked or unmarked
    Toggled {
        habit_id: HabitId,
        day: NaiveDate,
        completed: bool,
    },
}

/// Result of a completion toggle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleOutcome {
    pub habit_id: HabitId,
    pub day: NaiveDate,
    /// Whether `day` is completed after the toggle
    pub completed: bool,
    pub streak: u32,
    pub best_streak: u32,
}

/// Owns the habit list and keeps it in step with the store
pub struct HabitEngine<S: Store> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    analytics: AnalyticsEngine,
    habits: Vec<Habit>,
    events: broadcast::Sender<HabitEvent>,
}

impl<S: Store> HabitEngine<S> {
    /// Create an engine with an empty habit list; call [`load`](Self::load)
    /// to read existing habits
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            clock,
            analytics: AnalyticsEngine::new(),
            habits: Vec::new(),
            events,
        }
    }

    /// Replace the analytics settings (e.g. a shorter heatmap window)
    pub fn with_analytics(mut self, analytics: AnalyticsEngine) -> Self {
        self.analytics = analytics;
        self
    }

    /// Replace the in-memory list with the stored habits
    ///
    /// Records that do not decode as habits are skipped.
    pub async fn load(&mut self) -> Result<usize, EngineError> {
        let records = self.store.get_all(Collection::Habits).await?;

        let mut habits = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::from_value::<Habit>(record) {
                Ok(habit) => habits.push(habit),
                Err(e) => warn!("Skipping unreadable habit record: {}", e),
            }
        }
        habits.sort_by_key(|h| h.created_at);

        let count = habits.len();
        self.habits = habits;
        info!("Loaded {} habits", count);
        self.notify(HabitEvent::Loaded { count });
        Ok(count)
    }

    /// Create and persist a new habit
    pub async fn create_habit(&mut self, request: NewHabit) -> Result<Habit, EngineError> {
        let habit = Habit::new(request)?;

        let record = serde_json::to_value(&habit).map_err(StorageError::from)?;
        self.store.add(Collection::Habits, record).await?;

        info!("Created habit: {} ({})", habit.name, habit.id);
        self.habits.push(habit.clone());
        self.notify(HabitEvent::Created {
            habit_id: habit.id.clone(),
        });
        Ok(habit)
    }

    /// Mark or unmark `day` (default today) for a habit
    ///
    /// Streaks are recomputed on both directions of the toggle. Days after
    /// today are rejected.
    pub async fn toggle_completion(
        &mut self,
        habit_id: &HabitId,
        day: Option<NaiveDate>,
    ) -> Result<ToggleOutcome, EngineError> {
        let today = self.clock.today();
        let day = day.unwrap_or(today);

        if day > today {
            return Err(DomainError::InvalidDate(format!(
                "Cannot mark {} complete, it is in the future",
                day
            ))
            .into());
        }

        let index = self
            .habits
            .iter()
            .position(|h| &h.id == habit_id)
            .ok_or_else(|| EngineError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })?;

        let mut updated = self.habits[index].clone();
        let completed = updated.toggle_day(day, today);

        let record = serde_json::to_value(&updated).map_err(StorageError::from)?;
        self.store.update(Collection::Habits, record).await?;

        debug!(
            "Habit {} {} for {} (streak {}, best {})",
            updated.id,
            if completed { "completed" } else { "uncompleted" },
            day,
            updated.streak,
            updated.best_streak
        );

        let outcome = ToggleOutcome {
            habit_id: updated.id.clone(),
            day,
            completed,
            streak: updated.streak,
            best_streak: updated.best_streak,
        };

        self.habits[index] = updated;
        self.notify(HabitEvent::Toggled {
            habit_id: outcome.habit_id.clone(),
            day,
            completed,
        });
        Ok(outcome)
    }

    /// Current habits, oldest first
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up one habit
    pub fn habit(&self, habit_id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| &h.id == habit_id)
    }

    /// Today according to the engine's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Streak report for one habit
    pub fn streak_summary(&self, habit_id: &HabitId) -> Option<StreakSummary> {
        self.habit(habit_id)
            .map(|habit| StreakSummary::for_habit(habit, self.today()))
    }

    /// Completion heatmap ending today
    pub fn heatmap(&self) -> Vec<HeatmapCell> {
        self.analytics.heatmap(&self.habits, self.today())
    }

    /// Aggregate figures for the current habits
    pub fn overview(&self) -> Overview {
        self.analytics.overview(&self.habits, self.today())
    }

    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }

    /// Receive change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<HabitEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: HabitEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
