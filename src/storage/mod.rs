/// Storage layer for persisting application data
///
/// This module defines the collection-oriented store every feature module
/// writes through: six fixed collections of JSON records plus a flat
/// key-value namespace for settings. Snapshot export, import and clear-all
/// are built on top of the primitive operations.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Settings keys carried in a snapshot
pub const SETTINGS_KEYS: [&str; 3] = ["theme", "language", "userName"];

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate key: {collection} already contains a record with key {key}")]
    DuplicateKey { collection: Collection, key: String },

    #[error("Invalid record for {collection}: {reason}")]
    InvalidRecord { collection: Collection, reason: String },

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Storage task failed: {0}")]
    Task(String),
}

/// The named collections of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Tasks,
    Habits,
    Notes,
    Goals,
    Pomodoro,
    Stats,
}

impl Collection {
    /// Every collection, in snapshot order
    pub const ALL: [Collection; 6] = [
        Collection::Tasks,
        Collection::Habits,
        Collection::Notes,
        Collection::Goals,
        Collection::Pomodoro,
        Collection::Stats,
    ];

    /// Name used in storage and snapshots
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::Habits => "habits",
            Collection::Notes => "notes",
            Collection::Goals => "goals",
            Collection::Pomodoro => "pomodoro",
            Collection::Stats => "stats",
        }
    }

    /// Record field that identifies a record in this collection
    pub fn key_field(&self) -> &'static str {
        match self {
            Collection::Stats => "date",
            _ => "id",
        }
    }

    /// Whether records without a key are given the next integer key
    pub fn auto_increment(&self) -> bool {
        matches!(self, Collection::Pomodoro)
    }

    /// Check that `record` can be written to this collection
    ///
    /// The record must be a JSON object carrying a storable key, except that
    /// auto-increment collections also accept a missing or `null` key.
    pub fn validate_record(&self, record: &Value) -> Result<(), StorageError> {
        let object = record
            .as_object()
            .ok_or_else(|| self.invalid("record must be a JSON object"))?;

        match object.get(self.key_field()) {
            None | Some(Value::Null) if self.auto_increment() => Ok(()),
            Some(key) => self.validate_key(key),
            None => Err(self.invalid(format!("missing '{}' field", self.key_field()))),
        }
    }

    /// Check that `key` is a storable key
    pub fn validate_key(&self, key: &Value) -> Result<(), StorageError> {
        if is_storable_key(key) {
            return Ok(());
        }
        Err(self.invalid(format!(
            "'{}' must be a non-empty string or a 64-bit integer, got {}",
            self.key_field(),
            key
        )))
    }

    fn invalid(&self, reason: impl Into<String>) -> StorageError {
        StorageError::InvalidRecord {
            collection: *self,
            reason: reason.into(),
        }
    }
}

/// Keys are non-empty strings or integers that fit in an `i64`
pub fn is_storable_key(key: &Value) -> bool {
    match key {
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.is_i64(),
        _ => false,
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown collection '{}'", s))
    }
}

/// Full backup of the store
///
/// Missing collections deserialize as empty lists. On export `settings`
/// holds exactly [`SETTINGS_KEYS`], with `null` for keys that were never set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Value>,
    #[serde(default)]
    pub habits: Vec<Value>,
    #[serde(default)]
    pub notes: Vec<Value>,
    #[serde(default)]
    pub goals: Vec<Value>,
    #[serde(default)]
    pub pomodoro: Vec<Value>,
    #[serde(default)]
    pub stats: Vec<Value>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl Snapshot {
    /// Records of one collection
    pub fn records(&self, collection: Collection) -> &[Value] {
        match collection {
            Collection::Tasks => &self.tasks,
            Collection::Habits => &self.habits,
            Collection::Notes => &self.notes,
            Collection::Goals => &self.goals,
            Collection::Pomodoro => &self.pomodoro,
            Collection::Stats => &self.stats,
        }
    }

    fn records_mut(&mut self, collection: Collection) -> &mut Vec<Value> {
        match collection {
            Collection::Tasks => &mut self.tasks,
            Collection::Habits => &mut self.habits,
            Collection::Notes => &mut self.notes,
            Collection::Goals => &mut self.goals,
            Collection::Pomodoro => &mut self.pomodoro,
            Collection::Stats => &mut self.stats,
        }
    }

    /// Total number of records across all collections
    pub fn record_count(&self) -> usize {
        Collection::ALL.iter().map(|c| self.records(*c).len()).sum()
    }
}

/// Outcome of [`Store::import_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Records written
    pub inserted: usize,
    /// Records left alone because their key already existed
    pub skipped: usize,
    /// Settings keys written
    pub settings: usize,
}

/// Collection store interface
///
/// Records are JSON objects identified by their collection's key field.
/// All operations are asynchronous and fail independently; nothing is
/// retried.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new record, failing with [`StorageError::DuplicateKey`] if
    /// its key is taken. Returns the record key.
    async fn add(&self, collection: Collection, record: Value) -> Result<Value, StorageError>;

    /// Fetch a record by key; `None` if absent
    async fn get(&self, collection: Collection, key: &Value) -> Result<Option<Value>, StorageError>;

    /// Every record in the collection, in no particular order
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StorageError>;

    /// Insert or replace a record by key. Returns the record key.
    async fn update(&self, collection: Collection, record: Value) -> Result<Value, StorageError>;

    /// Remove a record; absent keys are not an error
    async fn delete(&self, collection: Collection, key: &Value) -> Result<(), StorageError>;

    /// Store a settings value
    async fn set_local(&self, key: &str, value: &Value) -> Result<(), StorageError>;

    /// Read a settings value, or `default` if it is missing or unreadable
    async fn get_local(&self, key: &str, default: Value) -> Result<Value, StorageError>;

    /// Remove a settings value
    async fn remove_local(&self, key: &str) -> Result<(), StorageError>;

    /// Empty every collection and the whole settings namespace
    async fn clear_all(&self) -> Result<(), StorageError>;

    /// Snapshot every collection plus the recognised settings keys
    async fn export_all(&self) -> Result<Snapshot, StorageError> {
        let lists = try_join_all(Collection::ALL.iter().map(|c| self.get_all(*c))).await?;

        let mut snapshot = Snapshot::default();
        for (collection, records) in Collection::ALL.into_iter().zip(lists) {
            *snapshot.records_mut(collection) = records;
        }

        for key in SETTINGS_KEYS {
            let value = self.get_local(key, Value::Null).await?;
            snapshot.settings.insert(key.to_string(), value);
        }

        tracing::info!("Exported {} records", snapshot.record_count());
        Ok(snapshot)
    }

    /// Restore a snapshot
    ///
    /// Every record is validated before the first write, so a snapshot with
    /// an invalid record is rejected as a whole. Records whose key already
    /// exists are skipped. Settings with a `null` value are not written, so
    /// keys that were unset at export stay unset.
    async fn import_all(&self, snapshot: Snapshot) -> Result<ImportReport, StorageError> {
        for collection in Collection::ALL {
            for record in snapshot.records(collection) {
                collection.validate_record(record)?;
            }
        }

        let mut report = ImportReport::default();

        for collection in Collection::ALL {
            for record in snapshot.records(collection) {
                match self.add(collection, record.clone()).await {
                    Ok(_) => report.inserted += 1,
                    Err(StorageError::DuplicateKey { key, .. }) => {
                        tracing::warn!("Skipping existing {} record {}", collection, key);
                        report.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        for (key, value) in &snapshot.settings {
            if value.is_null() {
                continue;
            }
            self.set_local(key, value).await?;
            report.settings += 1;
        }

        tracing::info!(
            "Imported {} records ({} skipped), {} settings",
            report.inserted,
            report.skipped,
            report.settings
        );
        Ok(report)
    }
}
