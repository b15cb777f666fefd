/// SQLite implementation of the collection store
///
/// This module provides the concrete SQLite implementation of [`Store`].
/// SQLite calls are blocking, so each operation runs on tokio's blocking
/// pool with the connection shared behind a mutex.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde_json::Value;

use crate::storage::{is_storable_key, migrations, Collection, Store, StorageError};

/// SQLite-based store
///
/// Cloning is cheap and every clone talks to the same database.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file and bring its schema up to date
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let store = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        migrations::initialize_database(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StorageError::Connection("connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

/// Encode a key value for the `key` column
fn encode_key(collection: Collection, key: &Value) -> Result<String, StorageError> {
    collection.validate_key(key)?;
    Ok(serde_json::to_string(key)?)
}

/// Encode a lookup key; `None` for keys no record can have
fn lookup_key(key: &Value) -> Result<Option<String>, StorageError> {
    if !is_storable_key(key) {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(key)?))
}

/// Extract and encode the key of a validated record
fn record_key(collection: Collection, record: &Value) -> Result<(Value, String), StorageError> {
    collection.validate_record(record)?;

    let key = record
        .get(collection.key_field())
        .cloned()
        .unwrap_or(Value::Null);

    let encoded = encode_key(collection, &key)?;
    Ok((key, encoded))
}

/// Give auto-increment records without a key the next integer key
fn assign_key(conn: &Connection, collection: Collection, record: &mut Value) -> Result<(), StorageError> {
    if !collection.auto_increment() {
        return Ok(());
    }

    let field = collection.key_field();
    let Some(object) = record.as_object_mut() else {
        return Ok(());
    };

    if object.get(field).map_or(true, Value::is_null) {
        let max: Option<i64> = conn.query_row(
            "SELECT MAX(CAST(key AS INTEGER)) FROM records
             WHERE collection = ?1 AND key GLOB '[0-9]*'",
            params![collection.name()],
            |row| row.get(0),
        )?;

        let next = max.unwrap_or(0).checked_add(1).ok_or_else(|| StorageError::InvalidRecord {
            collection,
            reason: format!("no integer '{}' left to assign", field),
        })?;
        object.insert(field.to_string(), Value::from(next));
    }

    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn add(&self, collection: Collection, record: Value) -> Result<Value, StorageError> {
        self.with_conn(move |conn| {
            let mut record = record;
            assign_key(conn, collection, &mut record)?;
            let (key, encoded) = record_key(collection, &record)?;
            let body = serde_json::to_string(&record)?;

            match conn.execute(
                "INSERT INTO records (collection, key, body) VALUES (?1, ?2, ?3)",
                params![collection.name(), encoded, body],
            ) {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                    return Err(StorageError::DuplicateKey { collection, key: encoded });
                }
                Err(e) => return Err(e.into()),
            }

            tracing::debug!("Added {} record {}", collection, encoded);
            Ok(key)
        })
        .await
    }

    async fn get(&self, collection: Collection, key: &Value) -> Result<Option<Value>, StorageError> {
        let Some(encoded) = lookup_key(key)? else {
            return Ok(None);
        };

        self.with_conn(move |conn| {
            let body: Option<String> = conn
                .query_row(
                    "SELECT body FROM records WHERE collection = ?1 AND key = ?2",
                    params![collection.name(), encoded],
                    |row| row.get(0),
                )
                .optional()?;

            Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
        })
        .await
    }

    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StorageError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT body FROM records WHERE collection = ?1 ORDER BY key"
            )?;
            let bodies = stmt
                .query_map(params![collection.name()], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            let mut records = Vec::with_capacity(bodies.len());
            for body in bodies {
                records.push(serde_json::from_str(&body)?);
            }
            Ok(records)
        })
        .await
    }

    async fn update(&self, collection: Collection, record: Value) -> Result<Value, StorageError> {
        self.with_conn(move |conn| {
            let mut record = record;
            assign_key(conn, collection, &mut record)?;
            let (key, encoded) = record_key(collection, &record)?;
            let body = serde_json::to_string(&record)?;

            conn.execute(
                "INSERT INTO records (collection, key, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT (collection, key) DO UPDATE SET body = excluded.body",
                params![collection.name(), encoded, body],
            )?;

            tracing::debug!("Upserted {} record {}", collection, encoded);
            Ok(key)
        })
        .await
    }

    async fn delete(&self, collection: Collection, key: &Value) -> Result<(), StorageError> {
        let Some(encoded) = lookup_key(key)? else {
            return Ok(());
        };

        self.with_conn(move |conn| {
            let rows = conn.execute(
                "DELETE FROM records WHERE collection = ?1 AND key = ?2",
                params![collection.name(), encoded],
            )?;

            if rows > 0 {
                tracing::debug!("Deleted {} record {}", collection, encoded);
            }
            Ok(())
        })
        .await
    }

    async fn set_local(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let key = key.to_string();
        let text = serde_json::to_string(value)?;

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO local_settings (key, value) VALUES (?1, ?2)",
                params![key, text],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_local(&self, key: &str, default: Value) -> Result<Value, StorageError> {
        let owned_key = key.to_string();
        let text: Option<String> = self
            .with_conn(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT value FROM local_settings WHERE key = ?1",
                        params![owned_key],
                        |row| row.get(0),
                    )
                    .optional()?)
            })
            .await?;

        let Some(text) = text else {
            return Ok(default);
        };

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Unreadable setting '{}', using default: {}", key, e);
                Ok(default)
            }
        }
    }

    async fn remove_local(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();

        self.with_conn(move |conn| {
            conn.execute("DELETE FROM local_settings WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute("DELETE FROM records", [])?;
            tx.execute("DELETE FROM local_settings", [])?;
            tx.commit()?;

            tracing::info!("Cleared all collections and settings");
            Ok(())
        })
        .await
    }
}
