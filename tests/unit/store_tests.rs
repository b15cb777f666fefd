use std::sync::Arc;

use chrono::NaiveDate;
use focusflow::*;
use serde_json::{json, Value};
use tempfile::TempDir;

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("focusflow.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.add(Collection::Goals, json!({"id": "g1", "title": "Ship it"})).await.unwrap();
        store.set_local("userName", &json!("Sam")).await.unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let goal = store.get(Collection::Goals, &json!("g1")).await.unwrap();
    assert_eq!(goal, Some(json!({"id": "g1", "title": "Ship it"})));
    assert_eq!(store.get_local("userName", Value::Null).await.unwrap(), json!("Sam"));
}

#[tokio::test]
async fn test_store_usable_as_trait_object() {
    let store: Arc<dyn Store> = Arc::new(SqliteStore::open_in_memory().unwrap());
    store.add(Collection::Tasks, json!({"id": "a"})).await.unwrap();

    let snapshot = store.export_all().await.unwrap();
    assert_eq!(snapshot.tasks, vec![json!({"id": "a"})]);

    store.clear_all().await.unwrap();
    assert_eq!(store.export_all().await.unwrap().record_count(), 0);
}

#[tokio::test]
async fn test_clones_share_the_database() {
    let store = SqliteStore::open_in_memory().unwrap();
    let other = store.clone();

    other.add(Collection::Notes, json!({"id": "n"})).await.unwrap();
    assert_eq!(store.get_all(Collection::Notes).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_engine_reload_from_shared_store() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()));

    let mut engine = HabitEngine::new(Arc::clone(&store), Arc::clone(&clock));
    let habit = engine.create_habit(NewHabit::named("Swim")).await.unwrap();
    engine.toggle_completion(&habit.id, None).await.unwrap();

    let mut fresh = HabitEngine::new(store, clock);
    assert_eq!(fresh.load().await.unwrap(), 1);
    let loaded = fresh.habit(&habit.id).unwrap();
    assert_eq!(loaded.streak, 1);
    assert_eq!(loaded.completions.len(), 1);
}


/// Store that refuses every write to `stats`
struct NoStatsStore(SqliteStore);

#[async_trait::async_trait]
impl Store for NoStatsStore {
    async fn add(&self, collection: Collection, record: Value) -> Result<Value, StorageError> {
        if collection == Collection::Stats {
            return Err(StorageError::Connection("disk full".to_string()));
        }
        self.0.add(collection, record).await
    }
    async fn get(&self, collection: Collection, key: &Value) -> Result<Option<Value>, StorageError> {
        self.0.get(collection, key).await
    }
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StorageError> {
        self.0.get_all(collection).await
    }
    async fn update(&self, collection: Collection, record: Value) -> Result<Value, StorageError> {
        self.0.update(collection, record).await
    }
    async fn delete(&self, collection: Collection, key: &Value) -> Result<(), StorageError> {
        self.0.delete(collection, key).await
    }
    async fn set_local(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.0.set_local(key, value).await
    }
    async fn get_local(&self, key: &str, default: Value) -> Result<Value, StorageError> {
        self.0.get_local(key, default).await
    }
    async fn remove_local(&self, key: &str) -> Result<(), StorageError> {
        self.0.remove_local(key).await
    }
    async fn clear_all(&self) -> Result<(), StorageError> {
        self.0.clear_all().await
    }
}

#[tokio::test]
async fn test_failed_import_still_reloads_habits() {
    let store = Arc::new(NoStatsStore(SqliteStore::open_in_memory().unwrap()));
    let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()));
    let mut app = FocusFlow::with_store(Arc::clone(&store), clock).await.unwrap();

    let snapshot: Snapshot = serde_json::from_value(json!({
        "habits": [{"id": "h1", "name": "Swim", "createdAt": 0}],
        "stats": [{"date": "2024-02-09", "pomodoros": 3}]
    }))
    .unwrap();

    assert!(app.import(snapshot).await.is_err());

    // The habit was written before the failure and memory matches storage
    assert_eq!(store.get_all(Collection::Habits).await.unwrap().len(), 1);
    assert_eq!(app.habits().habits().len(), 1);
}
