use std::collections::HashSet;

use focusflow::*;
use serde_json::{json, Value};
use tokio_test::assert_ok;

use crate::common::{app, days_back};

fn as_set(records: &[Value]) -> HashSet<String> {
    records.iter().map(|r| r.to_string()).collect()
}

async fn seed(app: &mut FocusFlow<SqliteStore>) {
    let store = app.store();
    assert_ok!(store.add(Collection::Tasks, json!({"id": "t1", "title": "Plan week", "status": "todo", "priority": "high"})).await);
    assert_ok!(store.add(Collection::Tasks, json!({"id": "t2", "title": "Review", "status": "done"})).await);
    assert_ok!(store.add(Collection::Notes, json!({"id": "n1", "category": "ideas", "created": 1718000000000i64})).await);
    assert_ok!(store.add(Collection::Goals, json!({"id": "g1", "deadline": "2024-12-31"})).await);
    assert_ok!(store.add(Collection::Pomodoro, json!({"duration": 25, "type": "focus"})).await);
    assert_ok!(store.add(Collection::Stats, json!({"date": "2024-09-11", "pomodoros": 4})).await);
    assert_ok!(store.set_local("theme", &json!("dark")).await);
    assert_ok!(store.set_local("language", &json!("en")).await);
    assert_ok!(store.set_local("userName", &json!("Alex")).await);

    let habit = app
        .habits_mut()
        .create_habit(NewHabit::named("Read"))
        .await
        .unwrap();
    for n in [2, 1, 0] {
        app.habits_mut()
            .toggle_completion(&habit.id, Some(days_back(n)))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_export_clear_import_round_trip() {
    let (mut app, _file) = app().await;
    seed(&mut app).await;

    let before = app.store().export_all().await.unwrap();
    assert_eq!(before.record_count(), 7);
    assert_eq!(before.settings.len(), SETTINGS_KEYS.len());

    app.clear().await.unwrap();
    let empty = app.store().export_all().await.unwrap();
    assert_eq!(empty.record_count(), 0);
    assert!(empty.settings.values().all(Value::is_null));
    assert!(app.habits().habits().is_empty());

    // Go through JSON text, as a backup file would
    let text = serde_json::to_string(&before).unwrap();
    let report = app.import(serde_json::from_str(&text).unwrap()).await.unwrap();
    assert_eq!(report.inserted, 7);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.settings, 3);

    let after = app.store().export_all().await.unwrap();
    for collection in Collection::ALL {
        assert_eq!(
            as_set(after.records(collection)),
            as_set(before.records(collection)),
            "collection {} differs",
            collection
        );
    }
    assert_eq!(after.settings, before.settings);

    let habit = &app.habits().habits()[0];
    assert_eq!(habit.streak, 3);
    assert_eq!(habit.completions.len(), 3);
}

#[tokio::test]
async fn test_export_only_carries_recognised_settings() {
    let (app, _file) = app().await;
    app.store().set_local("theme", &json!("light")).await.unwrap();
    app.store().set_local("soundVolume", &json!(0.3)).await.unwrap();

    let snapshot = app.store().export_all().await.unwrap();
    let keys: Vec<&str> = snapshot.settings.keys().map(String::as_str).collect();

    assert_eq!(keys.len(), 3);
    for key in SETTINGS_KEYS {
        assert!(keys.contains(&key));
    }
    assert_eq!(snapshot.settings["theme"], "light");
    assert_eq!(snapshot.settings["userName"], Value::Null);
}

#[tokio::test]
async fn test_import_skips_existing_records() {
    let (mut app, _file) = app().await;
    app.store()
        .add(Collection::Tasks, json!({"id": "t1", "title": "local copy"}))
        .await
        .unwrap();

    let snapshot: Snapshot = serde_json::from_value(json!({
        "tasks": [
            {"id": "t1", "title": "backup copy"},
            {"id": "t2", "title": "new"}
        ],
        "settings": {"theme": "dark", "language": null}
    }))
    .unwrap();

    let report = app.import(snapshot).await.unwrap();
    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.settings, 1);

    let kept = app.store().get(Collection::Tasks, &json!("t1")).await.unwrap().unwrap();
    assert_eq!(kept["title"], "local copy");

    // A null setting is not written
    let language = app.store().get_local("language", json!("fallback")).await.unwrap();
    assert_eq!(language, json!("fallback"));
}

#[tokio::test]
async fn test_import_reloads_habits() {
    let (mut app, _file) = app().await;
    let snapshot: Snapshot = serde_json::from_value(json!({
        "habits": [{
            "id": HabitId::new(),
            "name": "Imported",
            "icon": "📚",
            "color": "#10b981",
            "frequency": "weekdays",
            "createdAt": 1700000000000i64,
            "streak": 2,
            "bestStreak": 9,
            "completions": ["2024-09-10", "2024-09-11"]
        }]
    }))
    .unwrap();

    app.import(snapshot).await.unwrap();

    let habits = app.habits().habits();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].frequency, Frequency::Weekdays);
    assert_eq!(habits[0].best_streak, 9);
}

#[tokio::test]
async fn test_duplicate_add_reports_duplicate_key() {
    let (app, _file) = app().await;
    let store = app.store();
    store.add(Collection::Notes, json!({"id": "n", "text": "first"})).await.unwrap();

    match store.add(Collection::Notes, json!({"id": "n", "text": "second"})).await {
        Err(StorageError::DuplicateKey { collection, .. }) => assert_eq!(collection, Collection::Notes),
        other => panic!("expected duplicate key error, got {:?}", other),
    }

    let notes = store.get_all(Collection::Notes).await.unwrap();
    assert_eq!(notes, vec![json!({"id": "n", "text": "first"})]);
}

#[tokio::test]
async fn test_import_habit_with_plain_string_id() {
    let (mut app, _file) = app().await;
    let snapshot: Snapshot = serde_json::from_value(json!({
        "habits": [{
            "id": "h1",
            "name": "Hand-written",
            "createdAt": 1700000000000i64,
            "completions": ["2024-09-11"]
        }]
    }))
    .unwrap();

    let report = app.import(snapshot).await.unwrap();
    assert_eq!(report.inserted, 1);

    let id = HabitId::parse("h1").unwrap();
    assert_eq!(app.habits().habits().len(), 1);
    assert!(app.habits().habit(&id).is_some());

    let outcome = app.habits_mut().toggle_completion(&id, None).await.unwrap();
    assert!(outcome.completed);
    assert_eq!(outcome.streak, 2);
}

#[tokio::test]
async fn test_invalid_record_rejects_whole_import() {
    let (mut app, _file) = app().await;
    let snapshot: Snapshot = serde_json::from_value(json!({
        "tasks": [{"id": "t1"}],
        "habits": [{"id": "h1", "name": "Valid", "createdAt": 0}],
        "stats": [{"pomodoros": 3}],
        "settings": {"theme": "dark"}
    }))
    .unwrap();

    match app.import(snapshot).await {
        Err(AppError::Database(StorageError::InvalidRecord { collection, .. })) => {
            assert_eq!(collection, Collection::Stats)
        }
        other => panic!("expected invalid record error, got {:?}", other),
    }

    let stored = app.store().export_all().await.unwrap();
    assert_eq!(stored.record_count(), 0);
    assert_eq!(stored.settings["theme"], Value::Null);
    assert!(app.habits().habits().is_empty());
}

#[tokio::test]
async fn test_unloadable_habit_rejects_import() {
    let (mut app, _file) = app().await;
    let snapshot: Snapshot = serde_json::from_value(json!({
        "habits": [
            {"id": "ok", "name": "Fine"},
            {"id": "bad", "name": 42}
        ]
    }))
    .unwrap();

    match app.import(snapshot).await {
        Err(AppError::Database(StorageError::InvalidRecord { collection, .. })) => {
            assert_eq!(collection, Collection::Habits)
        }
        other => panic!("expected invalid record error, got {:?}", other),
    }
    assert!(app.store().get_all(Collection::Habits).await.unwrap().is_empty());
}
