use std::sync::Arc;

use chrono::NaiveDate;
use focusflow::*;
use tempfile::NamedTempFile;

/// Fixed "today" used by every integration test
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 12).unwrap()
}

pub fn days_back(n: u64) -> NaiveDate {
    today().checked_sub_days(chrono::Days::new(n)).unwrap()
}

/// Application on a fresh temp database with a pinned clock
///
/// The temp file must outlive the app, so both are returned.
pub async fn app() -> (FocusFlow<SqliteStore>, NamedTempFile) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let store = SqliteStore::open(temp_file.path()).expect("Failed to open store");
    let app = FocusFlow::with_store(Arc::new(store), Arc::new(FixedClock(today())))
        .await
        .expect("Failed to create app");
    (app, temp_file)
}
