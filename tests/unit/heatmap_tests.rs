use chrono::{Days, NaiveDate};
use focusflow::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn habits_done_today(n: usize) -> Vec<Habit> {
    (0..n)
        .map(|i| {
            let mut habit = Habit::new(NewHabit::named(format!("Habit {}", i))).unwrap();
            habit.toggle_day(today(), today());
            habit
        })
        .collect()
}

#[test]
fn test_heatmap_intensity_scale() {
    let analytics = AnalyticsEngine::with_heatmap_days(1);

    let cases = [(0, 0.0), (2, 0.4), (5, 1.0), (8, 1.0)];
    for (count, expected) in cases {
        let cells = analytics.heatmap(&habits_done_today(count), today());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].count, count as u32);
        assert!((cells[0].intensity - expected).abs() < 1e-9, "count {}", count);
    }
    assert_eq!(SATURATION_COUNT, 5);
    assert_eq!(intensity(1), 0.2);
    assert_eq!(intensity(SATURATION_COUNT * 3), 1.0);
}

#[test]
fn test_default_heatmap_covers_a_year() {
    let analytics = AnalyticsEngine::default();
    let cells = analytics.heatmap(&habits_done_today(1), today());

    assert_eq!(cells.len(), HEATMAP_DAYS as usize);
    assert_eq!(cells.last().unwrap().date, today());
    assert_eq!(
        cells.first().unwrap().date,
        today().checked_sub_days(Days::new(HEATMAP_DAYS as u64 - 1)).unwrap()
    );
    assert!(cells.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(cells.iter().filter(|c| c.count > 0).count(), 1);
}

#[test]
fn test_overview_counts() {
    let mut habits = habits_done_today(2);
    habits.push(Habit::new(NewHabit::named("Idle")).unwrap());

    let overview = AnalyticsEngine::new().overview(&habits, today());
    assert_eq!(overview.habit_count, 3);
    assert_eq!(overview.completed_today, 2);
    assert_eq!(overview.total_completions, 2);
    assert_eq!(overview.best_streak, 1);
}
