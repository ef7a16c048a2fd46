//! Integration tests for summary derivations over a seeded store

use chrono::{Duration, Local, Utc};
use metrika_domain::service::{water_series, weekly_activity, weight_series};
use metrika_domain::HealthStore;
use metrika_store::MemoryHealthStore;
use metrika_types::{MetricKind, WorkoutKind};

/// Each workout picks up the active energy logged over its own interval,
/// and energy outside any workout stays out of the totals.
#[tokio::test]
async fn test_weekly_activity_joins_energy_per_workout() {
    let store = MemoryHealthStore::new();
    let now = Utc::now();

    let run_start = now - Duration::hours(2);
    let run_end = now - Duration::hours(1);
    store
        .save_workout(WorkoutKind::Running, run_start, run_end)
        .await
        .unwrap();

    let ride_start = now - Duration::hours(26);
    let ride_end = now - Duration::hours(25);
    store
        .save_workout(WorkoutKind::Cycling, ride_start, ride_end)
        .await
        .unwrap();

    let mid_run = run_start + Duration::minutes(30);
    store
        .save_sample(MetricKind::ActiveEnergy, 180.0, mid_run, mid_run)
        .await
        .unwrap();
    let mid_ride = ride_start + Duration::minutes(30);
    store
        .save_sample(MetricKind::ActiveEnergy, 320.0, mid_ride, mid_ride)
        .await
        .unwrap();

    // Energy logged outside any workout interval
    let idle = now - Duration::minutes(10);
    store
        .save_sample(MetricKind::ActiveEnergy, 50.0, idle, idle)
        .await
        .unwrap();

    let summary = weekly_activity(&store).await.unwrap();
    assert_eq!(summary.count(), 2);
    assert!((summary.total_minutes - 120.0).abs() < 1e-9);
    assert!((summary.total_kcal - 500.0).abs() < 1e-9);

    // Newest first
    assert_eq!(summary.workouts[0].workout.kind, WorkoutKind::Running);
    assert!((summary.workouts[0].energy_kcal - 180.0).abs() < 1e-9);
    assert_eq!(summary.workouts[1].workout.kind, WorkoutKind::Cycling);
    assert!((summary.workouts[1].energy_kcal - 320.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_weekly_activity_on_empty_store() {
    let store = MemoryHealthStore::new();
    let summary = weekly_activity(&store).await.unwrap();
    assert_eq!(summary.count(), 0);
    assert_eq!(summary.total_minutes, 0.0);
    assert_eq!(summary.total_kcal, 0.0);
}

/// A workout with no energy samples still appears, with zero kcal
#[tokio::test]
async fn test_workout_without_energy_counts_zero() {
    let store = MemoryHealthStore::new();
    let now = Utc::now();

    store
        .save_workout(WorkoutKind::Yoga, now - Duration::hours(1), now)
        .await
        .unwrap();

    let summary = weekly_activity(&store).await.unwrap();
    assert_eq!(summary.count(), 1);
    assert_eq!(summary.workouts[0].energy_kcal, 0.0);
    assert!((summary.total_minutes - 60.0).abs() < 1e-9);
}

/// Days without water samples appear in the series with a zero total
#[tokio::test]
async fn test_water_series_zero_fills_missing_days() {
    let store = MemoryHealthStore::new();
    let now = Utc::now();

    store
        .save_sample(MetricKind::DietaryWater, 0.25, now, now)
        .await
        .unwrap();
    store
        .save_sample(MetricKind::DietaryWater, 0.75, now, now)
        .await
        .unwrap();

    let series = water_series(&store, 3).await.unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series[0].total, 0.0);
    assert_eq!(series[1].total, 0.0);
    assert!((series[2].total - 1.0).abs() < 1e-9);
    assert_eq!(series[2].day, now.with_timezone(&Local).date_naive());
    assert!(series[0].day < series[1].day && series[1].day < series[2].day);
}

#[tokio::test]
async fn test_weight_series_oldest_first() {
    let store = MemoryHealthStore::new();
    let now = Utc::now();

    for (days_back, kilograms) in [(3i64, 74.0), (1, 73.2), (0, 72.8)] {
        let at = now - Duration::days(days_back);
        store
            .save_sample(MetricKind::BodyMass, kilograms, at, at)
            .await
            .unwrap();
    }

    let series = weight_series(&store, 30).await.unwrap();
    let values: Vec<f64> = series.iter().map(|s| s.value).collect();
    assert_eq!(values, vec![74.0, 73.2, 72.8]);
}
