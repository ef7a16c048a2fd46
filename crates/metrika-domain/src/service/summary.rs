//! Summary derivations over the health store
//!
//! Pure read-side derivations: nothing here mutates the store, and every
//! empty query result is treated as a valid zero, not an error.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use metrika_types::{
    DailyTotal, DateRange, MetricKind, QuantitySample, Result, SampleSort, Workout,
};

use crate::repository::HealthStore;

/// Days covered by the workout summary
pub const ACTIVITY_WINDOW_DAYS: u64 = 7;

/// Default window for time-series reports
pub const SERIES_WINDOW_DAYS: u64 = 30;

/// Most recent weight reading for display
#[derive(Debug, Clone, Serialize)]
pub struct WeightReading {
    pub kilograms: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<QuantitySample> for WeightReading {
    fn from(sample: QuantitySample) -> Self {
        Self {
            kilograms: sample.value,
            recorded_at: sample.end,
        }
    }
}

/// Today's water intake against the configured goal
#[derive(Debug, Clone, Serialize)]
pub struct HydrationSummary {
    pub today_liters: f64,
    pub goal_liters: f64,
}

impl HydrationSummary {
    /// Fraction of the goal reached, clamped to 1.0 for display
    pub fn progress(&self) -> f64 {
        if self.goal_liters > 0.0 {
            (self.today_liters / self.goal_liters).min(1.0)
        } else {
            0.0
        }
    }

    pub fn remaining_liters(&self) -> f64 {
        (self.goal_liters - self.today_liters).max(0.0)
    }
}

/// Today's dashboard card values
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub latest_weight: Option<WeightReading>,
    pub water: HydrationSummary,
    pub exercise_minutes: f64,
    pub active_energy_kcal: f64,
}

/// One workout joined with its derived duration and energy
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSummary {
    pub workout: Workout,
    pub duration_minutes: f64,
    pub energy_kcal: f64,
}

/// Aggregated workouts over the activity window
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivitySummary {
    pub workouts: Vec<WorkoutSummary>,
    pub total_minutes: f64,
    pub total_kcal: f64,
}

impl ActivitySummary {
    pub fn count(&self) -> usize {
        self.workouts.len()
    }
}

/// Workouts over the last seven days, newest first, each joined with the
/// active energy recorded over its own interval.
pub async fn weekly_activity(store: &dyn HealthStore) -> Result<ActivitySummary> {
    let range = DateRange::last_days(ACTIVITY_WINDOW_DAYS);
    let mut workouts = store.workouts_in_range(&range).await?;
    workouts.sort_by(|a, b| b.start.cmp(&a.start));

    let mut summary = ActivitySummary::default();
    for workout in workouts {
        let interval = DateRange::new(workout.start, workout.end);
        let energy_kcal = store
            .sum_in_range(MetricKind::ActiveEnergy, &interval)
            .await?;
        let duration_minutes = workout.duration_minutes();

        summary.total_minutes += duration_minutes;
        summary.total_kcal += energy_kcal;
        summary.workouts.push(WorkoutSummary {
            workout,
            duration_minutes,
            energy_kcal,
        });
    }

    Ok(summary)
}

/// Body mass samples over the window, oldest first
pub async fn weight_series(store: &dyn HealthStore, days: u64) -> Result<Vec<QuantitySample>> {
    let range = DateRange::last_days(days);
    store
        .samples_in_range(MetricKind::BodyMass, &range, SampleSort::Ascending)
        .await
}

/// Water intake bucketed per local calendar day over the window, oldest
/// first. Days without samples appear with a zero total.
pub async fn water_series(store: &dyn HealthStore, days: u64) -> Result<Vec<DailyTotal>> {
    let range = DateRange::last_days(days);
    let samples = store
        .samples_in_range(MetricKind::DietaryWater, &range, SampleSort::Ascending)
        .await?;

    let mut totals: HashMap<NaiveDate, f64> = HashMap::new();
    for sample in &samples {
        let day = sample.start.with_timezone(&Local).date_naive();
        *totals.entry(day).or_insert(0.0) += sample.value;
    }

    Ok(range
        .days()
        .into_iter()
        .map(|day| DailyTotal {
            day,
            total: totals.get(&day).copied().unwrap_or(0.0),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use metrika_types::WorkoutKind;

    #[test]
    fn test_hydration_progress() {
        let halfway = HydrationSummary {
            today_liters: 1.0,
            goal_liters: 2.0,
        };
        assert!((halfway.progress() - 0.5).abs() < 1e-9);
        assert!((halfway.remaining_liters() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_hydration_progress_clamped_at_goal() {
        let over = HydrationSummary {
            today_liters: 2.6,
            goal_liters: 2.0,
        };
        assert!((over.progress() - 1.0).abs() < 1e-9);
        assert_eq!(over.remaining_liters(), 0.0);
    }

    #[test]
    fn test_hydration_progress_with_zero_goal() {
        let broken = HydrationSummary {
            today_liters: 1.0,
            goal_liters: 0.0,
        };
        assert_eq!(broken.progress(), 0.0);
    }

    #[test]
    fn test_weight_reading_uses_sample_end() {
        let start = Utc::now();
        let sample = QuantitySample::new(MetricKind::BodyMass, 72.5, start, start);
        let reading = WeightReading::from(sample);
        assert_eq!(reading.kilograms, 72.5);
        assert_eq!(reading.recorded_at, start);
    }

    #[test]
    fn test_activity_summary_count() {
        let start = Utc::now();
        let workout = Workout::new(WorkoutKind::Running, start, start + Duration::minutes(30));
        let summary = ActivitySummary {
            total_minutes: workout.duration_minutes(),
            total_kcal: 250.0,
            workouts: vec![WorkoutSummary {
                duration_minutes: workout.duration_minutes(),
                energy_kcal: 250.0,
                workout,
            }],
        };
        assert_eq!(summary.count(), 1);
    }
}
