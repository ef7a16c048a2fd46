//! Data model for samples, workouts and query windows

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantity categories understood by the health store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    BodyMass,
    DietaryWater,
    ActiveEnergy,
    ExerciseTime,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::BodyMass,
        MetricKind::DietaryWater,
        MetricKind::ActiveEnergy,
        MetricKind::ExerciseTime,
    ];

    /// Fixed unit a value of this kind is recorded in
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::BodyMass => "kg",
            MetricKind::DietaryWater => "L",
            MetricKind::ActiveEnergy => "kcal",
            MetricKind::ExerciseTime => "min",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::BodyMass => "weight",
            MetricKind::DietaryWater => "water",
            MetricKind::ActiveEnergy => "active energy",
            MetricKind::ExerciseTime => "exercise",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sort order for sample queries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SampleSort {
    /// Oldest first by start time
    Ascending,
    /// Newest first by start time
    Descending,
    /// Store insertion order
    #[default]
    Unsorted,
}

/// One recorded measurement.
///
/// Instantaneous readings (a weigh-in, a drink) carry the same start and
/// end timestamp; interval readings span the interval they cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySample {
    pub id: Uuid,
    pub kind: MetricKind,
    pub value: f64,
    pub unit: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QuantitySample {
    pub fn new(kind: MetricKind, value: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            value,
            unit: kind.unit().to_string(),
            start,
            end,
        }
    }

    /// Sample recorded at a single instant
    pub fn instant(kind: MetricKind, value: f64, at: DateTime<Utc>) -> Self {
        Self::new(kind, value, at, at)
    }
}

/// Workout categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    Running,
    Walking,
    Cycling,
    Strength,
    Hiit,
    Swimming,
    Yoga,
    Other,
}

impl WorkoutKind {
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Walking => "Walking",
            WorkoutKind::Cycling => "Cycling",
            WorkoutKind::Strength => "Strength",
            WorkoutKind::Hiit => "HIIT",
            WorkoutKind::Swimming => "Swimming",
            WorkoutKind::Yoga => "Yoga",
            WorkoutKind::Other => "Other",
        }
    }
}

impl std::fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One workout record. Duration and burned energy are derived, not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub kind: WorkoutKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Workout {
    pub fn new(kind: WorkoutKind, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            start,
            end,
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 60.0
    }
}

/// Summed value of one category for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub total: f64,
}

/// Half-open query window `[start, end)` over UTC instants.
///
/// Day-based constructors anchor on the local calendar day, matching what
/// a user means by "today" or "the last 30 days".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Start of the current local day to now
    pub fn today() -> Self {
        Self {
            start: day_start(Local::now().date_naive()),
            end: Utc::now(),
        }
    }

    /// Start of the local day `days - 1` days back to now, so the window
    /// covers `days` calendar days including today
    pub fn last_days(days: u64) -> Self {
        let today = Local::now().date_naive();
        let first = today
            .checked_sub_days(Days::new(days.saturating_sub(1)))
            .unwrap_or(today);
        Self {
            start: day_start(first),
            end: Utc::now(),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Local calendar days the window touches, oldest first
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut day = self.start.with_timezone(&Local).date_naive();
        let last = self.end.with_timezone(&Local).date_naive();
        while day <= last {
            days.push(day);
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        days
    }
}

/// Midnight of a local calendar day as a UTC instant. Falls back to UTC
/// midnight when local midnight does not exist (DST transition).
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_metric_kind_units() {
        assert_eq!(MetricKind::BodyMass.unit(), "kg");
        assert_eq!(MetricKind::DietaryWater.unit(), "L");
        assert_eq!(MetricKind::ActiveEnergy.unit(), "kcal");
        assert_eq!(MetricKind::ExerciseTime.unit(), "min");
    }

    #[test]
    fn test_instant_sample_has_equal_bounds() {
        let at = Utc::now();
        let sample = QuantitySample::instant(MetricKind::BodyMass, 72.5, at);
        assert_eq!(sample.start, sample.end);
        assert_eq!(sample.unit, "kg");
        assert_eq!(sample.value, 72.5);
    }

    #[test]
    fn test_workout_duration_minutes() {
        let start = Utc::now();
        let workout = Workout::new(WorkoutKind::Running, start, start + Duration::minutes(45));
        assert!((workout.duration_minutes() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_range_is_half_open() {
        let start = Utc::now();
        let end = start + Duration::hours(1);
        let range = DateRange::new(start, end);
        assert!(range.contains(start));
        assert!(range.contains(end - Duration::seconds(1)));
        assert!(!range.contains(end));
        assert!(!range.contains(start - Duration::seconds(1)));
    }

    #[test]
    fn test_today_contains_now() {
        let range = DateRange::today();
        assert!(range.start <= range.end);
        assert!(range.contains(range.end - Duration::milliseconds(1)));
    }

    #[test]
    fn test_last_days_covers_requested_days() {
        let range = DateRange::last_days(7);
        assert_eq!(range.days().len(), 7);

        let single = DateRange::last_days(1);
        assert_eq!(single.days().len(), 1);
    }

    #[test]
    fn test_last_days_zero_still_covers_today() {
        let range = DateRange::last_days(0);
        assert_eq!(range.days().len(), 1);
    }
}
