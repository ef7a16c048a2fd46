//! In-memory health store
//!
//! Backs tests and hosts without persistent storage. The constructors can
//! flip the failure modes a real platform store exhibits: not present,
//! authorization denied, writes failing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use metrika_domain::HealthStore;
use metrika_types::{
    DateRange, MetricKind, QuantitySample, Result, SampleSort, StoreError, Workout, WorkoutKind,
};

pub struct MemoryHealthStore {
    samples: RwLock<Vec<QuantitySample>>,
    workouts: RwLock<Vec<Workout>>,
    available: bool,
    grant: bool,
    fail_writes: bool,
}

impl MemoryHealthStore {
    pub fn new() -> Self {
        Self {
            samples: RwLock::new(Vec::new()),
            workouts: RwLock::new(Vec::new()),
            available: true,
            grant: true,
            fail_writes: false,
        }
    }

    /// Store that reports no backend on this host
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Store that denies every authorization request
    pub fn denying() -> Self {
        Self {
            grant: false,
            ..Self::new()
        }
    }

    /// Store whose writes fail after authorization succeeds
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }
}

impl Default for MemoryHealthStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthStore for MemoryHealthStore {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_authorization(&self, _kinds: &[MetricKind]) -> Result<bool> {
        Ok(self.grant)
    }

    async fn latest_sample(&self, kind: MetricKind) -> Result<Option<QuantitySample>> {
        let samples = self.samples.read().await;
        Ok(samples
            .iter()
            .filter(|s| s.kind == kind)
            .max_by_key(|s| s.end)
            .cloned())
    }

    async fn sum_in_range(&self, kind: MetricKind, range: &DateRange) -> Result<f64> {
        let samples = self.samples.read().await;
        Ok(samples
            .iter()
            .filter(|s| s.kind == kind && range.contains(s.start))
            .map(|s| s.value)
            .sum())
    }

    async fn samples_in_range(
        &self,
        kind: MetricKind,
        range: &DateRange,
        sort: SampleSort,
    ) -> Result<Vec<QuantitySample>> {
        let samples = self.samples.read().await;
        let mut found: Vec<QuantitySample> = samples
            .iter()
            .filter(|s| s.kind == kind && range.contains(s.start))
            .cloned()
            .collect();

        match sort {
            SampleSort::Ascending => found.sort_by(|a, b| a.start.cmp(&b.start)),
            SampleSort::Descending => found.sort_by(|a, b| b.start.cmp(&a.start)),
            SampleSort::Unsorted => {}
        }

        Ok(found)
    }

    async fn save_sample(
        &self,
        kind: MetricKind,
        value: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<QuantitySample> {
        if self.fail_writes {
            return Err(StoreError::IoError("simulated disk failure".to_string()).into());
        }
        let sample = QuantitySample::new(kind, value, start, end);
        self.samples.write().await.push(sample.clone());
        Ok(sample)
    }

    async fn workouts_in_range(&self, range: &DateRange) -> Result<Vec<Workout>> {
        let workouts = self.workouts.read().await;
        let mut found: Vec<Workout> = workouts
            .iter()
            .filter(|w| range.contains(w.start))
            .cloned()
            .collect();

        found.sort_by(|a, b| a.start.cmp(&b.start));
        Ok(found)
    }

    async fn save_workout(
        &self,
        kind: WorkoutKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Workout> {
        if self.fail_writes {
            return Err(StoreError::IoError("simulated disk failure".to_string()).into());
        }
        let workout = Workout::new(kind, start, end);
        self.workouts.write().await.push(workout.clone());
        Ok(workout)
    }
}
