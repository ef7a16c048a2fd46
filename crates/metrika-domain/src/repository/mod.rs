//! Repository trait for the platform health-data store

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use metrika_types::{
    DateRange, MetricKind, QuantitySample, Result, SampleSort, Workout, WorkoutKind,
};

/// Capability set assumed from the environment's health-data store.
///
/// Every call is single-shot and async; there is no pagination and no
/// streaming. Implementations live in the store crate.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Whether a store backend exists on this host
    fn is_available(&self) -> bool;

    /// Request read/write authorization for the given categories.
    /// `false` means the request was denied.
    async fn request_authorization(&self, kinds: &[MetricKind]) -> Result<bool>;

    /// Most recent sample of a category, if any
    async fn latest_sample(&self, kind: MetricKind) -> Result<Option<QuantitySample>>;

    /// Cumulative sum of a category over a window. An empty window sums
    /// to zero.
    async fn sum_in_range(&self, kind: MetricKind, range: &DateRange) -> Result<f64>;

    /// All samples of a category in a window
    async fn samples_in_range(
        &self,
        kind: MetricKind,
        range: &DateRange,
        sort: SampleSort,
    ) -> Result<Vec<QuantitySample>>;

    /// Save one new sample
    async fn save_sample(
        &self,
        kind: MetricKind,
        value: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<QuantitySample>;

    /// Workout records in a window, oldest first
    async fn workouts_in_range(&self, range: &DateRange) -> Result<Vec<Workout>>;

    /// Record one workout
    async fn save_workout(
        &self,
        kind: WorkoutKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Workout>;
}
