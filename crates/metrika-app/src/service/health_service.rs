//! Health service - cached reads and guarded writes over the health store
//!
//! Every read of a dashboard-style value goes through the metric cache:
//! 1. Check the cache for the category
//! 2. On a miss, query the store under a deadline
//! 3. Cache what came back
//!
//! Every successful write invalidates and re-reads the written category, so
//! the next read never shows a stale value. A failed write leaves the cache
//! untouched. Store failure detail stays in the log; callers see a short
//! message naming the category.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use metrika_domain::service::{
    self, ActivitySummary, DashboardSummary, HydrationSummary, WeightReading,
};
use metrika_domain::HealthStore;
use metrika_types::{
    DailyTotal, DateRange, Error, MetricKind, QuantitySample, Result, SampleSort, StoreError,
    Workout, WorkoutKind,
};

use crate::cache::{MetricCache, MetricValue};
use crate::config::Config;
use crate::deadline::with_deadline;

/// Quick-add volume of one cup of water
pub const CUP_LITERS: f64 = 0.25;

/// Quick-add volume of one bottle of water
pub const BOTTLE_LITERS: f64 = 0.75;

pub struct HealthService {
    store: Arc<dyn HealthStore>,
    cache: MetricCache,
    token: CancellationToken,
    timeout: Duration,
    water_goal_liters: f64,
}

impl HealthService {
    pub fn new(store: Arc<dyn HealthStore>, config: &Config, token: CancellationToken) -> Self {
        Self {
            store,
            cache: MetricCache::new(),
            token,
            timeout: config.timeout(),
            water_goal_liters: config.water_goal_liters,
        }
    }

    /// Fail fast when the store is missing on this host or access to the
    /// given categories was denied
    pub async fn ensure_access(&self, kinds: &[MetricKind]) -> Result<()> {
        if !self.store.is_available() {
            return Err(StoreError::Unavailable.into());
        }

        let granted = with_deadline(
            &self.token,
            self.timeout,
            self.store.request_authorization(kinds),
        )
        .await?;

        if !granted {
            let labels: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
            return Err(StoreError::AuthorizationDenied(labels.join(", ")).into());
        }

        Ok(())
    }

    /// Most recent weight reading, served from the cache when warm
    pub async fn latest_weight(&self) -> Result<Option<WeightReading>> {
        if let Some(MetricValue::Latest(sample)) = self.cache.get(MetricKind::BodyMass).await {
            debug!("metric cache hit: {}", MetricKind::BodyMass);
            return Ok(sample.map(WeightReading::from));
        }

        let sample = with_deadline(
            &self.token,
            self.timeout,
            self.store.latest_sample(MetricKind::BodyMass),
        )
        .await?;
        self.cache
            .put(MetricKind::BodyMass, MetricValue::Latest(sample.clone()))
            .await;
        Ok(sample.map(WeightReading::from))
    }

    /// Today's cumulative sum for a category, served from the cache when
    /// warm. Zero is a valid total, not an error.
    pub async fn today_sum(&self, kind: MetricKind) -> Result<f64> {
        if let Some(MetricValue::TodaySum(total)) = self.cache.get(kind).await {
            debug!("metric cache hit: {}", kind);
            return Ok(total);
        }

        let total = with_deadline(
            &self.token,
            self.timeout,
            self.store.sum_in_range(kind, &DateRange::today()),
        )
        .await?;
        self.cache.put(kind, MetricValue::TodaySum(total)).await;
        Ok(total)
    }

    /// Drop and re-read one category. Called after every successful write;
    /// a failed re-read only logs, leaving the entry cold so the next read
    /// goes back to the store.
    pub async fn refresh(&self, kind: MetricKind) {
        self.cache.invalidate(kind).await;

        let outcome = match kind {
            MetricKind::BodyMass => self.latest_weight().await.map(|_| ()),
            _ => self.today_sum(kind).await.map(|_| ()),
        };
        if let Err(e) = outcome {
            warn!("re-read of {} after write failed: {}", kind, e);
        }
    }

    /// Everything the dashboard card shows, in one call.
    ///
    /// Individual read failures degrade to empty values with a warning so
    /// one bad category does not blank the whole card; cancellation still
    /// aborts.
    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        let latest_weight = self.degrade(self.latest_weight().await, "weight", None)?;
        let today_liters =
            self.degrade(self.today_sum(MetricKind::DietaryWater).await, "water", 0.0)?;
        let exercise_minutes = self.degrade(
            self.today_sum(MetricKind::ExerciseTime).await,
            "exercise",
            0.0,
        )?;
        let active_energy_kcal = self.degrade(
            self.today_sum(MetricKind::ActiveEnergy).await,
            "active energy",
            0.0,
        )?;

        Ok(DashboardSummary {
            latest_weight,
            water: HydrationSummary {
                today_liters,
                goal_liters: self.water_goal_liters,
            },
            exercise_minutes,
            active_energy_kcal,
        })
    }

    /// Today's water intake against the configured goal
    pub async fn hydration(&self) -> Result<HydrationSummary> {
        let today_liters = self.today_sum(MetricKind::DietaryWater).await?;
        Ok(HydrationSummary {
            today_liters,
            goal_liters: self.water_goal_liters,
        })
    }

    /// Record a weigh-in dated now
    pub async fn add_weight(&self, kilograms: f64) -> Result<QuantitySample> {
        self.add_weight_at(kilograms, Utc::now()).await
    }

    /// Record a weigh-in at a given instant (EXIF capture time for scans)
    pub async fn add_weight_at(
        &self,
        kilograms: f64,
        at: DateTime<Utc>,
    ) -> Result<QuantitySample> {
        self.save_quantity(MetricKind::BodyMass, kilograms, at, at)
            .await
    }

    /// Record water intake in liters, dated now
    pub async fn add_water(&self, liters: f64) -> Result<QuantitySample> {
        let now = Utc::now();
        self.save_quantity(MetricKind::DietaryWater, liters, now, now)
            .await
    }

    /// Record a workout of the given length ending now
    pub async fn add_workout(&self, kind: WorkoutKind, minutes: f64) -> Result<Workout> {
        let end = Utc::now();
        let start = end - chrono::Duration::milliseconds((minutes * 60_000.0).round() as i64);

        let saved = with_deadline(
            &self.token,
            self.timeout,
            self.store.save_workout(kind, start, end),
        )
        .await;

        match saved {
            Ok(workout) => Ok(workout),
            Err(e @ (Error::Cancelled | Error::Timeout(_))) => Err(e),
            Err(e) => {
                warn!("saving workout failed: {}", e);
                Err(StoreError::WriteFailed("workout".to_string()).into())
            }
        }
    }

    /// Workouts over the last seven days with derived minutes and energy
    pub async fn weekly_activity(&self) -> Result<ActivitySummary> {
        with_deadline(
            &self.token,
            self.timeout,
            service::weekly_activity(self.store.as_ref()),
        )
        .await
    }

    /// Body-mass samples over the window, oldest first
    pub async fn weight_series(&self, days: u64) -> Result<Vec<QuantitySample>> {
        with_deadline(
            &self.token,
            self.timeout,
            service::weight_series(self.store.as_ref(), days),
        )
        .await
    }

    /// Per-day water totals over the window, zero-filled, oldest first
    pub async fn water_series(&self, days: u64) -> Result<Vec<DailyTotal>> {
        with_deadline(
            &self.token,
            self.timeout,
            service::water_series(self.store.as_ref(), days),
        )
        .await
    }

    /// Raw samples of one category over a window, newest first
    pub async fn history(&self, kind: MetricKind, days: u64) -> Result<Vec<QuantitySample>> {
        let range = DateRange::last_days(days);
        with_deadline(
            &self.token,
            self.timeout,
            self.store
                .samples_in_range(kind, &range, SampleSort::Descending),
        )
        .await
    }

    /// Write one sample under the deadline, then refresh its category.
    async fn save_quantity(
        &self,
        kind: MetricKind,
        value: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<QuantitySample> {
        let saved = with_deadline(
            &self.token,
            self.timeout,
            self.store.save_sample(kind, value, start, end),
        )
        .await;

        match saved {
            Ok(sample) => {
                self.refresh(kind).await;
                Ok(sample)
            }
            Err(e @ (Error::Cancelled | Error::Timeout(_))) => Err(e),
            Err(e) => {
                warn!("saving {} failed: {}", kind, e);
                Err(StoreError::WriteFailed(kind.label().to_string()).into())
            }
        }
    }

    /// Map a degraded read to its empty value, letting cancellation through
    fn degrade<T>(&self, outcome: Result<T>, what: &str, empty: T) -> Result<T> {
        match outcome {
            Ok(value) => Ok(value),
            Err(Error::Cancelled) => Err(Error::Cancelled),
            Err(e) => {
                warn!("{} read degraded to empty: {}", what, e);
                Ok(empty)
            }
        }
    }
}
