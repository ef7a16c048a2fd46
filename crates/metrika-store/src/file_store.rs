//! File-backed health store
//!
//! All samples and workouts live in one `health.json` under the data
//! directory. The file is read once on open and rewritten whole on every
//! save; volumes are small enough (a few entries per day) that this stays
//! cheap for years of data.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use metrika_domain::HealthStore;
use metrika_types::{
    DateRange, MetricKind, QuantitySample, Result, SampleSort, Workout, WorkoutKind,
};

/// Everything the store persists
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    samples: Vec<QuantitySample>,

    #[serde(default)]
    workouts: Vec<Workout>,

    /// Categories authorization was requested for
    #[serde(default)]
    granted: HashSet<MetricKind>,
}

/// JSON-file store, the production backend
pub struct FileHealthStore {
    store_path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileHealthStore {
    /// Create or load a store under the given data directory.
    ///
    /// An unreadable or unparseable file starts the store empty rather
    /// than failing; the next save rewrites it.
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        let store_path = data_dir.join("health.json");

        let state = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_default()
        } else {
            StoreState::default()
        };

        Ok(Self {
            store_path,
            state: RwLock::new(state),
        })
    }

    /// Write the full state to disk. Writes a sibling temp file first so a
    /// failed write never truncates the existing store.
    async fn persist(&self, state: &StoreState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        let tmp_path = self.store_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.store_path).await?;
        Ok(())
    }
}

#[async_trait]
impl HealthStore for FileHealthStore {
    fn is_available(&self) -> bool {
        true
    }

    /// The file backend has no permission system, so requests always
    /// succeed; the requested categories are recorded for `status`.
    async fn request_authorization(&self, kinds: &[MetricKind]) -> Result<bool> {
        let mut state = self.state.write().await;
        for kind in kinds {
            state.granted.insert(*kind);
        }
        self.persist(&state).await?;
        Ok(true)
    }

    async fn latest_sample(&self, kind: MetricKind) -> Result<Option<QuantitySample>> {
        let state = self.state.read().await;
        Ok(state
            .samples
            .iter()
            .filter(|s| s.kind == kind)
            .max_by_key(|s| s.end)
            .cloned())
    }

    async fn sum_in_range(&self, kind: MetricKind, range: &DateRange) -> Result<f64> {
        let state = self.state.read().await;
        Ok(state
            .samples
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
        let state = self.state.read().await;
        let mut samples: Vec<QuantitySample> = state
            .samples
            .iter()
            .filter(|s| s.kind == kind && range.contains(s.start))
            .cloned()
            .collect();

        match sort {
            SampleSort::Ascending => samples.sort_by(|a, b| a.start.cmp(&b.start)),
            SampleSort::Descending => samples.sort_by(|a, b| b.start.cmp(&a.start)),
            SampleSort::Unsorted => {}
        }

        Ok(samples)
    }

    async fn save_sample(
        &self,
        kind: MetricKind,
        value: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<QuantitySample> {
        let mut state = self.state.write().await;
        let sample = QuantitySample::new(kind, value, start, end);
        state.samples.push(sample.clone());
        self.persist(&state).await?;
        Ok(sample)
    }

    async fn workouts_in_range(&self, range: &DateRange) -> Result<Vec<Workout>> {
        let state = self.state.read().await;
        let mut workouts: Vec<Workout> = state
            .workouts
            .iter()
            .filter(|w| range.contains(w.start))
            .cloned()
            .collect();

        workouts.sort_by(|a, b| a.start.cmp(&b.start));
        Ok(workouts)
    }

    async fn save_workout(
        &self,
        kind: WorkoutKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Workout> {
        let mut state = self.state.write().await;
        let workout = Workout::new(kind, start, end);
        state.workouts.push(workout.clone());
        self.persist(&state).await?;
        Ok(workout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn open_in(dir: &tempfile::TempDir) -> FileHealthStore {
        FileHealthStore::open(dir.path().to_path_buf()).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_reopen_keeps_samples() {
        let dir = tempfile::tempdir().unwrap();
        let at = Utc::now();
        {
            let store = open_in(&dir);
            store
                .save_sample(MetricKind::BodyMass, 72.5, at, at)
                .await
                .unwrap();
        }

        let reopened = open_in(&dir);
        let latest = reopened
            .latest_sample(MetricKind::BodyMass)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.value, 72.5);
        assert_eq!(latest.unit, "kg");
        assert_eq!(latest.start, at);
    }

    #[tokio::test]
    async fn test_latest_sample_picks_newest_end() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        let now = Utc::now();

        let old = now - Duration::days(2);
        store
            .save_sample(MetricKind::BodyMass, 74.0, old, old)
            .await
            .unwrap();
        store
            .save_sample(MetricKind::BodyMass, 72.5, now, now)
            .await
            .unwrap();

        let latest = store
            .latest_sample(MetricKind::BodyMass)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.value, 72.5);
    }

    #[tokio::test]
    async fn test_latest_sample_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        let latest = store.latest_sample(MetricKind::BodyMass).await.unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn test_sum_filters_kind_and_window() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        let now = Utc::now();

        store
            .save_sample(MetricKind::DietaryWater, 0.25, now, now)
            .await
            .unwrap();
        store
            .save_sample(MetricKind::DietaryWater, 0.75, now, now)
            .await
            .unwrap();
        // Different kind, must not count
        store
            .save_sample(MetricKind::BodyMass, 72.5, now, now)
            .await
            .unwrap();
        // Outside the window, must not count
        let last_week = now - Duration::days(7);
        store
            .save_sample(MetricKind::DietaryWater, 9.0, last_week, last_week)
            .await
            .unwrap();

        let range = DateRange::today();
        let total = store
            .sum_in_range(MetricKind::DietaryWater, &range)
            .await
            .unwrap();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sum_of_empty_window_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        let total = store
            .sum_in_range(MetricKind::ActiveEnergy, &DateRange::today())
            .await
            .unwrap();
        assert_eq!(total, 0.0);
    }

    #[tokio::test]
    async fn test_samples_sorted_by_start() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        let now = Utc::now();
        let earlier = now - Duration::hours(3);

        store
            .save_sample(MetricKind::BodyMass, 73.0, now, now)
            .await
            .unwrap();
        store
            .save_sample(MetricKind::BodyMass, 74.0, earlier, earlier)
            .await
            .unwrap();

        // Two days so the earlier sample stays in range near midnight
        let range = DateRange::last_days(2);
        let ascending = store
            .samples_in_range(MetricKind::BodyMass, &range, SampleSort::Ascending)
            .await
            .unwrap();
        assert_eq!(ascending.len(), 2);
        assert!(ascending[0].start <= ascending[1].start);

        let descending = store
            .samples_in_range(MetricKind::BodyMass, &range, SampleSort::Descending)
            .await
            .unwrap();
        assert!(descending[0].start >= descending[1].start);
    }

    #[tokio::test]
    async fn test_workouts_come_back_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        let now = Utc::now();

        store
            .save_workout(WorkoutKind::Running, now - Duration::hours(1), now)
            .await
            .unwrap();
        store
            .save_workout(
                WorkoutKind::Yoga,
                now - Duration::hours(5),
                now - Duration::hours(4),
            )
            .await
            .unwrap();

        let workouts = store
            .workouts_in_range(&DateRange::last_days(2))
            .await
            .unwrap();
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].kind, WorkoutKind::Yoga);
        assert_eq!(workouts[1].kind, WorkoutKind::Running);
    }

    #[tokio::test]
    async fn test_corrupted_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("health.json"), "not json at all").unwrap();

        let store = open_in(&dir);
        let latest = store.latest_sample(MetricKind::BodyMass).await.unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn test_authorization_always_granted() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        let granted = store
            .request_authorization(&MetricKind::ALL)
            .await
            .unwrap();
        assert!(granted);
    }
}
