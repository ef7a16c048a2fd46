//! Domain services

pub mod summary;

pub use summary::{
    water_series, weekly_activity, weight_series, ActivitySummary, DashboardSummary,
    HydrationSummary, WeightReading, WorkoutSummary, ACTIVITY_WINDOW_DAYS, SERIES_WINDOW_DAYS,
};
