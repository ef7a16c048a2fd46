//! Service orchestration over the store and recognizer boundaries

pub mod health_service;
pub mod scan_service;

pub use health_service::{HealthService, BOTTLE_LITERS, CUP_LITERS};
pub use scan_service::{ScanOutcome, ScanService};
