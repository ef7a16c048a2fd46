//! Scan service - weight capture from a photographed scale display
//!
//! Workflow:
//! 1. Validate the image file
//! 2. Serve recognized lines from the recognition cache when possible
//! 3. Otherwise run the recognizer under a deadline and cache the lines
//! 4. Extract a weight candidate from the lines
//! 5. Read the capture time from the image's EXIF block
//!
//! An image with no extractable weight is a normal outcome, not an error;
//! the candidate comes back absent and the caller reports it.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use metrika_types::Result;
use metrika_vision::{
    capture_time, extract_weight, RecognitionCache, RecognizedLine, TextRecognizer,
};

use crate::deadline::with_deadline;
use crate::scanner::validate_image;

/// What one scan produced
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Extracted weight token, comma already normalized to a period
    pub candidate: Option<String>,

    /// Raw recognized lines, for verbose display
    pub lines: Vec<RecognizedLine>,

    /// Whether the lines came from the recognition cache
    pub from_cache: bool,

    /// EXIF capture time, when the image carries one
    pub captured_at: Option<DateTime<Utc>>,
}

pub struct ScanService {
    recognizer: Box<dyn TextRecognizer>,
    cache: Option<RecognitionCache>,
    token: CancellationToken,
    timeout: Duration,
}

impl ScanService {
    pub fn new(
        recognizer: Box<dyn TextRecognizer>,
        cache: Option<RecognitionCache>,
        token: CancellationToken,
        timeout: Duration,
    ) -> Self {
        Self {
            recognizer,
            cache,
            token,
            timeout,
        }
    }

    pub async fn scan(&self, image_path: &Path) -> Result<ScanOutcome> {
        // Step 1: validate input
        validate_image(image_path)?;

        // Step 2: check the recognition cache; a failed read is a miss
        let cached = match &self.cache {
            Some(cache) => match cache.get(image_path) {
                Ok(lines) => lines,
                Err(e) => {
                    warn!("recognition cache read failed: {}", e);
                    None
                }
            },
            None => None,
        };

        let (lines, from_cache) = match cached {
            Some(lines) => (lines, true),
            None => {
                // Step 3: recognize under the deadline
                let lines = with_deadline(
                    &self.token,
                    self.timeout,
                    self.recognizer.recognize(image_path),
                )
                .await?;

                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.set(image_path, &lines) {
                        warn!("recognition cache write failed: {}", e);
                    }
                }
                (lines, false)
            }
        };

        // Step 4: extract the weight candidate
        let candidate = extract_weight(&lines);

        // Step 5: date the reading to the capture time when available
        let captured_at = capture_time(image_path);

        Ok(ScanOutcome {
            candidate,
            lines,
            from_cache,
            captured_at,
        })
    }
}
