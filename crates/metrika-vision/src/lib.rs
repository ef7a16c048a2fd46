//! Vision module - text recognition over scale photos and weight extraction

pub mod cache;
pub mod exif;
pub mod extractor;
pub mod recognizer;

// Re-export main types for convenience
pub use cache::{CacheStats, RecognitionCache};
pub use exif::capture_time;
pub use extractor::extract_weight;
pub use recognizer::{
    CommandRecognizer, MockRecognizer, RecognizedLine, SidecarRecognizer, TextRecognizer,
};
