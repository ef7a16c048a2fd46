//! Disk cache for recognition results
//!
//! Entries are keyed by the SHA-256 of the image bytes, so a re-scan of an
//! unchanged photo skips the recognizer. Content addressing also makes the
//! cache safe to clear at any time.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use metrika_types::Result;

use crate::recognizer::RecognizedLine;

/// Cache manager for recognized text lines
pub struct RecognitionCache {
    cache_dir: PathBuf,
}

impl RecognitionCache {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// Streaming hash of the image bytes
    fn cache_key(image_path: &Path) -> Result<String> {
        let file = File::open(image_path)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Cached lines for an image. An unreadable entry counts as a miss.
    pub fn get(&self, image_path: &Path) -> Result<Option<Vec<RecognizedLine>>> {
        let key = Self::cache_key(image_path)?;
        let entry_path = self.entry_path(&key);

        if !entry_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&entry_path)?;
        Ok(serde_json::from_str(&content).ok())
    }

    pub fn set(&self, image_path: &Path, lines: &[RecognizedLine]) -> Result<()> {
        let key = Self::cache_key(image_path)?;
        let content = serde_json::to_string(lines)?;
        fs::write(self.entry_path(&key), content)?;
        Ok(())
    }

    /// Remove every cached entry, returning how many were deleted
    pub fn clear(&self) -> Result<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                fs::remove_file(&path)?;
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let mut entry_count = 0;
        let mut total_size_bytes = 0u64;

        for entry in fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            if entry.path().extension().is_some_and(|e| e == "json") {
                entry_count += 1;
                if let Ok(metadata) = entry.metadata() {
                    total_size_bytes += metadata.len();
                }
            }
        }

        Ok(CacheStats {
            entry_count,
            total_size_bytes,
            cache_dir: self.cache_dir.clone(),
        })
    }
}

/// Recognition cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_size_bytes: u64,
    pub cache_dir: PathBuf,
}

impl CacheStats {
    pub fn display(&self) -> String {
        format!(
            "Recognition Cache\n\
             =================\n\
             Entries:    {}\n\
             Total size: {:.2} KB\n\
             Location:   {}",
            self.entry_count,
            self.total_size_bytes as f64 / 1024.0,
            self.cache_dir.display()
        )
    }
}
