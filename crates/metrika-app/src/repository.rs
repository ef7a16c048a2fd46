//! Wiring from configuration to concrete backends

use metrika_store::FileHealthStore;
use metrika_types::Result;
use metrika_vision::{CommandRecognizer, RecognitionCache, SidecarRecognizer, TextRecognizer};

use crate::config::Config;

/// Open the file-backed health store at the configured data directory
pub fn open_health_store(config: &Config) -> Result<FileHealthStore> {
    let data_dir = config.data_dir()?;
    FileHealthStore::open(data_dir)
}

/// Build the configured text recognizer. Falls back to sidecar
/// transcripts when no command is configured.
pub fn build_recognizer(config: &Config) -> Box<dyn TextRecognizer> {
    match config.recognizer_command.as_deref() {
        Some(command) if !command.trim().is_empty() => Box::new(CommandRecognizer::new(command)),
        _ => Box::new(SidecarRecognizer),
    }
}

/// Open the recognition cache, or `None` when caching is disabled
pub fn open_recognition_cache(config: &Config) -> Result<Option<RecognitionCache>> {
    if !config.cache_enabled {
        return Ok(None);
    }

    let cache_dir = config.cache_dir()?;
    Ok(Some(RecognitionCache::new(cache_dir)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrika_domain::HealthStore;

    #[test]
    fn test_open_health_store_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: Some(dir.path().join("data")),
            ..Config::default()
        };

        let store = open_health_store(&config).unwrap();
        assert!(store.is_available());
        assert!(dir.path().join("data").exists());
    }

    #[test]
    fn test_recognition_cache_respects_disabled_flag() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            cache_enabled: false,
            cache_dir: Some(dir.path().join("cache")),
            ..Config::default()
        };
        assert!(open_recognition_cache(&config).unwrap().is_none());

        let enabled = Config {
            cache_enabled: true,
            cache_dir: Some(dir.path().join("cache")),
            ..Config::default()
        };
        assert!(open_recognition_cache(&enabled).unwrap().is_some());
    }
}
