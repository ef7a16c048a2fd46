//! Text recognizer implementations
//!
//! A recognizer turns a still image into an ordered sequence of recognized
//! text lines, best candidate per detected region, top to bottom.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use metrika_types::{Error, Result, VisionError};

/// One candidate line of text detected in an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedLine {
    pub text: String,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl AsRef<str> for RecognizedLine {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Boundary to an external text recognition service
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize text lines in an image, in recognition order
    async fn recognize(&self, image_path: &Path) -> Result<Vec<RecognizedLine>>;
}

/// Runs a configured external command and reads one recognized line per
/// stdout line. The image path is appended as the final argument.
pub struct CommandRecognizer {
    command: String,
}

impl CommandRecognizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl TextRecognizer for CommandRecognizer {
    async fn recognize(&self, image_path: &Path) -> Result<Vec<RecognizedLine>> {
        if self.command.trim().is_empty() {
            return Err(VisionError::NotConfigured.into());
        }

        let mut parts = shell_words::split(&self.command)
            .map_err(|e| VisionError::InvalidCommand(e.to_string()))?;
        if parts.is_empty() {
            return Err(VisionError::InvalidCommand(self.command.clone()).into());
        }

        let program = parts.remove(0);
        let output = Command::new(&program)
            .args(&parts)
            .arg(image_path)
            .output()
            .await
            .map_err(|e| VisionError::RecognitionFailed(format!("{}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VisionError::RecognitionFailed(stderr.trim().to_string()).into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_lines(&stdout))
    }
}

/// Reads recognized lines from a sidecar transcript next to the image
/// (same file stem, `.txt` extension). Lets a prepared transcription stand
/// in for a live recognizer.
pub struct SidecarRecognizer;

#[async_trait]
impl TextRecognizer for SidecarRecognizer {
    async fn recognize(&self, image_path: &Path) -> Result<Vec<RecognizedLine>> {
        let sidecar = image_path.with_extension("txt");
        if !sidecar.exists() {
            return Err(Error::FileNotFound(sidecar.display().to_string()));
        }

        let content = tokio::fs::read_to_string(&sidecar).await?;
        Ok(parse_lines(&content))
    }
}

/// Fixed-response recognizer for tests
pub struct MockRecognizer {
    lines: Vec<RecognizedLine>,
    fail: bool,
}

impl MockRecognizer {
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().copied().map(RecognizedLine::new).collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            lines: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl TextRecognizer for MockRecognizer {
    async fn recognize(&self, _image_path: &Path) -> Result<Vec<RecognizedLine>> {
        if self.fail {
            return Err(VisionError::RecognitionFailed("mock failure".to_string()).into());
        }
        Ok(self.lines.clone())
    }
}

fn parse_lines(raw: &str) -> Vec<RecognizedLine> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(RecognizedLine::new)
        .collect()
}
