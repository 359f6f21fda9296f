use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::screenshot::driver::DriverError;
use crate::screenshot::naming;

/// A screenshot persisted to the target directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotArtifact {
    path: PathBuf,          // Absolute path of the saved image
    sequence: u64,          // Sequence number embedded in the file name
    label_digest: String,   // Hex digest of the label embedded in the file name
    source_path: Option<PathBuf>, // Page source dump, when one was written
}

impl ScreenshotArtifact {
    pub(crate) fn new(
        path: PathBuf,
        sequence: u64,
        label_digest: String,
        source_path: Option<PathBuf>,
    ) -> Self {
        Self { path, sequence, label_digest, source_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn label_digest(&self) -> &str {
        &self.label_digest
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// The page source dump written alongside this screenshot, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Where the page source for this screenshot lives (or would live)
    pub fn matching_source_path(&self) -> PathBuf {
        naming::source_path_for(&self.path)
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Why a capture produced no artifact
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("driver returned no screenshot data")]
    NoImageData,

    #[error("failed to capture screenshot: {0}")]
    Driver(#[from] DriverError),

    #[error("failed to write screenshot to {}: {source}", path.display())]
    TempWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy screenshot from {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CaptureError {
    /// Whatever was left on disk by a failed temp write, if it still exists
    pub fn partial_file(&self) -> Option<&Path> {
        match self {
            CaptureError::TempWrite { path, .. } if path.exists() => Some(path),
            CaptureError::Copy { from, .. } if from.exists() => Some(from),
            _ => None,
        }
    }
}

/// Result of one capture attempt
#[derive(Debug)]
pub enum CaptureOutcome {
    Saved(ScreenshotArtifact),
    /// No driver, or the driver cannot take screenshots right now
    NotCapable,
    Failed(CaptureError),
}

impl CaptureOutcome {
    pub fn artifact(&self) -> Option<&ScreenshotArtifact> {
        match self {
            CaptureOutcome::Saved(artifact) => Some(artifact),
            _ => None,
        }
    }

    pub fn into_artifact(self) -> Option<ScreenshotArtifact> {
        match self {
            CaptureOutcome::Saved(artifact) => Some(artifact),
            _ => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, CaptureOutcome::Saved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_matching_source_path() {
        let artifact = ScreenshotArtifact::new(
            PathBuf::from("/out/screenshot-abc4.png"),
            4,
            "abc".to_string(),
            None,
        );

        assert_eq!(artifact.file_name(), Some("screenshot-abc4.png"));
        assert_eq!(artifact.matching_source_path(), PathBuf::from("/out/screenshot-abc4.html"));
        assert!(artifact.source_path().is_none());
    }

    #[test]
    fn test_partial_file_requires_existing_path() {
        let error = CaptureError::TempWrite {
            path: PathBuf::from("/definitely/not/here.png"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert!(error.partial_file().is_none());
        assert!(error.to_string().contains("disk full"));
    }

    #[test]
    fn test_outcome_accessors() {
        assert!(!CaptureOutcome::NotCapable.is_saved());
        assert!(CaptureOutcome::Failed(CaptureError::NoImageData).into_artifact().is_none());
    }
}
