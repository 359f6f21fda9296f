use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

use crate::screenshot::config::PhotographerConfig;
use crate::screenshot::driver::CaptureCapable;
use crate::screenshot::model::{CaptureError, CaptureOutcome, ScreenshotArtifact};
use crate::screenshot::naming;
use crate::screenshot::sequence::ScreenshotSequence;

/// Takes screenshots through a driver and stores them in a target directory.
///
/// Every saved screenshot is named `screenshot-<md5(label)><n>.png`, where
/// `n` comes from the photographer's [`ScreenshotSequence`]. The page source
/// at the time of the capture is dumped next to it as `.html` when the driver
/// can provide it.
pub struct Photographer {
    driver: Option<Arc<dyn CaptureCapable>>,
    target_directory: PathBuf,
    sequence: ScreenshotSequence,
    config: PhotographerConfig,
    test_double: bool,
}

impl fmt::Debug for Photographer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photographer")
            .field("has_driver", &self.driver.is_some())
            .field("target_directory", &self.target_directory)
            .field("next_sequence", &self.sequence.peek())
            .field("test_double", &self.test_double)
            .finish()
    }
}

impl Photographer {
    /// Creates a photographer using the process-wide sequence and default settings.
    ///
    /// The target directory is expected to exist and be writable.
    pub fn new(driver: Arc<dyn CaptureCapable>, target_directory: impl Into<PathBuf>) -> Self {
        Self {
            driver: Some(driver),
            target_directory: target_directory.into(),
            sequence: ScreenshotSequence::shared(),
            config: PhotographerConfig::default(),
            test_double: false,
        }
    }

    /// A photographer with no browser behind it; every capture yields nothing
    pub fn without_driver(target_directory: impl Into<PathBuf>) -> Self {
        Self {
            driver: None,
            target_directory: target_directory.into(),
            sequence: ScreenshotSequence::shared(),
            config: PhotographerConfig::default(),
            test_double: false,
        }
    }

    /// Uses `sequence` instead of the process-wide one
    pub fn with_sequence(mut self, sequence: ScreenshotSequence) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_config(mut self, config: PhotographerConfig) -> Self {
        self.config = config;
        self
    }

    /// Silences capture-failure warnings for drivers that are test doubles
    pub fn treat_as_test_double(mut self, test_double: bool) -> Self {
        self.test_double = test_double;
        self
    }

    pub fn target_directory(&self) -> &Path {
        &self.target_directory
    }

    pub fn sequence(&self) -> &ScreenshotSequence {
        &self.sequence
    }

    /// Takes a screenshot and stores it, logging anything that went wrong.
    ///
    /// Never fails: any problem results in `None`.
    pub async fn take_screenshot(&self, label: &str) -> Option<ScreenshotArtifact> {
        match self.capture(label).await {
            CaptureOutcome::Saved(artifact) => {
                info!("Screenshot saved to {}", artifact.path().display());
                Some(artifact)
            }
            CaptureOutcome::NotCapable => {
                trace!("Driver cannot take screenshots, skipping '{}'", label);
                None
            }
            CaptureOutcome::Failed(e) => {
                if !self.test_double {
                    warn!("Failed to write screenshot for '{}': {}", label, e);
                    if let Some(partial) = e.partial_file() {
                        debug!("Partial screenshot left at {}", partial.display());
                    }
                }
                None
            }
        }
    }

    /// Takes a screenshot and reports exactly what happened, without logging failures
    pub async fn capture(&self, label: &str) -> CaptureOutcome {
        let driver = match self.capable_driver() {
            Some(driver) => driver,
            None => return CaptureOutcome::NotCapable,
        };

        let temporary = match self.write_temporary_screenshot(driver.as_ref()).await {
            Ok(path) => path,
            Err(e) => return CaptureOutcome::Failed(e),
        };

        match self.save_screenshot(driver.as_ref(), label, &temporary).await {
            Ok(artifact) => CaptureOutcome::Saved(artifact),
            Err(e) => CaptureOutcome::Failed(e),
        }
    }

    /// Page source file that belongs to `screenshot`, if there is a screenshot
    pub fn matching_source_path(&self, screenshot: Option<&ScreenshotArtifact>) -> Option<PathBuf> {
        naming::matching_source_path(screenshot.map(ScreenshotArtifact::path))
    }

    fn capable_driver(&self) -> Option<&Arc<dyn CaptureCapable>> {
        self.driver
            .as_ref()
            .filter(|driver| driver.is_capture_capable())
    }

    async fn write_temporary_screenshot(
        &self,
        driver: &dyn CaptureCapable,
    ) -> Result<PathBuf, CaptureError> {
        debug!("Capturing screenshot");
        let data = driver.capture_bytes().await?.ok_or(CaptureError::NoImageData)?;

        let path = self.config.temp_dir().join(naming::temporary_file_name());
        trace!("Writing {} bytes to {}", data.len(), path.display());
        fs::write(&path, &data).map_err(|source| CaptureError::TempWrite {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    async fn save_screenshot(
        &self,
        driver: &dyn CaptureCapable,
        label: &str,
        temporary: &Path,
    ) -> Result<ScreenshotArtifact, CaptureError> {
        let sequence = self.sequence.next();
        let label_digest = naming::label_digest(label);
        let destination = self
            .target_directory
            .join(naming::screenshot_file_name(label, sequence));
        let destination = std::path::absolute(&destination).unwrap_or(destination);

        debug!("Copying {} to {}", temporary.display(), destination.display());
        fs::copy(temporary, &destination).map_err(|source| CaptureError::Copy {
            from: temporary.to_path_buf(),
            to: destination.clone(),
            source,
        })?;

        if !self.config.keep_temp_files {
            if let Err(e) = fs::remove_file(temporary) {
                debug!("Could not remove temporary screenshot {}: {}", temporary.display(), e);
            }
        }

        let source_path = if self.config.write_page_source {
            self.save_page_source(driver, &destination).await
        } else {
            None
        };

        Ok(ScreenshotArtifact::new(destination, sequence, label_digest, source_path))
    }

    async fn save_page_source(&self, driver: &dyn CaptureCapable, screenshot: &Path) -> Option<PathBuf> {
        let source = match driver.document_source().await {
            Ok(source) => source,
            Err(e) => {
                warn!("Failed to save screen source code: {}", e);
                return None;
            }
        };

        let path = naming::source_path_for(screenshot);
        match fs::write(&path, source) {
            Ok(()) => {
                trace!("Page source written to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to save screen source code to {}: {}", path.display(), e);
                None
            }
        }
    }
}
