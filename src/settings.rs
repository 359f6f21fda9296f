use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::screenshot::config::{DEFAULT_VIEWPORT, DEFAULT_WEBDRIVER_URL, PAGE_LOAD_TIMEOUT};
use crate::screenshot::PhotographerConfig;

/// Prefix of environment variables overriding settings, e.g. `WEBSHOT_OUTPUT_DIR`
pub const ENV_PREFIX: &str = "WEBSHOT";

/// Runtime settings for the recorder
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory to save screenshots in
    pub output_dir: PathBuf,

    /// WebDriver server to connect to
    pub webdriver_url: String,

    /// Width of the browser viewport
    pub viewport_width: u32,

    /// Height of the browser viewport
    pub viewport_height: u32,

    /// Whether to run the browser in headless mode
    pub headless: bool,

    /// Upper bound on navigation and page load, in seconds
    pub page_load_timeout_secs: u64,

    /// Directory for the intermediate image files (OS temp dir if unset)
    pub temp_dir: Option<PathBuf>,

    pub keep_temp_files: bool,

    pub write_page_source: bool,

    /// Write logs to a file in this directory instead of stderr
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("screenshots"),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            viewport_width: DEFAULT_VIEWPORT.0,
            viewport_height: DEFAULT_VIEWPORT.1,
            headless: true,
            page_load_timeout_secs: PAGE_LOAD_TIMEOUT.as_secs(),
            temp_dir: None,
            keep_temp_files: false,
            write_page_source: true,
            log_dir: None,
        }
    }
}

impl Settings {
    /// Loads settings from defaults, then `file` (if given), then `WEBSHOT_*` variables
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    pub fn load_with_prefix(file: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix(env_prefix).try_parsing(true));

        let settings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;

        Ok(settings)
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn photographer_config(&self) -> PhotographerConfig {
        PhotographerConfig {
            temp_dir: self.temp_dir.clone(),
            keep_temp_files: self.keep_temp_files,
            write_page_source: self.write_page_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::load_with_prefix(None, "WEBSHOT_TEST_DEFAULTS").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.viewport(), (1280, 800));
        assert_eq!(settings.page_load_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("webshot.toml");
        fs::write(
            &path,
            "output_dir = \"shots\"\nviewport_width = 1024\nheadless = false\n",
        )
        .unwrap();

        let settings = Settings::load_with_prefix(Some(&path), "WEBSHOT_TEST_FILE").unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("shots"));
        assert_eq!(settings.viewport(), (1024, 800));
        assert!(!settings.headless);
        assert_eq!(settings.webdriver_url, DEFAULT_WEBDRIVER_URL);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("webshot.toml");
        fs::write(&path, "viewport_height = 600\nkeep_temp_files = false\n").unwrap();

        std::env::set_var("WEBSHOT_TEST_ENV_VIEWPORT_HEIGHT", "720");
        std::env::set_var("WEBSHOT_TEST_ENV_KEEP_TEMP_FILES", "true");
        let settings = Settings::load_with_prefix(Some(&path), "WEBSHOT_TEST_ENV").unwrap();
        std::env::remove_var("WEBSHOT_TEST_ENV_VIEWPORT_HEIGHT");
        std::env::remove_var("WEBSHOT_TEST_ENV_KEEP_TEMP_FILES");

        assert_eq!(settings.viewport_height, 720);
        assert!(settings.photographer_config().keep_temp_files);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load_with_prefix(Some(&missing), "WEBSHOT_TEST_MISSING").is_err());
    }
}
