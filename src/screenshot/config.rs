use std::path::PathBuf;
use std::time::Duration;

// Naming scheme for saved screenshots and their page source dumps
pub const SCREENSHOT_PREFIX: &str = "screenshot-";
pub const IMAGE_EXTENSION: &str = ".png";
pub const SOURCE_EXTENSION: &str = ".html";

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 800);
pub const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);
pub const RENDER_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Tuning knobs for a [`Photographer`](crate::screenshot::Photographer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotographerConfig {
    /// Where the intermediate `<uuid>.png` files go. `None` means the OS temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Leave the intermediate file behind after it was copied to the target directory
    pub keep_temp_files: bool,

    /// Dump the rendered document next to every saved screenshot
    pub write_page_source: bool,
}

impl Default for PhotographerConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            keep_temp_files: false,
            write_page_source: true,
        }
    }
}

impl PhotographerConfig {
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

// Chrome browser arguments
pub fn chrome_arguments(headless: bool, viewport: (u32, u32)) -> Vec<String> {
    let window_size = format!("--window-size={},{}", viewport.0, viewport.1);
    vec![
        "--no-sandbox",
        "--disable-gpu",
        "--disable-dev-shm-usage",
        "--disable-extensions",
        "--disable-notifications",
        "--disable-infobars",
        "--disable-popup-blocking",
        "--disable-background-networking",
        "--disable-breakpad",
        "--disable-features=TranslateUI",
        "--force-color-profile=srgb",
        "--mute-audio",
        window_size.as_str(),
        if headless { "--headless=new" } else { "" }
    ].into_iter()
    .filter(|s| !s.is_empty())
    .map(String::from)
    .collect()
}

// Chrome content settings preferences
pub fn chrome_preferences() -> serde_json::Map<String, serde_json::Value> {
    let mut prefs = serde_json::Map::new();
    prefs.insert("profile.default_content_setting_values.images".to_string(), 1.into()); // 1 = allow
    prefs.insert("profile.managed_default_content_settings.javascript".to_string(), 1.into());
    prefs.insert("profile.managed_default_content_settings.popups".to_string(), 2.into()); // 2 = block
    prefs.insert("profile.managed_default_content_settings.geolocation".to_string(), 2.into());
    prefs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_flag_only_when_requested() {
        let headless = chrome_arguments(true, DEFAULT_VIEWPORT);
        let headed = chrome_arguments(false, DEFAULT_VIEWPORT);

        assert!(headless.iter().any(|a| a == "--headless=new"));
        assert!(!headed.iter().any(|a| a.starts_with("--headless")));
        assert!(headed.iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn test_window_size_follows_viewport() {
        let args = chrome_arguments(true, (1024, 768));
        assert!(args.contains(&"--window-size=1024,768".to_string()));
    }

    #[test]
    fn test_default_temp_dir_is_os_temp() {
        let config = PhotographerConfig::default();
        assert_eq!(config.temp_dir(), std::env::temp_dir());
        assert!(config.write_page_source);
        assert!(!config.keep_temp_files);
    }
}
