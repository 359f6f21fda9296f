use anyhow::{Result, Context};
use fantoccini::{Client, ClientBuilder, Locator};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{error, debug, trace};
use crate::screenshot::config;

/// Creates a new WebDriver client with the specified configuration
///
/// Sets up a Chrome browser session whose window matches the requested
/// viewport.
///
/// # Arguments
/// * `webdriver_url` - WebDriver server URL
/// * `viewport_size` - Browser viewport dimensions
/// * `headless` - Whether to run in headless mode
pub async fn create_client(
    webdriver_url: &str,
    viewport_size: (u32, u32),
    headless: bool,
) -> Result<Client> {
    trace!("Creating new WebDriver client connecting to {}", webdriver_url);
    let mut caps = serde_json::map::Map::new();
    let mut chrome_opts = serde_json::map::Map::new();

    debug!("Configuring Chrome options with headless={}", headless);
    let args = config::chrome_arguments(headless, viewport_size);
    trace!("Setting Chrome arguments: {:?}", args);
    chrome_opts.insert("args".to_string(), serde_json::Value::Array(
        args.into_iter().map(serde_json::Value::String).collect()
    ));
    chrome_opts.insert("prefs".to_string(), serde_json::Value::Object(config::chrome_preferences()));

    caps.insert("goog:chromeOptions".to_string(), serde_json::Value::Object(chrome_opts));

    debug!("Connecting to WebDriver at {}", webdriver_url);
    let client = match ClientBuilder::native()
        .capabilities(caps)
        .connect(webdriver_url)
        .await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
                return Err(e).context(format!("Failed to connect to WebDriver at {}", webdriver_url));
            }
        };

    let (width, height) = viewport_size;
    debug!("Setting viewport size to {}x{}", width, height);
    if let Err(e) = client.set_window_size(width, height).await {
        // Not fatal, the window-size argument usually already applied
        error!("Failed to set window size to {}x{}: {}", width, height, e);
    }

    trace!("Successfully created WebDriver client");
    Ok(client)
}

/// Navigates to `url` and waits until the page body is rendered
pub async fn open_page(client: &Client, url: &str, page_load_timeout: Duration) -> Result<()> {
    debug!("Navigating to URL: {}", url);
    timeout(page_load_timeout, client.goto(url))
        .await
        .with_context(|| format!("Timed out navigating to {}", url))?
        .with_context(|| format!("Failed to navigate to {}", url))?;

    debug!("Waiting for page body to load");
    timeout(
        page_load_timeout,
        client.wait().forever().for_element(Locator::Css("body")),
    )
    .await
    .context("Timed out waiting for page to load")?
    .context("Failed to wait for page to load")?;

    trace!("Waiting {:?} for page content to render", config::RENDER_SETTLE_DELAY);
    sleep(config::RENDER_SETTLE_DELAY).await;
    Ok(())
}
