use async_trait::async_trait;
use fantoccini::Client;
use fantoccini::error::CmdError;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, trace};

/// Failure reported by a driver handle
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("WebDriver command failed: {0}")]
    Command(#[from] CmdError),

    #[error("no live browser session behind the driver facade")]
    NoLiveDriver,

    #[error("{0}")]
    Other(String),
}

/// A browser handle that can be asked for screenshots and page source.
///
/// Each call may fail independently of the others.
#[async_trait]
pub trait CaptureCapable: Send + Sync {
    /// Whether screenshots can be requested from this handle right now
    fn is_capture_capable(&self) -> bool;

    /// Raw image bytes of the current viewport, `None` if the driver had nothing to give
    async fn capture_bytes(&self) -> Result<Option<Vec<u8>>, DriverError>;

    /// Source of the currently rendered document
    async fn document_source(&self) -> Result<String, DriverError>;
}

/// A live WebDriver session
#[derive(Clone)]
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn into_client(self) -> Client {
        self.client
    }
}

impl fmt::Debug for WebDriverSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDriverSession").finish_non_exhaustive()
    }
}

#[async_trait]
impl CaptureCapable for WebDriverSession {
    fn is_capture_capable(&self) -> bool {
        true
    }

    async fn capture_bytes(&self) -> Result<Option<Vec<u8>>, DriverError> {
        let data = self.client.screenshot().await?;
        trace!("WebDriver returned {} bytes of screenshot data", data.len());
        Ok(Some(data))
    }

    async fn document_source(&self) -> Result<String, DriverError> {
        Ok(self.client.source().await?)
    }
}

/// Routing wrapper around a driver that may or may not be running.
///
/// Screenshots are only available while the facade has them enabled and a
/// driver is attached.
pub struct DriverFacade<D: ?Sized> {
    screenshots_enabled: bool,
    proxied: RwLock<Option<Arc<D>>>,
}

impl<D: CaptureCapable + ?Sized> DriverFacade<D> {
    /// An empty facade; attach a driver before capturing
    pub fn new(screenshots_enabled: bool) -> Self {
        Self {
            screenshots_enabled,
            proxied: RwLock::new(None),
        }
    }

    pub fn with_driver(driver: Arc<D>, screenshots_enabled: bool) -> Self {
        Self {
            screenshots_enabled,
            proxied: RwLock::new(Some(driver)),
        }
    }

    /// Routes subsequent calls to `driver`, returning the one it replaced
    pub fn attach(&self, driver: Arc<D>) -> Option<Arc<D>> {
        debug!("Attaching driver to facade");
        self.proxied
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(driver)
    }

    /// Drops the routing target, e.g. once the browser has been closed
    pub fn detach(&self) -> Option<Arc<D>> {
        debug!("Detaching driver from facade");
        self.proxied
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn proxied_driver(&self) -> Option<Arc<D>> {
        self.proxied
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_live_driver(&self) -> bool {
        self.proxied
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn screenshots_enabled(&self) -> bool {
        self.screenshots_enabled
    }

    fn live_driver(&self) -> Result<Arc<D>, DriverError> {
        self.proxied_driver().ok_or(DriverError::NoLiveDriver)
    }
}

impl<D: ?Sized> fmt::Debug for DriverFacade<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live = self
            .proxied
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false);
        f.debug_struct("DriverFacade")
            .field("screenshots_enabled", &self.screenshots_enabled)
            .field("live", &live)
            .finish()
    }
}

#[async_trait]
impl<D: CaptureCapable + ?Sized> CaptureCapable for DriverFacade<D> {
    fn is_capture_capable(&self) -> bool {
        self.screenshots_enabled && self.has_live_driver()
    }

    async fn capture_bytes(&self) -> Result<Option<Vec<u8>>, DriverError> {
        // Lock is released before awaiting the proxied driver
        let driver = match self.proxied_driver() {
            Some(driver) => driver,
            None => return Ok(None),
        };
        driver.capture_bytes().await
    }

    async fn document_source(&self) -> Result<String, DriverError> {
        let driver = self.live_driver()?;
        driver.document_source().await
    }
}
