//! Browser screenshot capture and persistence.
//!
//! A [`Photographer`] asks a [`CaptureCapable`] driver for image bytes, stores
//! them under a deterministic name in a target directory and dumps the page
//! source next to them.

pub mod client;
pub mod config;
pub mod driver;
pub mod model;
pub mod naming;
pub mod photographer;
pub mod sequence;

pub use config::PhotographerConfig;
pub use driver::{CaptureCapable, DriverError, DriverFacade, WebDriverSession};
pub use model::{CaptureError, CaptureOutcome, ScreenshotArtifact};
pub use naming::matching_source_path;
pub use photographer::Photographer;
pub use sequence::ScreenshotSequence;
