pub mod screenshot;
pub mod settings;
pub mod utils;

pub use screenshot::{
    CaptureCapable, CaptureError, CaptureOutcome, DriverError, DriverFacade, Photographer,
    PhotographerConfig, ScreenshotArtifact, ScreenshotSequence, WebDriverSession,
};
pub use settings::Settings;
