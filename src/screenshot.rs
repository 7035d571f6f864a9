//! Screenshot support for the `Screenshot` built-in.
//!
//! Capturing the frame is left to the host through [`FrameCapture`]; this
//! module picks the file name and reports the result.

use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::core::ConsoleError;

/// Message reported when no capture backend has been installed.
pub const CAPTURE_UNAVAILABLE: &str = "Screenshot capture is not available";

/// Writes the current frame to an image file.
pub trait FrameCapture: Send + Sync + 'static {
    fn capture(&self, path: &Path) -> Result<(), ConsoleError>;
}

impl<F> FrameCapture for F
where
    F: Fn(&Path) -> Result<(), ConsoleError> + Send + Sync + 'static,
{
    fn capture(&self, path: &Path) -> Result<(), ConsoleError> {
        self(path)
    }
}

/// Where screenshots go and how they are taken.
#[derive(Resource)]
pub struct ScreenshotSettings {
    /// Directory screenshots are written to. Created on first use.
    pub directory: PathBuf,
    capture: Option<Box<dyn FrameCapture>>,
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("Screenshots"),
            capture: None,
        }
    }
}

impl ScreenshotSettings {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            capture: None,
        }
    }

    /// Use `capture` to write frames.
    pub fn with_capture(mut self, capture: impl FrameCapture) -> Self {
        self.capture = Some(Box::new(capture));
        self
    }

    pub fn set_capture(&mut self, capture: impl FrameCapture) {
        self.capture = Some(Box::new(capture));
    }

    pub fn has_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// Capture one screenshot into the first free `Screenshot<N>.png`.
    pub fn take(&self) -> Result<PathBuf, ConsoleError> {
        let capture = self
            .capture
            .as_ref()
            .ok_or_else(|| ConsoleError::Capture(CAPTURE_UNAVAILABLE.to_string()))?;

        std::fs::create_dir_all(&self.directory)?;
        let path = next_screenshot_path(&self.directory);
        capture.capture(&path)?;
        debug!("Screenshot written to {}", path.display());
        Ok(path)
    }
}

/// The first `Screenshot<N>.png` in `directory` that does not exist yet, counting from 0.
pub fn next_screenshot_path(directory: &Path) -> PathBuf {
    (0u32..)
        .map(|n| directory.join(format!("Screenshot{n}.png")))
        .find(|path| !path.exists())
        .unwrap_or_else(|| directory.join("Screenshot.png"))
}
