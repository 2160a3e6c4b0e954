//! Failure screenshots.
//!
//! The driver captures a screenshot before surfacing a user-facing
//! failure, controlled by [`crate::DriverConfig::screenshots_on_error`].
//! Capture is strictly best-effort: a sink that fails must never mask the
//! error that triggered it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use image::RgbaImage;
use xcap::Monitor;

/// Destination for failure screenshots.
pub trait ScreenshotSink {
    /// Captures the screen under the given name and returns where the
    /// image was written.
    fn capture(&self, name: &str) -> Result<PathBuf>;
}

/// Default sink: captures the primary monitor with `xcap` and writes a
/// timestamped PNG into the configured directory.
pub struct ScreenCapture {
    directory: PathBuf,
}

impl ScreenCapture {
    pub fn new(directory: Option<PathBuf>) -> Self {
        Self {
            directory: directory.unwrap_or_else(default_directory),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

fn default_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("sapgui-driver")
        .join("screenshots")
}

fn capture_primary_screen() -> Result<RgbaImage> {
    let monitors = Monitor::all().map_err(|e| anyhow!("failed to get monitors: {}", e))?;
    let primary = monitors
        .into_iter()
        .find(|m| m.is_primary())
        .ok_or_else(|| anyhow!("no primary monitor found"))?;
    primary
        .capture_image()
        .map_err(|e| anyhow!("failed to capture screen: {}", e))
}

impl ScreenshotSink for ScreenCapture {
    fn capture(&self, name: &str) -> Result<PathBuf> {
        let image = capture_primary_screen()?;

        fs::create_dir_all(&self.directory)?;
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
        let path = self.directory.join(format!("{name}-{timestamp}.png"));
        image
            .save(&path)
            .map_err(|e| anyhow!("failed to write {}: {}", path.display(), e))?;

        Ok(path)
    }
}
