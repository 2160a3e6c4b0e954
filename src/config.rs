use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SapError};

/// Driver settings, threaded through [`crate::SapGuiDriver`] instead of
/// living in process-global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Pause inserted after every keyword that touches the GUI. This is a
    /// plain sleep intended for demonstration and debugging, not a
    /// wait-for-condition.
    pub explicit_wait: Duration,
    /// Capture a screenshot before surfacing a user-facing failure.
    pub screenshots_on_error: bool,
    /// Where screenshots are written. `None` resolves to the local data
    /// directory, falling back to the system temp directory.
    pub screenshot_directory: Option<PathBuf>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            explicit_wait: Duration::ZERO,
            screenshots_on_error: true,
            screenshot_directory: None,
        }
    }
}

impl DriverConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = env::var("SAPGUI_SCREENSHOT_DIR") {
            if !dir.is_empty() {
                config.screenshot_directory = Some(PathBuf::from(dir));
            }
        }
        if let Ok(toggle) = env::var("SAPGUI_SCREENSHOTS_ON_ERROR") {
            config.screenshots_on_error = !matches!(toggle.as_str(), "0" | "false" | "off");
        }
        if let Ok(wait) = env::var("SAPGUI_EXPLICIT_WAIT") {
            if let Ok(duration) = parse_wait(&wait) {
                config.explicit_wait = duration;
            }
        }
        config
    }
}

/// Parses the wait formats accepted by `set explicit wait`: a bare number
/// is taken as seconds, otherwise a number followed by a unit word.
///
/// | unit    | accepted spellings                            |
/// |---------|-----------------------------------------------|
/// | ms      | milliseconds, millisecond, millis, ms         |
/// | seconds | seconds, second, secs, sec, s                 |
/// | minutes | minutes, minute, mins, min, m                 |
pub fn parse_wait(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    let mut parts = trimmed.split_whitespace();

    let number = parts
        .next()
        .ok_or_else(|| SapError::InvalidWaitFormat(input.to_string()))?;
    let value: f64 = number
        .parse()
        .map_err(|_| SapError::InvalidWaitFormat(input.to_string()))?;
    if value < 0.0 || !value.is_finite() {
        return Err(SapError::InvalidWaitFormat(input.to_string()));
    }

    let seconds = match parts.next() {
        // No unit given, so the time is expected to be in seconds.
        None => value,
        Some(unit) => match unit.to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => value,
            "minutes" | "minute" | "mins" | "min" | "m" => value * 60.0,
            "milliseconds" | "millisecond" | "millis" | "ms" => value / 1000.0,
            _ => return Err(SapError::InvalidWaitFormat(input.to_string())),
        },
    };

    if parts.next().is_some() {
        return Err(SapError::InvalidWaitFormat(input.to_string()));
    }

    Ok(Duration::from_secs_f64(seconds))
}
