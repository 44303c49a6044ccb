use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Frame;

/// Slowest speed setting.
pub const MIN_SPEED: f64 = 1.0;
/// Speed at which frames play at their own delay.
pub const NEUTRAL_SPEED: f64 = 5.0;
/// Fastest speed setting.
pub const MAX_SPEED: f64 = 10.0;
/// Delay reached at [`MAX_SPEED`]: one 60 fps tick.
pub const FLOOR_DELAY_MS: f64 = 1000.0 / 60.0;
/// Replacement for missing or out-of-range source delays.
pub const BASELINE_DELAY_MS: f64 = 100.0;
/// Source delays below this are replaced by [`BASELINE_DELAY_MS`].
pub const MIN_SOURCE_DELAY_MS: u32 = 20;
/// Source delays above this are replaced by [`BASELINE_DELAY_MS`].
pub const MAX_SOURCE_DELAY_MS: u32 = 200;

/// Playback speed knob shared by live preview and export.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Speed in `[MIN_SPEED, MAX_SPEED]`; values outside are the caller's to clamp.
    pub speed: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            speed: NEUTRAL_SPEED,
        }
    }
}

impl PacingConfig {
    /// Config with `speed` clamped into `[MIN_SPEED, MAX_SPEED]`.
    pub fn clamped(speed: f64) -> Self {
        let speed = if speed.is_nan() {
            NEUTRAL_SPEED
        } else {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        };
        Self { speed }
    }
}

/// Map a decoder-reported delay to the baseline used for pacing.
///
/// Missing delays and delays outside `[MIN_SOURCE_DELAY_MS, MAX_SOURCE_DELAY_MS]` become
/// [`BASELINE_DELAY_MS`]. Applied once, when a [`Frame`] is built.
pub fn normalize_delay(source_delay_ms: Option<u32>) -> f64 {
    match source_delay_ms {
        Some(ms) if (MIN_SOURCE_DELAY_MS..=MAX_SOURCE_DELAY_MS).contains(&ms) => f64::from(ms),
        _ => BASELINE_DELAY_MS,
    }
}

/// Remap a normalized baseline delay (ms) for `cfg.speed`.
///
/// Below neutral the delay grows linearly up to 2x at [`MIN_SPEED`]; above neutral it
/// interpolates linearly toward [`FLOOR_DELAY_MS`], reached at [`MAX_SPEED`].
pub fn pace(baseline_ms: f64, cfg: &PacingConfig) -> f64 {
    let speed = cfg.speed;
    if speed < NEUTRAL_SPEED {
        let t = (NEUTRAL_SPEED - speed) / (NEUTRAL_SPEED - MIN_SPEED);
        baseline_ms * (1.0 + t)
    } else if speed > NEUTRAL_SPEED {
        let t = (speed - NEUTRAL_SPEED) / (MAX_SPEED - NEUTRAL_SPEED);
        baseline_ms * (1.0 - t) + FLOOR_DELAY_MS * t
    } else {
        baseline_ms
    }
}

/// Paced wait for one frame.
pub fn pace_frame(frame: &Frame, cfg: &PacingConfig) -> Duration {
    let ms = pace(frame.delay_ms(), cfg);
    Duration::from_secs_f64(ms.max(0.0) / 1000.0)
}

#[cfg(test)]
#[path = "../../tests/unit/pacing/pace.rs"]
mod tests;
