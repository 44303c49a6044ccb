//! Frame delay normalization and speed-dependent time remapping.

mod pace;

pub use pace::{
    BASELINE_DELAY_MS, FLOOR_DELAY_MS, MAX_SOURCE_DELAY_MS, MAX_SPEED, MIN_SOURCE_DELAY_MS,
    MIN_SPEED, NEUTRAL_SPEED, PacingConfig, normalize_delay, pace, pace_frame,
};
