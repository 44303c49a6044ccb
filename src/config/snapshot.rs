use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::foundation::error::{GifsciiError, GifsciiResult};
use crate::layers::{LayerStack, LegacyLayer};
use crate::pacing::{MAX_SPEED, MIN_SPEED, PacingConfig};

/// Smallest glyph cell size, in output pixels.
pub const MIN_GLYPH_CELL: f64 = 6.0;

/// Block grid and output surface settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Edge of one square block in source pixels (>= 1).
    #[serde(alias = "blockSize")]
    pub block_size: u32,
    /// Output-to-source size ratio (finite, > 0).
    pub scale: f64,
    /// Color the surface is cleared to before each frame.
    #[serde(alias = "canvasBg")]
    pub background: Color,
    /// Paint the raw frame under the glyph blocks.
    #[serde(alias = "underlay")]
    pub show_underlay: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            block_size: 8,
            scale: 2.0,
            background: Color::WHITE,
            show_underlay: false,
        }
    }
}

impl RenderConfig {
    /// Check block size and scale.
    pub fn validate(&self) -> GifsciiResult<()> {
        if self.block_size == 0 {
            return Err(GifsciiError::validation("block_size must be >= 1"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(GifsciiError::validation(format!(
                "scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    /// Glyph cell size: `max(6, block_size * scale)`.
    pub fn glyph_cell_size(&self) -> f64 {
        (f64::from(self.block_size) * self.scale).max(MIN_GLYPH_CELL)
    }

    /// Output surface dimensions for a `width` x `height` source: each side scaled and floored.
    pub fn output_size(&self, width: u32, height: u32) -> GifsciiResult<(u32, u32)> {
        if width == 0 || height == 0 {
            return Err(GifsciiError::DegenerateFrame { width, height });
        }
        let out_w = (f64::from(width) * self.scale).floor();
        let out_h = (f64::from(height) * self.scale).floor();
        if !(1.0..=f64::from(u32::MAX)).contains(&out_w)
            || !(1.0..=f64::from(u32::MAX)).contains(&out_h)
        {
            return Err(GifsciiError::DegenerateFrame {
                width: out_w.clamp(0.0, f64::from(u32::MAX)) as u32,
                height: out_h.clamp(0.0, f64::from(u32::MAX)) as u32,
            });
        }
        Ok((out_w as u32, out_h as u32))
    }
}

/// Immutable configuration shared by one playback session or export run.
///
/// Edits never mutate a snapshot in use; callers build a new one and hand it over.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSnapshot {
    /// Classification layers in priority order.
    pub layers: LayerStack,
    /// Grid and surface settings.
    pub render: RenderConfig,
    /// Playback speed.
    pub pacing: PacingConfig,
}

impl RenderSnapshot {
    /// Snapshot from its parts, validated.
    pub fn new(
        layers: LayerStack,
        render: RenderConfig,
        pacing: PacingConfig,
    ) -> GifsciiResult<Self> {
        let snapshot = Self {
            layers,
            render,
            pacing,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Starter layers with default render and pacing settings.
    pub fn starter() -> Self {
        Self {
            layers: LayerStack::starter(),
            render: RenderConfig::default(),
            pacing: PacingConfig::default(),
        }
    }

    /// Snapshot from a legacy layer list; the `-1` entry's visibility becomes the underlay flag.
    pub fn from_legacy_layers(layers: Vec<LegacyLayer>) -> GifsciiResult<Self> {
        let (layers, show_underlay) = LayerStack::from_legacy(layers)?;
        Self::new(
            layers,
            RenderConfig {
                show_underlay,
                ..RenderConfig::default()
            },
            PacingConfig::default(),
        )
    }

    /// Parse and validate a snapshot from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> GifsciiResult<Self> {
        let snapshot: Self = serde_json::from_reader(r)
            .map_err(|e| GifsciiError::validation(format!("parse snapshot JSON: {e}")))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Parse and validate a snapshot from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> GifsciiResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GifsciiError::validation(format!("open snapshot JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty JSON text.
    pub fn to_json(&self) -> GifsciiResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GifsciiError::validation(format!("serialize snapshot JSON: {e}")))
    }

    /// Validate layers, render settings and speed range.
    pub fn validate(&self) -> GifsciiResult<()> {
        self.layers.validate()?;
        self.render.validate()?;
        let speed = self.pacing.speed;
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(GifsciiError::validation(format!(
                "speed must be within [{MIN_SPEED}, {MAX_SPEED}], got {speed}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/snapshot.rs"]
mod tests;
