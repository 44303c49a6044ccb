use std::sync::Arc;

use crate::foundation::error::{GifsciiError, GifsciiResult};
use crate::pacing::normalize_delay;

pub use kurbo::{Point, Rect, Size};

/// One decoded animation frame: straight RGBA8 pixels plus its intrinsic delay.
///
/// The delay is normalized once, when the frame is constructed, so every consumer (live playback
/// and export) sees the same baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    rgba: Arc<[u8]>,
    source_delay_ms: Option<u32>,
    delay_ms: f64,
}

impl Frame {
    /// Build a frame from a row-major RGBA8 buffer of exactly `width * height * 4` bytes.
    ///
    /// `source_delay_ms` is the decoder-reported delay already converted to milliseconds; `None`
    /// means the source carried no delay.
    pub fn new(
        width: u32,
        height: u32,
        rgba: impl Into<Arc<[u8]>>,
        source_delay_ms: Option<u32>,
    ) -> GifsciiResult<Self> {
        let rgba = rgba.into();
        let expected = u64::from(width) * u64::from(height) * 4;
        if rgba.len() as u64 != expected {
            return Err(GifsciiError::validation(format!(
                "frame buffer holds {} bytes, expected {expected} for {width}x{height} RGBA8",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
            source_delay_ms,
            delay_ms: normalize_delay(source_delay_ms),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major straight RGBA8 pixels.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Delay as reported by the decoder, before normalization.
    pub fn source_delay_ms(&self) -> Option<u32> {
        self.source_delay_ms
    }

    /// Normalized baseline delay in milliseconds.
    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// `true` when either dimension is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.rgba.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
