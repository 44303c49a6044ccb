use crate::foundation::error::{GifsciiError, GifsciiResult};
use crate::render::CompositeSurface;

/// Encoder quality hint used when none is given. Lower is better and slower.
pub const DEFAULT_QUALITY: u8 = 10;

/// Configuration provided to a [`FrameEncoder`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Quality hint in `1..=30`, lower is better.
    pub quality: u8,
}

/// Consumer of composited surfaces, in frame order.
///
/// Call order: `begin`, then `submit` once per frame, then either `finish` or `abort`.
pub trait FrameEncoder: Send {
    /// Called once before any frame is submitted.
    fn begin(&mut self, cfg: EncoderConfig) -> GifsciiResult<()>;
    /// Append one surface shown for `delay_ms` milliseconds.
    fn submit(&mut self, surface: &CompositeSurface, delay_ms: f64) -> GifsciiResult<()>;
    /// Complete the stream and return the encoded bytes.
    fn finish(&mut self) -> GifsciiResult<Vec<u8>>;
    /// Drop any partial state. No further calls follow.
    fn abort(&mut self);
}

/// Encoder that keeps every submitted surface, for tests and previews.
///
/// `finish` returns the surfaces' pixel data concatenated in submission order.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    cfg: Option<EncoderConfig>,
    frames: Vec<(CompositeSurface, f64)>,
    aborted: bool,
}

impl InMemoryEncoder {
    /// Create a new in-memory encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<EncoderConfig> {
        self.cfg
    }

    /// Submitted surfaces with their delays.
    pub fn frames(&self) -> &[(CompositeSurface, f64)] {
        &self.frames
    }

    /// `true` once `abort` was called.
    pub fn aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameEncoder for InMemoryEncoder {
    fn begin(&mut self, cfg: EncoderConfig) -> GifsciiResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.aborted = false;
        Ok(())
    }

    fn submit(&mut self, surface: &CompositeSurface, delay_ms: f64) -> GifsciiResult<()> {
        let Some(cfg) = self.cfg else {
            return Err(GifsciiError::encode("submit before begin"));
        };
        if (surface.width, surface.height) != (cfg.width, cfg.height) {
            return Err(GifsciiError::encode(format!(
                "surface is {}x{}, encoder expects {}x{}",
                surface.width, surface.height, cfg.width, cfg.height
            )));
        }
        self.frames.push((surface.clone(), delay_ms));
        Ok(())
    }

    fn finish(&mut self) -> GifsciiResult<Vec<u8>> {
        if self.cfg.is_none() {
            return Err(GifsciiError::encode("finish before begin"));
        }
        Ok(self
            .frames
            .iter()
            .flat_map(|(surface, _)| surface.data.iter().copied())
            .collect())
    }

    fn abort(&mut self) {
        self.aborted = true;
        self.frames.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/encoder.rs"]
mod tests;
